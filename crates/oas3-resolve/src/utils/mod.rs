pub mod refs;
pub mod schema_ext;
pub mod spec;

pub(crate) use schema_ext::SchemaExt;

#[cfg(test)]
mod tests;

pub mod constants;
pub mod identifiers;
pub mod media;
pub mod operations;
pub mod resolver;

#[cfg(test)]
mod tests;

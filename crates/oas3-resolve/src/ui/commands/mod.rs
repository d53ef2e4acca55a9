#![allow(clippy::struct_excessive_bools)]

pub mod list;
pub mod resolve;

pub use list::list_types;
pub use resolve::{ResolveConfig, resolve_spec};

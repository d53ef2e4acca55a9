pub use better_default::Default;
pub use indexmap::IndexMap;
pub use serde_with::skip_serializing_none;

mod additional;
mod defaults;
mod discriminator;
mod error;
mod nullable;
pub mod union;

pub use additional::{Extensible, KnownFields};
pub use defaults::{ApplyDefaults, default_if_unset, default_if_unspecified};
pub use error::SupportError;
pub use nullable::Nullable;

pub mod ast;
pub mod config;
pub(crate) mod converter;
pub mod documents;
pub mod errors;
pub mod metrics;
pub mod model;
pub mod naming;
pub mod operation_registry;
pub mod orchestrator;
pub(crate) mod schema_registry;

#[cfg(test)]
mod tests;

pub use config::{NamingScope, ResolverConfig, SchemaScope};
pub use converter::instance::InstanceMismatch;
pub use documents::{DocumentCache, DocumentSet};
pub use errors::{ResolutionError, ResolutionErrors};
pub use metrics::{ResolutionStats, ResolutionWarning};
pub use model::ResolvedModel;
pub use orchestrator::{Orchestrator, ResolveOutput};

mod additional_properties;
mod composition;
mod defaults;
mod discriminator;
mod field_optionality;
pub mod instance;
mod kinds;
mod unions;

#[cfg(test)]
mod tests;

use self::{
  additional_properties::classify_additional_properties, composition::CompositionResolver,
  defaults::DefaultPropagator, discriminator::attach_discriminators, field_optionality::model_presence,
  kinds::classify_nodes, unions::resolve_unions,
};
use super::{
  ast::SchemaGraph,
  errors::ResolutionErrors,
  metrics::ResolutionStats,
  schema_registry::NodeSource,
};

/// Runs the stages between reference resolution and naming over the node arena.
///
/// Order matters: kinds and unions first, discriminators before composition
/// so re-exposed unions carry their mapping, then presence, extras and defaults
/// over the flattened field sets.
pub(crate) struct SchemaConverter<'a> {
  sources: &'a [NodeSource],
}

impl<'a> SchemaConverter<'a> {
  pub(crate) const fn new(sources: &'a [NodeSource]) -> Self {
    Self { sources }
  }

  pub(crate) fn convert(&self, graph: &mut SchemaGraph, errors: &mut ResolutionErrors, stats: &mut ResolutionStats) {
    stats.record_warnings(classify_nodes(graph, self.sources));
    stats.record_warnings(resolve_unions(graph, self.sources));
    stats.record_warnings(attach_discriminators(graph, self.sources));
    CompositionResolver::new(graph, self.sources).run();
    model_presence(graph, self.sources);
    classify_additional_properties(graph, self.sources);
    DefaultPropagator::new(self.sources, errors, stats).run(graph);
    stats.nodes_resolved = graph.len();
  }
}

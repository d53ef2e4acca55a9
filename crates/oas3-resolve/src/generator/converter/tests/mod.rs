mod cycles;
mod discriminator;
mod kinds;
mod unions;

use serde_json::{Value, json};

use super::{SchemaConverter, instance::InstanceMatcher};
use crate::generator::{
  ast::{SchemaGraph, SchemaId, SchemaNode},
  documents::DocumentSet,
  errors::ResolutionErrors,
  metrics::ResolutionStats,
  schema_registry::SchemaRegistry,
};

struct Converted {
  graph: SchemaGraph,
  components: Vec<(String, SchemaId)>,
  errors: ResolutionErrors,
  stats: ResolutionStats,
}

impl Converted {
  fn id(&self, name: &str) -> SchemaId {
    self
      .components
      .iter()
      .find_map(|(component, id)| (component == name).then_some(*id))
      .unwrap_or_else(|| panic!("no component {name}"))
  }

  fn node(&self, name: &str) -> &SchemaNode {
    self.graph.get(self.id(name)).unwrap()
  }

  fn resolved(&self, name: &str) -> &SchemaNode {
    self.graph.resolved(self.id(name)).unwrap()
  }

  fn matcher(&self) -> InstanceMatcher<'_> {
    InstanceMatcher::new(&self.graph)
  }
}

fn convert(schemas: Value) -> Converted {
  let root = json!({
    "openapi": "3.1.0",
    "info": {"title": "converter", "version": "1.0.0"},
    "paths": {},
    "components": {"schemas": schemas}
  });
  let documents = DocumentSet::new(root).unwrap();
  let mut registry = SchemaRegistry::new(&documents);
  for (_, location) in registry.component_locations() {
    registry.intern(location);
  }
  let (mut output, mut errors) = registry.finish(&[]);
  let mut stats = ResolutionStats::default();
  SchemaConverter::new(&output.sources).convert(&mut output.graph, &mut errors, &mut stats);
  Converted {
    graph: output.graph,
    components: output.components,
    errors,
    stats,
  }
}

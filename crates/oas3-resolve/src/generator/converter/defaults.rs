use serde_json::Value;

use super::{
  field_optionality::{declaring_node, property_site},
  instance::{InstanceMatcher, InstanceMismatch},
};
use crate::{
  generator::{
    ast::{NodeKind, SchemaGraph, SchemaId, SchemaLocation},
    errors::{ResolutionError, ResolutionErrors},
    metrics::{ResolutionStats, ResolutionWarning},
    schema_registry::NodeSource,
  },
  utils::SchemaExt,
};

/// Records schema and field defaults and checks each against its type.
///
/// A default written on the property (next to its `$ref` or inline) wins over
/// the default of the schema it points to. Ambiguous unions, unknown tags and
/// ill-typed additional properties are errors; other mismatches are warnings.
pub(crate) struct DefaultPropagator<'a> {
  sources: &'a [NodeSource],
  errors: &'a mut ResolutionErrors,
  stats: &'a mut ResolutionStats,
}

impl<'a> DefaultPropagator<'a> {
  pub(crate) fn new(
    sources: &'a [NodeSource],
    errors: &'a mut ResolutionErrors,
    stats: &'a mut ResolutionStats,
  ) -> Self {
    Self { sources, errors, stats }
  }

  pub(crate) fn run(mut self, graph: &mut SchemaGraph) {
    for (id, source) in graph.ids().zip(self.sources) {
      if let Some(node) = graph.get_mut(id) {
        node.default = source.fragment.default_value().cloned();
      }
    }

    for id in graph.ids() {
      let Some(node) = graph.get(id) else {
        continue;
      };
      let defaults = node
        .fields
        .iter()
        .map(|field| {
          let site = property_site(self.sources, declaring_node(id, field.origin), &field.name)
            .and_then(|site| site.as_object()?.default_value())
            .cloned();
          site.or_else(|| target_default(graph, field.target))
        })
        .collect::<Vec<_>>();
      if let Some(node) = graph.get_mut(id) {
        for (field, default) in node.fields.iter_mut().zip(defaults) {
          field.default = default;
        }
      }
    }

    self.validate(graph);
  }

  fn validate(&mut self, graph: &SchemaGraph) {
    let matcher = InstanceMatcher::new(graph);

    for node in graph.iter() {
      if let Some(default) = &node.default {
        let label = node.location.bare_name().unwrap_or_else(|| node.location.pointer.to_string());
        self.check(graph, &matcher, node.id, default, &node.location, &label);
      }

      for field in &node.fields {
        let Some(default) = &field.default else {
          continue;
        };
        self.stats.record_default();
        if default.is_null() && field.nullable {
          continue;
        }
        if graph.resolved(field.target).and_then(|target| target.default.as_ref()) == Some(default) {
          continue;
        }
        let declaring = declaring_node(node.id, field.origin);
        let location = graph
          .get(declaring)
          .map_or_else(|| node.location.clone(), |owner| owner.location.clone())
          .child(["properties", field.name.as_str()]);
        self.check(graph, &matcher, field.target, default, &location, &field.name);
      }
    }
  }

  fn check(
    &mut self,
    graph: &SchemaGraph,
    matcher: &InstanceMatcher<'_>,
    target: SchemaId,
    default: &Value,
    location: &SchemaLocation,
    field: &str,
  ) {
    let Err(mismatch) = matcher.check(target, default) else {
      return;
    };
    let location_of = |id: SchemaId| graph.get(id).map_or_else(|| location.clone(), |node| node.location.clone());
    match mismatch {
      InstanceMismatch::Shape(message) => self.stats.record_warning(ResolutionWarning::DefaultMismatch {
        location: location.to_string(),
        field: field.to_string(),
        message,
      }),
      InstanceMismatch::AmbiguousUnion { union, matched } => {
        self.errors.push(ResolutionError::AmbiguousUnionMatch {
          location: location.clone(),
          union: location_of(union),
          matched,
        });
      }
      InstanceMismatch::UnknownTag { union, property, tag } => {
        self.errors.push(ResolutionError::DiscriminatorTagUnknown {
          location: location.clone(),
          union: location_of(union),
          property,
          tag,
        });
      }
      InstanceMismatch::ExtraProperty { key, .. } => {
        self.errors.push(ResolutionError::AdditionalPropertyTypeMismatch {
          location: location.clone(),
          key,
        });
      }
    }
  }
}

/// First default found on the way from `id` through its wrappers.
fn target_default(graph: &SchemaGraph, mut id: SchemaId) -> Option<Value> {
  for _ in 0..=graph.len() {
    let node = graph.get(id)?;
    if let Some(default) = &node.default {
      return Some(default.clone());
    }
    match node.kind {
      NodeKind::Reference(target) if target != id => id = target,
      _ => return None,
    }
  }
  None
}

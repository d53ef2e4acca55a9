use serde_json::Value;

use crate::{
  generator::{
    ast::{AdditionalProperties, NodeKind, SchemaGraph},
    schema_registry::NodeSource,
  },
  utils::schema_ext::{AdditionalPropertiesDecl, SchemaExt},
};

/// Classifies what every object and map does with keys it does not declare.
///
/// A declaration on the schema itself wins. An `allOf` composite without one
/// takes the mode of its first open-map member, then of its first member
/// declaring typed extras. Closed members never close the composite.
pub(crate) fn classify_additional_properties(graph: &mut SchemaGraph, sources: &[NodeSource]) {
  let mut declared = Vec::with_capacity(graph.len());
  for source in sources.iter().take(graph.len()) {
    declared.push(own_mode(source));
  }

  for id in graph.ids() {
    let Some(node) = graph.get(id) else {
      continue;
    };
    if !matches!(node.kind, NodeKind::Object | NodeKind::Map { .. }) {
      continue;
    }
    let mode = declared.get(id.index()).copied().flatten().or_else(|| {
      let composition = node.composition.as_ref()?;
      composition
        .open_map_members
        .iter()
        .chain(&composition.members)
        .map(|member| graph.resolve(*member))
        .find_map(|member| match declared.get(member.index()).copied().flatten() {
          Some(AdditionalProperties::Closed) | None => None,
          mode => mode,
        })
    });
    if let Some(node) = graph.get_mut(id) {
      node.additional_properties = mode.unwrap_or_default();
    }
  }
}

fn own_mode(source: &NodeSource) -> Option<AdditionalProperties> {
  match source.fragment.additional_properties() {
    AdditionalPropertiesDecl::Absent => None,
    AdditionalPropertiesDecl::Allowed(false) => Some(AdditionalProperties::Closed),
    AdditionalPropertiesDecl::Allowed(true) => Some(AdditionalProperties::OpenAny),
    AdditionalPropertiesDecl::Schema(schema) => Some(match (schema, source.links.additional) {
      (Value::Object(schema), Some(values)) if !schema.is_empty() => AdditionalProperties::OpenTyped(values),
      _ => AdditionalProperties::OpenAny,
    }),
  }
}

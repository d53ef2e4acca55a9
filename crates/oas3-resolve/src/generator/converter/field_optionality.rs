use serde_json::Value;

use crate::{
  generator::{
    ast::{FieldOrigin, FieldPresence, SchemaGraph, SchemaId},
    schema_registry::NodeSource,
  },
  utils::SchemaExt,
};

/// Classifies every field on the required × nullable axes.
///
/// A field is nullable when its target admits `null` (through any wrapper on
/// the way) or when the property declaring it says `nullable: true` next to
/// its `$ref`.
pub(crate) fn model_presence(graph: &mut SchemaGraph, sources: &[NodeSource]) {
  for id in graph.ids() {
    let Some(node) = graph.get(id) else {
      continue;
    };
    let updates = node
      .fields
      .iter()
      .map(|field| {
        let declaring = declaring_node(id, field.origin);
        let site = property_site(sources, declaring, &field.name).is_some_and(|site| site_nullable(site));
        site || graph.is_nullable(field.target)
      })
      .collect::<Vec<_>>();

    if let Some(node) = graph.get_mut(id) {
      for (field, nullable) in node.fields.iter_mut().zip(updates) {
        field.nullable = nullable;
        field.presence = FieldPresence::classify(field.required, nullable);
      }
    }
  }
}

/// Node whose `properties` declared a field with this origin.
pub(crate) const fn declaring_node(owner: SchemaId, origin: FieldOrigin) -> SchemaId {
  match origin {
    FieldOrigin::Own => owner,
    FieldOrigin::Inherited { source } | FieldOrigin::Variant { source } => source,
  }
}

/// Raw property fragment as written in the declaring schema.
pub(crate) fn property_site<'a>(sources: &'a [NodeSource], declaring: SchemaId, name: &str) -> Option<&'a Value> {
  sources.get(declaring.index())?.fragment.property(name)
}

fn site_nullable(site: &Value) -> bool {
  site.as_object().is_some_and(|site| site.is_nullable())
}

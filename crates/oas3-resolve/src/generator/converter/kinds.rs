use oas3::spec::SchemaType;

use crate::{
  generator::{
    ast::{Field, FieldOrigin, NodeKind, PrimitiveKind, SchemaGraph, SchemaId},
    metrics::ResolutionWarning,
    schema_registry::NodeSource,
  },
  utils::SchemaExt,
};

/// Assigns the kind, own fields, required set and nullability of every node
/// that is not a composition. Compositions are finished by later passes.
pub(crate) fn classify_nodes(graph: &mut SchemaGraph, sources: &[NodeSource]) -> Vec<ResolutionWarning> {
  let mut warnings = vec![];
  for (id, source) in graph.ids().zip(sources) {
    let kind = classify(id, source, graph, &mut warnings);
    let Some(node) = graph.get_mut(id) else {
      continue;
    };
    let fragment = &source.fragment;
    node.kind = kind;
    node.nullable = fragment.is_nullable();
    node.required = fragment.required_names();
    node.fields = source
      .links
      .properties
      .iter()
      .map(|(name, target)| Field::new(name, *target, node.required.contains(name), FieldOrigin::Own))
      .collect();
  }
  warnings
}

fn classify(
  id: SchemaId,
  source: &NodeSource,
  graph: &SchemaGraph,
  warnings: &mut Vec<ResolutionWarning>,
) -> NodeKind {
  let fragment = &source.fragment;
  let location = || graph.get(id).map(|node| node.location.to_string()).unwrap_or_default();

  if source.synthetic {
    return NodeKind::Object;
  }

  // Compositions and unions are rewritten later; placeholder kind only.
  if !source.links.all_of.is_empty() || !source.links.one_of.is_empty() || !source.links.any_of.is_empty() {
    return NodeKind::Object;
  }

  if let Some(values) = fragment.enum_values() {
    let values = values.into_iter().filter(|value| !value.is_null()).collect::<Vec<_>>();
    return if values.is_empty() {
      NodeKind::Primitive(PrimitiveKind::Null)
    } else {
      NodeKind::Enum { values }
    };
  }

  let object_like = || {
    if source.links.properties.is_empty() && fragment.additional_properties().is_declared() {
      if fragment.get("additionalProperties").and_then(serde_json::Value::as_bool) == Some(false) {
        NodeKind::Object
      } else {
        NodeKind::Map {
          values: source.links.additional,
        }
      }
    } else {
      NodeKind::Object
    }
  };

  match fragment.non_null_types().as_slice() {
    [] => {
      if !source.links.properties.is_empty() || fragment.additional_properties().is_declared() {
        object_like()
      } else if fragment.items().is_some() {
        NodeKind::Array {
          items: source.links.items,
        }
      } else if fragment.is_null_schema() {
        NodeKind::Primitive(PrimitiveKind::Null)
      } else {
        NodeKind::Primitive(PrimitiveKind::Any)
      }
    }
    [SchemaType::Object] => {
      if source.links.properties.is_empty() && !fragment.additional_properties().is_declared() {
        NodeKind::Primitive(PrimitiveKind::Any)
      } else {
        object_like()
      }
    }
    [SchemaType::Array] => NodeKind::Array {
      items: source.links.items,
    },
    [SchemaType::String] => NodeKind::Primitive(PrimitiveKind::String),
    [SchemaType::Integer] => NodeKind::Primitive(PrimitiveKind::Integer),
    [SchemaType::Number] => NodeKind::Primitive(PrimitiveKind::Number),
    [SchemaType::Boolean] => NodeKind::Primitive(PrimitiveKind::Boolean),
    [SchemaType::Null] => NodeKind::Primitive(PrimitiveKind::Null),
    _ => {
      warnings.push(ResolutionWarning::MultipleTypes { location: location() });
      NodeKind::Primitive(PrimitiveKind::Any)
    }
  }
}

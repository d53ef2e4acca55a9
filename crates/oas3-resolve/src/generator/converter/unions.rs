use crate::{
  generator::{
    ast::{Composition, NodeKind, PrimitiveKind, SchemaGraph, SchemaId, UnionDescriptor, UnionKind},
    metrics::ResolutionWarning,
    schema_registry::NodeSource,
  },
  utils::SchemaExt,
};

/// Turns `oneOf`/`anyOf` nodes into unions.
///
/// Null members are folded into the union's nullability. A union left with a
/// single member becomes a wrapper around it. Nodes that also declare `allOf`
/// are left to composition, which re-exposes the union.
pub(crate) fn resolve_unions(graph: &mut SchemaGraph, sources: &[NodeSource]) -> Vec<ResolutionWarning> {
  let mut warnings = vec![];

  for (id, source) in graph.ids().zip(sources) {
    let Some((kind, members)) = declared_union(source) else {
      continue;
    };
    let fragment = &source.fragment;
    let Some(location) = graph.get(id).map(|node| node.location.to_string()) else {
      continue;
    };

    if kind == UnionKind::OneOf && !source.links.any_of.is_empty() {
      warnings.push(ResolutionWarning::AnyOfIgnored { location });
    }

    let (nulls, non_null): (Vec<SchemaId>, Vec<SchemaId>) =
      members.iter().copied().partition(|member| is_null_member(sources, *member));
    let descriptor = UnionDescriptor::new(kind, non_null);

    if !source.links.all_of.is_empty() {
      if let Some(node) = graph.get_mut(id) {
        node.nullable |= !nulls.is_empty();
        node.composition = Some(Composition {
          embedded_union: Some(descriptor),
          ..Composition::default()
        });
      }
      continue;
    }

    let Some(node) = graph.get_mut(id) else {
      continue;
    };
    node.nullable |= !nulls.is_empty();

    if !source.links.properties.is_empty() {
      node.kind = NodeKind::Object;
      node.composition = Some(Composition {
        embedded_union: Some(descriptor),
        ..Composition::default()
      });
      continue;
    }

    node.kind = match descriptor.members.as_slice() {
      [] if nulls.is_empty() => NodeKind::Primitive(PrimitiveKind::Any),
      [] => NodeKind::Primitive(PrimitiveKind::Null),
      [single] if fragment.is_only(kind.keyword()) => NodeKind::Reference(*single),
      _ => NodeKind::Union(descriptor),
    };
  }

  warnings
}

/// The union keyword that applies to a node, `oneOf` taking precedence.
fn declared_union(source: &NodeSource) -> Option<(UnionKind, &[SchemaId])> {
  if !source.links.one_of.is_empty() {
    Some((UnionKind::OneOf, &source.links.one_of))
  } else if !source.links.any_of.is_empty() {
    Some((UnionKind::AnyOf, &source.links.any_of))
  } else {
    None
  }
}

fn is_null_member(sources: &[NodeSource], member: SchemaId) -> bool {
  sources
    .get(member.index())
    .is_some_and(|source| source.fragment.is_null_schema())
}

use std::collections::{BTreeMap, BTreeSet, HashSet};

use indexmap::IndexMap;

use crate::{
  generator::{
    ast::{DiscriminatorDescriptor, DiscriminatorView, NodeKind, SchemaGraph, SchemaId, SchemaNode, UnionDescriptor},
    metrics::ResolutionWarning,
    schema_registry::NodeSource,
  },
  utils::SchemaExt,
};

/// Builds the tag mapping of every declared discriminator.
///
/// Explicit mapping entries come first. Members without an explicit tag get
/// their bare component name. A discriminator on a schema that is not a union
/// maps the schemas inheriting from it through `allOf`, transitively.
/// Mapping targets are stored as the nodes they present, wrappers followed.
pub(crate) fn attach_discriminators(graph: &mut SchemaGraph, sources: &[NodeSource]) -> Vec<ResolutionWarning> {
  let mut warnings = vec![];
  let children = inheritance_children(graph, sources);

  for (id, source) in graph.ids().zip(sources) {
    let Some(discriminator) = source.fragment.discriminator() else {
      continue;
    };
    let Some(node) = graph.get(id) else {
      continue;
    };
    let location = node.location.to_string();
    let union_members = node
      .union()
      .map(|union| union.members.iter().map(|member| graph.resolve(*member)).collect::<Vec<_>>());

    let mut mapping = IndexMap::new();
    for (tag, target) in &source.links.mapping {
      let target = graph.resolve(*target);
      if let Some(members) = &union_members
        && !members.contains(&target)
      {
        warnings.push(ResolutionWarning::DiscriminatorMappingOutsideUnion {
          location: location.clone(),
          tag: tag.clone(),
        });
      }
      mapping.entry(tag.clone()).or_insert(target);
    }

    let implicit = union_members.unwrap_or_else(|| descendants(id, &children).into_iter().collect());
    for member in implicit {
      if mapping.values().any(|target| *target == member) {
        continue;
      }
      if let Some(name) = graph.get(member).and_then(|node| node.location.bare_name()) {
        mapping.entry(name).or_insert(member);
      }
    }

    let descriptor = DiscriminatorDescriptor {
      property_name: discriminator.property_name,
      mapping,
      owner: id,
    };
    if let Some(node) = graph.get_mut(id) {
      if let Some(union) = union_mut(node) {
        union.discriminator = Some(descriptor.clone());
      }
      node.discriminator = Some(descriptor);
    }
  }

  attach_views(graph);
  warnings
}

fn union_mut(node: &mut SchemaNode) -> Option<&mut UnionDescriptor> {
  match &mut node.kind {
    NodeKind::Union(union) => Some(union),
    _ => node.composition.as_mut()?.embedded_union.as_mut(),
  }
}

/// Schemas listing each node as an `allOf` member. Single-member `allOf`
/// wrappers only present their member and are not children of it.
fn inheritance_children(graph: &SchemaGraph, sources: &[NodeSource]) -> BTreeMap<SchemaId, BTreeSet<SchemaId>> {
  let mut children = BTreeMap::<SchemaId, BTreeSet<SchemaId>>::new();
  for (id, source) in graph.ids().zip(sources) {
    let all_of = &source.links.all_of;
    if all_of.len() == 1 && source.fragment.is_only("allOf") {
      continue;
    }
    for member in all_of {
      children.entry(graph.resolve(*member)).or_default().insert(id);
    }
  }
  children
}

fn descendants(base: SchemaId, children: &BTreeMap<SchemaId, BTreeSet<SchemaId>>) -> BTreeSet<SchemaId> {
  let mut found = BTreeSet::new();
  let mut stack = vec![base];
  while let Some(id) = stack.pop() {
    for child in children.get(&id).into_iter().flatten() {
      if *child != base && found.insert(*child) {
        stack.push(*child);
      }
    }
  }
  found
}

/// One view per discriminating ancestor of every mapped node. A node reached
/// through an intermediate that is itself mapped by an outer discriminator
/// also gets the outer view, with the intermediates recorded in `via`.
fn attach_views(graph: &mut SchemaGraph) {
  let mut direct = BTreeMap::<SchemaId, Vec<DiscriminatorView>>::new();
  for node in graph.iter() {
    let Some(descriptor) = &node.discriminator else {
      continue;
    };
    let targets = descriptor.mapping.values().copied().collect::<BTreeSet<_>>();
    for target in targets {
      direct.entry(target).or_default().push(DiscriminatorView {
        ancestor: node.id,
        property_name: descriptor.property_name.clone(),
        tags: descriptor.tags_for(target),
        via: vec![],
      });
    }
  }

  let mut views = BTreeMap::new();
  for id in direct.keys() {
    let mut visiting = HashSet::new();
    let collected = collect_views(*id, &direct, &mut visiting);
    views.insert(*id, collected);
  }

  for (id, views) in views {
    if let Some(node) = graph.get_mut(id) {
      node.discriminator_views = views;
    }
  }
}

fn collect_views(
  id: SchemaId,
  direct: &BTreeMap<SchemaId, Vec<DiscriminatorView>>,
  visiting: &mut HashSet<SchemaId>,
) -> Vec<DiscriminatorView> {
  let own = direct.get(&id).cloned().unwrap_or_default();
  if !visiting.insert(id) {
    return own;
  }

  let mut all = BTreeSet::new();
  for view in &own {
    if view.ancestor == id {
      continue;
    }
    for outer in collect_views(view.ancestor, direct, visiting) {
      let mut via = outer.via;
      via.push(view.ancestor);
      all.insert(DiscriminatorView { via, ..outer });
    }
  }
  all.extend(own);
  visiting.remove(&id);
  all.into_iter().collect()
}

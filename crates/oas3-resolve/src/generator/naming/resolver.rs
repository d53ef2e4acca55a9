use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use super::{
  constants::{INNER_SUFFIX, ITEM_SUFFIX, UNNAMED_TYPE, VALUE_SUFFIX, VARIANT_PREFIX},
  identifiers::{ensure_unique, pascal_segment, to_type_name},
};
use crate::{
  generator::{
    ast::{
      AdditionalProperties, DocumentId, FieldOrigin, NamedType, Namespace, NodeKind, SchemaGraph, SchemaId, TypeOrigin,
    },
    config::{NamingScope, ResolverConfig},
    errors::ResolutionError,
    metrics::ResolutionStats,
    operation_registry::TypeRoot,
    schema_registry::NodeSource,
  },
  utils::SchemaExt,
};

/// Result of naming: every named type in assignment order.
#[derive(Debug, Default)]
pub(crate) struct NameAssignment {
  pub named: Vec<NamedType>,
  pub errors: Vec<ResolutionError>,
}

/// Child of a node that may need its own name.
struct NestedCandidate {
  id: SchemaId,
  segment: String,
  path: String,
}

/// Assigns a unique name to every type that needs one.
///
/// Names are claimed in a fixed order: override extensions first, then
/// component schemas in document order, then operation and component roots in
/// collection order, then inline types nested in already named ones. A claim
/// takes the first free candidate, or the last candidate with the smallest free
/// numeric suffix, so the same input always yields the same names.
pub(crate) struct NameResolver<'a> {
  graph: &'a SchemaGraph,
  sources: &'a [NodeSource],
  config: &'a ResolverConfig,
  tables: BTreeMap<Namespace, BTreeSet<String>>,
  reserved: BTreeSet<String>,
  overrides: HashMap<SchemaId, String>,
  by_id: HashMap<SchemaId, usize>,
  assignment: NameAssignment,
}

impl<'a> NameResolver<'a> {
  pub(crate) fn new(graph: &'a SchemaGraph, sources: &'a [NodeSource], config: &'a ResolverConfig) -> Self {
    Self {
      graph,
      sources,
      config,
      tables: BTreeMap::new(),
      reserved: BTreeSet::new(),
      overrides: HashMap::new(),
      by_id: HashMap::new(),
      assignment: NameAssignment::default(),
    }
  }

  pub(crate) fn resolve(
    mut self,
    components: &[(String, SchemaId)],
    roots: &[(TypeRoot, SchemaId)],
    stats: &mut ResolutionStats,
  ) -> NameAssignment {
    self.collect_overrides();
    self.name_components(components, stats);
    self.name_roots(roots, stats);
    self.name_nested(stats);
    self.assignment
  }

  /// Reserves override names up front. Two schemas claiming the same override
  /// name cannot both be satisfied.
  fn collect_overrides(&mut self) {
    let extension = self.config.override_extension.as_str();
    let mut claims = BTreeMap::<String, Vec<SchemaId>>::new();
    for (id, source) in self.graph.ids().zip(self.sources) {
      if let Some(name) = source.fragment.extension(extension) {
        claims.entry(name.to_string()).or_default().push(id);
      }
    }

    for (name, ids) in claims {
      if let [id] = ids.as_slice() {
        self.overrides.insert(*id, name.clone());
      } else {
        let claimants = ids
          .iter()
          .filter_map(|id| self.graph.get(*id).map(|node| node.location.clone()))
          .collect();
        self.assignment.errors.push(ResolutionError::NameCollisionUnresolvable {
          name: name.clone(),
          claimants,
        });
      }
      self.reserved.insert(name);
    }
  }

  fn name_components(&mut self, components: &[(String, SchemaId)], stats: &mut ResolutionStats) {
    for (name, id) in components {
      let Some(node) = self.graph.get(*id) else {
        continue;
      };
      // Pure aliases share the node of their target and are listed as its aliases.
      if node.location.document != DocumentId::Root
        || node.location.schema_component().as_deref() != Some(name.as_str())
      {
        continue;
      }
      let origin = TypeOrigin::Component { name: name.clone() };
      self.claim(*id, Namespace::Schema, &[to_type_name(name)], origin, stats);
    }

    let external = self
      .graph
      .iter()
      .filter(|node| node.location.document != DocumentId::Root)
      .filter_map(|node| Some((node.id, node.location.bare_name()?)))
      .collect::<Vec<_>>();
    for (id, name) in external {
      if self.by_id.contains_key(&id) {
        continue;
      }
      let candidate = to_type_name(&name);
      self.claim(id, Namespace::Schema, &[candidate], TypeOrigin::Component { name }, stats);
    }
  }

  fn name_roots(&mut self, roots: &[(TypeRoot, SchemaId)], stats: &mut ResolutionStats) {
    for (root, id) in roots {
      if self.by_id.contains_key(id) {
        continue;
      }
      self.claim(*id, root.namespace, &root.candidates, root.origin.clone(), stats);
    }
  }

  /// Names inline objects, enums and unions under their closest named parent,
  /// walking through unnamed arrays, maps and wrappers.
  fn name_nested(&mut self, stats: &mut ResolutionStats) {
    let mut index = 0;
    while index < self.assignment.named.len() {
      let parent = self.assignment.named[index].clone();
      index += 1;

      let mut queue = VecDeque::from([(parent.id, parent.name.clone(), String::new())]);
      let mut visited = HashSet::from([parent.id]);
      while let Some((id, base, path)) = queue.pop_front() {
        for child in self.nested_candidates(id) {
          let target = self.graph.resolve(child.id);
          if self.by_id.contains_key(&target) || !visited.insert(target) {
            continue;
          }
          let candidate = format!("{base}{}", child.segment);
          let path = match (path.is_empty(), child.path.is_empty()) {
            (_, true) => path.clone(),
            (true, false) => child.path,
            (false, false) => format!("{path}/{}", child.path),
          };
          if self.needs_name(target) {
            let origin = TypeOrigin::Nested {
              parent: parent.id,
              path,
            };
            self.claim(target, parent.namespace, &[candidate], origin, stats);
          } else {
            queue.push_back((target, candidate, path));
          }
        }
      }
    }
  }

  fn nested_candidates(&self, id: SchemaId) -> Vec<NestedCandidate> {
    let Some(node) = self.graph.get(id) else {
      return vec![];
    };
    let mut children = vec![];
    match &node.kind {
      NodeKind::Object => {
        for field in &node.fields {
          match field.origin {
            FieldOrigin::Variant { .. } => continue,
            FieldOrigin::Inherited { source } if self.by_id.contains_key(&source) => continue,
            _ => {}
          }
          let mut segment = pascal_segment(&field.name);
          if segment.is_empty() {
            segment = UNNAMED_TYPE.to_string();
          }
          children.push(NestedCandidate {
            id: field.target,
            segment,
            path: format!("properties/{}", field.name),
          });
        }
        if let AdditionalProperties::OpenTyped(values) = node.additional_properties {
          children.push(NestedCandidate {
            id: values,
            segment: VALUE_SUFFIX.to_string(),
            path: "additionalProperties".to_string(),
          });
        }
        if let Some(union) = node.composition.as_ref().and_then(|composition| composition.embedded_union.as_ref()) {
          children.extend(variant_candidates(union.kind.keyword(), &union.members));
        }
      }
      NodeKind::Array { items: Some(items) } => children.push(NestedCandidate {
        id: *items,
        segment: ITEM_SUFFIX.to_string(),
        path: "items".to_string(),
      }),
      NodeKind::Map { values: Some(values) } => children.push(NestedCandidate {
        id: *values,
        segment: VALUE_SUFFIX.to_string(),
        path: "additionalProperties".to_string(),
      }),
      NodeKind::Union(union) => children.extend(variant_candidates(union.kind.keyword(), &union.members)),
      NodeKind::Reference(target) => children.push(NestedCandidate {
        id: *target,
        segment: INNER_SUFFIX.to_string(),
        path: String::new(),
      }),
      _ => {}
    }
    children
  }

  /// Objects with fields, enums and unions need a definition of their own;
  /// so does anything carrying a name override.
  fn needs_name(&self, id: SchemaId) -> bool {
    if self.overrides.contains_key(&id) {
      return true;
    }
    self.graph.get(id).is_some_and(|node| match &node.kind {
      NodeKind::Object => !node.fields.is_empty() || node.union().is_some(),
      NodeKind::Enum { .. } | NodeKind::Union(_) => true,
      _ => false,
    })
  }

  fn table_key(&self, namespace: Namespace) -> Namespace {
    match self.config.naming_scope {
      NamingScope::Shared => Namespace::Schema,
      NamingScope::PerNamespace => namespace,
    }
  }

  fn is_taken(&self, namespace: Namespace, name: &str) -> bool {
    self.reserved.contains(name)
      || self
        .tables
        .get(&self.table_key(namespace))
        .is_some_and(|table| table.contains(name))
  }

  fn claim(
    &mut self,
    id: SchemaId,
    namespace: Namespace,
    candidates: &[String],
    origin: TypeOrigin,
    stats: &mut ResolutionStats,
  ) {
    let (name, overridden) = match self.overrides.get(&id) {
      Some(name) => {
        stats.record_override();
        (name.clone(), true)
      }
      None => {
        let name = candidates
          .iter()
          .find(|candidate| !self.is_taken(namespace, candidate))
          .cloned()
          .unwrap_or_else(|| {
            let last = candidates.last().map_or(UNNAMED_TYPE, String::as_str);
            ensure_unique(last, |name| self.is_taken(namespace, name))
          });
        if candidates.first() != Some(&name) {
          stats.record_rename();
        }
        (name, false)
      }
    };

    let key = self.table_key(namespace);
    self.tables.entry(key).or_default().insert(name.clone());
    stats.record_named_type(namespace);

    let aliases = self
      .graph
      .get(id)
      .map(|node| node.aliases.iter().filter_map(|alias| alias.bare_name()).collect())
      .unwrap_or_default();

    self.by_id.insert(id, self.assignment.named.len());
    self.assignment.named.push(NamedType {
      id,
      name,
      namespace,
      origin,
      aliases,
      overridden,
    });
  }
}

fn variant_candidates(keyword: &str, members: &[SchemaId]) -> Vec<NestedCandidate> {
  members
    .iter()
    .enumerate()
    .map(|(index, member)| NestedCandidate {
      id: *member,
      segment: format!("{VARIANT_PREFIX}{}", index + 1),
      path: format!("{keyword}/{index}"),
    })
    .collect()
}

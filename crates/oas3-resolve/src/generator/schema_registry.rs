use std::collections::{BTreeSet, HashMap, VecDeque};

use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap, visit::Dfs};
use serde_json::{Map, Value};

use crate::{
  generator::{
    ast::{DocumentId, ReferenceIndex, SchemaGraph, SchemaId, SchemaLocation},
    documents::DocumentSet,
    errors::{CycleKind, ResolutionError, ResolutionErrors, UnresolvedReason},
  },
  utils::{
    SchemaExt,
    refs::{SCHEMA_POINTER_PREFIX, is_bare_schema_name},
    schema_ext::AdditionalPropertiesDecl,
  },
};

pub(crate) const COMPOSITION_KEYWORDS: [&str; 3] = ["allOf", "oneOf", "anyOf"];

/// Outgoing links of one node, resolved to node ids.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeLinks {
  pub properties: Vec<(String, SchemaId)>,
  pub items: Option<SchemaId>,
  pub additional: Option<SchemaId>,
  pub all_of: Vec<SchemaId>,
  pub one_of: Vec<SchemaId>,
  pub any_of: Vec<SchemaId>,
  /// Explicit `discriminator.mapping` targets in document order.
  pub mapping: Vec<(String, SchemaId)>,
}

impl NodeLinks {
  /// Links that embed the target's value in this node's value.
  pub(crate) fn structural(&self) -> impl Iterator<Item = SchemaId> + '_ {
    self
      .properties
      .iter()
      .map(|(_, id)| *id)
      .chain(self.items)
      .chain(self.additional)
      .chain(self.all_of.iter().copied())
      .chain(self.one_of.iter().copied())
      .chain(self.any_of.iter().copied())
  }

  pub(crate) fn all(&self) -> impl Iterator<Item = SchemaId> + '_ {
    self.structural().chain(self.mapping.iter().map(|(_, id)| *id))
  }

  /// `allOf`, `oneOf` and `anyOf` members, which share this node's value.
  pub(crate) fn composition(&self) -> impl Iterator<Item = SchemaId> + '_ {
    self
      .all_of
      .iter()
      .chain(&self.one_of)
      .chain(&self.any_of)
      .copied()
  }
}

/// Raw fragment and links of a node, indexed like the graph.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeSource {
  pub fragment: Map<String, Value>,
  pub links: NodeLinks,
  /// Built from operation parameters rather than read from a document.
  pub synthetic: bool,
}

/// Output of reference resolution: the node arena with raw sources and the
/// index of every `$ref` string seen.
#[derive(Debug, Clone, Default)]
pub(crate) struct RegistryOutput {
  pub graph: SchemaGraph,
  pub sources: Vec<NodeSource>,
  pub references: ReferenceIndex,
  /// Component schemas of the root document in document order.
  pub components: Vec<(String, SchemaId)>,
  pub orphaned_components: usize,
  pub cycles: Vec<Vec<SchemaId>>,
}

/// Builds the node arena from a document set.
///
/// Every location is memoized before its children are expanded, so recursive
/// schemas resolve to the same node instead of expanding forever. Pure `$ref`
/// objects never become nodes of their own; they collapse onto their target.
pub(crate) struct SchemaRegistry<'a> {
  documents: &'a DocumentSet,
  graph: SchemaGraph,
  sources: Vec<NodeSource>,
  memo: HashMap<SchemaLocation, SchemaId>,
  references: ReferenceIndex,
  pending: VecDeque<SchemaId>,
  errors: ResolutionErrors,
}

impl<'a> SchemaRegistry<'a> {
  pub(crate) fn new(documents: &'a DocumentSet) -> Self {
    Self {
      documents,
      graph: SchemaGraph::default(),
      sources: vec![],
      memo: HashMap::new(),
      references: ReferenceIndex::default(),
      pending: VecDeque::new(),
      errors: ResolutionErrors::default(),
    }
  }

  /// Root document component schemas, in document order.
  pub(crate) fn component_locations(&self) -> Vec<(String, SchemaLocation)> {
    self
      .documents
      .root()
      .pointer("/components/schemas")
      .and_then(Value::as_object)
      .map(|schemas| {
        schemas
          .keys()
          .map(|name| (name.clone(), SchemaLocation::root("/components/schemas").child([name.as_str()])))
          .collect()
      })
      .unwrap_or_default()
  }

  pub(crate) fn lookup(&self, location: &SchemaLocation) -> Option<SchemaId> {
    self.memo.get(location).copied()
  }

  /// Records that `reference`, written in `document`, resolves to `id`.
  pub(crate) fn index_reference(&mut self, document: DocumentId, reference: &str, id: SchemaId) {
    self.references.insert(document, reference, id);
  }

  /// Interns the schema at `location` and queues it for expansion.
  ///
  /// Failures are recorded and yield `None`; the caller drops the link.
  pub(crate) fn intern(&mut self, location: SchemaLocation) -> Option<SchemaId> {
    match self.try_intern(location) {
      Ok(id) => Some(id),
      Err(error) => {
        self.errors.push(error);
        None
      }
    }
  }

  fn try_intern(&mut self, location: SchemaLocation) -> Result<SchemaId, ResolutionError> {
    let documents = self.documents;
    let mut chain: Vec<SchemaLocation> = vec![];
    let mut references: Vec<(DocumentId, String)> = vec![];
    let mut current = location;

    let id = loop {
      if let Some(id) = self.memo.get(&current) {
        break *id;
      }

      let fragment = match documents.lookup(&current) {
        Some(Value::Object(fragment)) => fragment,
        Some(Value::Bool(_)) => break self.push_node(current, Map::new(), false),
        found => {
          let reason = if found.is_some() {
            UnresolvedReason::NotASchema
          } else {
            UnresolvedReason::MissingPointer
          };
          let from = chain.last().cloned().unwrap_or_else(|| current.clone());
          let reference = references
            .last()
            .map_or_else(|| current.to_string(), |(_, reference)| reference.clone());
          return Err(ResolutionError::UnresolvedReference {
            from,
            reference,
            reason,
          });
        }
      };

      let Some(reference) = fragment.reference() else {
        break self.push_node(current, fragment.clone(), false);
      };

      if let Some(start) = chain.iter().position(|seen| *seen == current) {
        return Err(ResolutionError::CyclicUnsupported {
          kind: CycleKind::ReferenceLoop,
          chain: canonical_cycle(&chain[start..]),
        });
      }

      let next = documents
        .resolve_reference(&current, reference)
        .map_err(|reason| ResolutionError::UnresolvedReference {
          from: current.clone(),
          reference: reference.to_string(),
          reason,
        })?;
      references.push((current.document.clone(), reference.to_string()));
      chain.push(current);
      current = next;
    };

    for location in chain {
      if location.is_schema_component()
        && let Some(node) = self.graph.get_mut(id)
        && node.location != location
        && !node.aliases.contains(&location)
      {
        node.aliases.push(location.clone());
      }
      self.memo.insert(location, id);
    }
    for (document, reference) in references {
      self.references.insert(document, &reference, id);
    }
    Ok(id)
  }

  fn push_node(&mut self, location: SchemaLocation, fragment: Map<String, Value>, synthetic: bool) -> SchemaId {
    let id = self.graph.push(location.clone());
    if let Some(node) = self.graph.get_mut(id) {
      node.title = fragment.get("title").and_then(Value::as_str).map(String::from);
      node.description = fragment.get("description").and_then(Value::as_str).map(String::from);
    }
    self.sources.push(NodeSource {
      fragment,
      links: NodeLinks::default(),
      synthetic,
    });
    self.memo.insert(location, id);
    if !synthetic {
      self.pending.push_back(id);
    }
    id
  }

  /// Registers a node that does not exist in any document, with links already resolved.
  pub(crate) fn intern_synthetic(
    &mut self,
    location: SchemaLocation,
    fragment: Map<String, Value>,
    links: NodeLinks,
  ) -> SchemaId {
    if let Some(id) = self.memo.get(&location) {
      return *id;
    }
    let id = self.push_node(location, fragment, true);
    if let Some(source) = self.sources.get_mut(id.index()) {
      source.links = links;
    }
    id
  }

  /// Expands queued nodes until every reachable schema has been resolved.
  pub(crate) fn expand_all(&mut self) {
    while let Some(id) = self.pending.pop_front() {
      self.expand(id);
    }
  }

  fn expand(&mut self, id: SchemaId) {
    let Some(location) = self.graph.get(id).map(|node| node.location.clone()) else {
      return;
    };
    let Some(fragment) = self.sources.get(id.index()).map(|source| source.fragment.clone()) else {
      return;
    };

    let mut links = NodeLinks::default();

    for name in fragment.property_names() {
      if let Some(child) = self.intern(location.child(["properties", name])) {
        links.properties.push((name.to_string(), child));
      }
    }

    if fragment.items().is_some() {
      links.items = self.intern(location.child(["items"]));
    }

    if let AdditionalPropertiesDecl::Schema(schema) = fragment.additional_properties()
      && schema.as_object().is_some_and(|schema| !schema.is_empty())
    {
      links.additional = self.intern(location.child(["additionalProperties"]));
    }

    for keyword in COMPOSITION_KEYWORDS {
      let members = (0..fragment.members(keyword).len())
        .filter_map(|index| {
          let index = index.to_string();
          self.intern(location.child([keyword, index.as_str()]))
        })
        .collect::<Vec<_>>();
      match keyword {
        "allOf" => links.all_of = members,
        "oneOf" => links.one_of = members,
        _ => links.any_of = members,
      }
    }

    for (tag, target) in fragment.discriminator_mapping() {
      let reference = if is_bare_schema_name(target) {
        format!("#{SCHEMA_POINTER_PREFIX}{target}")
      } else {
        target.to_string()
      };
      match self.documents.resolve_reference(&location, &reference) {
        Ok(target_location) => {
          if let Some(member) = self.intern(target_location) {
            self.references.insert(location.document.clone(), target, member);
            links.mapping.push((tag.to_string(), member));
          }
        }
        Err(reason) => self.errors.push(ResolutionError::UnresolvedReference {
          from: location.child(["discriminator", "mapping", tag]),
          reference: target.to_string(),
          reason,
        }),
      }
    }

    if let Some(source) = self.sources.get_mut(id.index()) {
      source.links = links;
    }
  }

  /// Strongly connected components over structural links. Every member is
  /// marked `cyclic`.
  fn detect_cycles(&mut self) -> Vec<Vec<SchemaId>> {
    let graph = self.link_graph(|links| links.structural().collect());
    let cycles = strongly_connected(&graph);
    for id in cycles.iter().flatten() {
      if let Some(node) = self.graph.get_mut(*id) {
        node.cyclic = true;
      }
    }
    cycles
  }

  /// Composition that reaches back to itself without passing a property, item
  /// or additional-properties link describes a value containing itself.
  fn detect_composition_cycles(&mut self) {
    let graph = self.link_graph(|links| links.composition().collect());
    for cycle in strongly_connected(&graph) {
      let members = cycle.iter().copied().collect::<BTreeSet<_>>();
      let union_edge = cycle.iter().any(|id| {
        self.sources.get(id.index()).is_some_and(|source| {
          source
            .links
            .one_of
            .iter()
            .chain(&source.links.any_of)
            .any(|target| members.contains(target))
        })
      });
      let chain = cycle
        .iter()
        .filter_map(|id| self.graph.get(*id).map(|node| node.location.clone()))
        .collect::<Vec<_>>();
      self.errors.push(ResolutionError::CyclicUnsupported {
        kind: if union_edge {
          CycleKind::CompositionLoop
        } else {
          CycleKind::AllOfInheritance
        },
        chain: canonical_cycle(&chain),
      });
    }
  }

  fn link_graph(&self, edges: impl Fn(&NodeLinks) -> Vec<SchemaId>) -> DiGraphMap<SchemaId, ()> {
    let mut graph = DiGraphMap::new();
    for (id, source) in self.graph.ids().zip(&self.sources) {
      graph.add_node(id);
      for target in edges(&source.links) {
        graph.add_edge(id, target, ());
      }
    }
    graph
  }

  /// Nodes reachable from `roots` through any link, discriminator mappings included.
  pub(crate) fn reachable_from(&self, roots: &[SchemaId]) -> BTreeSet<SchemaId> {
    let graph = self.link_graph(|links| links.all().collect());
    let mut reachable = BTreeSet::new();
    let Some(first) = roots.first() else {
      return reachable;
    };
    let mut dfs = Dfs::new(&graph, *first);
    for root in roots {
      if reachable.contains(root) {
        continue;
      }
      dfs.move_to(*root);
      while let Some(id) = dfs.next(&graph) {
        reachable.insert(id);
      }
    }
    reachable
  }

  /// Finishes resolution. `roots` are the operation entry points used to count
  /// orphaned components.
  pub(crate) fn finish(mut self, roots: &[SchemaId]) -> (RegistryOutput, ResolutionErrors) {
    self.expand_all();
    let cycles = self.detect_cycles();
    self.detect_composition_cycles();

    let reachable = self.reachable_from(roots);
    let mut orphaned_components = 0;
    let mut components = vec![];
    for (name, location) in self.component_locations() {
      match self.lookup(&location) {
        Some(id) => {
          if !reachable.contains(&id) {
            orphaned_components += 1;
          }
          components.push((name, id));
        }
        None => orphaned_components += 1,
      }
    }

    let output = RegistryOutput {
      graph: self.graph,
      sources: self.sources,
      references: self.references,
      components,
      orphaned_components,
      cycles,
    };
    (output, self.errors)
  }
}

fn strongly_connected(graph: &DiGraphMap<SchemaId, ()>) -> Vec<Vec<SchemaId>> {
  let mut cycles = kosaraju_scc(graph)
    .into_iter()
    .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
    .map(|mut scc| {
      scc.sort();
      scc
    })
    .collect::<Vec<_>>();
  cycles.sort();
  cycles
}

/// Rotates a cycle so it starts at its smallest location and closes on it,
/// which makes the same loop reported from different entry points identical.
fn canonical_cycle(cycle: &[SchemaLocation]) -> Vec<SchemaLocation> {
  let start = cycle
    .iter()
    .enumerate()
    .min_by(|(_, a), (_, b)| a.cmp(b))
    .map_or(0, |(index, _)| index);
  let mut chain = cycle[start..].iter().chain(&cycle[..start]).cloned().collect::<Vec<_>>();
  if let Some(first) = chain.first().cloned() {
    chain.push(first);
  }
  chain
}

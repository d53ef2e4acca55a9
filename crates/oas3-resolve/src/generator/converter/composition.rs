use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;

use crate::{
  generator::{
    ast::{
      Composition, Field, FieldOrigin, FieldOverride, NodeKind, PrimitiveKind, SchemaGraph, SchemaId, UnionDescriptor,
    },
    schema_registry::NodeSource,
  },
  utils::SchemaExt,
};

#[derive(Debug, Default)]
struct MergeAccumulator {
  fields: IndexMap<String, Field>,
  variant_fields: IndexMap<String, Field>,
  required: BTreeSet<String>,
  overrides: Vec<FieldOverride>,
  embedded_union: Option<UnionDescriptor>,
  open_map_members: Vec<SchemaId>,
  structured: bool,
  scalars: Vec<SchemaId>,
}

impl MergeAccumulator {
  /// Later declarations replace earlier ones in place.
  fn merge_field(&mut self, field: Field) {
    match self.fields.get_mut(&field.name) {
      Some(existing) => {
        if existing.origin != field.origin || existing.target != field.target {
          self.overrides.push(FieldOverride {
            name: field.name.clone(),
            replaced: existing.origin,
            by: field.origin,
          });
        }
        *existing = field;
      }
      None => {
        self.fields.insert(field.name.clone(), field);
      }
    }
  }

  fn merge_variant_field(&mut self, field: Field) {
    self.variant_fields.entry(field.name.clone()).or_insert(field);
  }

  fn into_fields(self) -> (Vec<Field>, BTreeSet<String>, Composition) {
    let Self {
      mut fields,
      variant_fields,
      required,
      overrides,
      embedded_union,
      open_map_members,
      ..
    } = self;
    for (name, field) in variant_fields {
      fields.entry(name).or_insert(field);
    }
    let fields = fields
      .into_values()
      .map(|mut field| {
        field.required = !field.origin.is_exclusive() && required.contains(&field.name);
        field
      })
      .collect();
    let composition = Composition {
      members: vec![],
      embedded_union,
      open_map_members,
      overrides,
    };
    (fields, required, composition)
  }
}

/// Flattens `allOf` compositions into a single field set.
///
/// Members are merged in declaration order and the composite's own properties
/// last, each later field replacing an earlier one of the same name. Required
/// sets are unioned. Nested compositions are flattened first.
pub(crate) struct CompositionResolver<'a> {
  graph: &'a mut SchemaGraph,
  sources: &'a [NodeSource],
  done: HashSet<SchemaId>,
  in_progress: HashSet<SchemaId>,
}

impl<'a> CompositionResolver<'a> {
  pub(crate) fn new(graph: &'a mut SchemaGraph, sources: &'a [NodeSource]) -> Self {
    Self {
      graph,
      sources,
      done: HashSet::new(),
      in_progress: HashSet::new(),
    }
  }

  pub(crate) fn run(mut self) {
    for id in self.graph.ids() {
      if self.is_composite(id) {
        self.flatten(id);
      }
    }
  }

  fn is_composite(&self, id: SchemaId) -> bool {
    self
      .sources
      .get(id.index())
      .is_some_and(|source| !source.links.all_of.is_empty())
  }

  fn flatten(&mut self, id: SchemaId) {
    if self.done.contains(&id) || !self.in_progress.insert(id) {
      return;
    }
    let sources = self.sources;
    let Some(source) = sources.get(id.index()) else {
      return;
    };
    let own_union = self
      .graph
      .get(id)
      .and_then(|node| node.composition.as_ref())
      .and_then(|composition| composition.embedded_union.clone());

    if let [single] = source.links.all_of.as_slice()
      && own_union.is_none()
      && source.fragment.is_only("allOf")
    {
      self.finish(id, NodeKind::Reference(*single), None);
      return;
    }

    let mut acc = MergeAccumulator::default();
    for member in &source.links.all_of {
      let resolved = self.graph.resolve(*member);
      if self.is_composite(resolved) {
        self.flatten(resolved);
      }
      self.merge_member(id, *member, resolved, &mut acc);
    }

    if let Some(union) = own_union {
      acc.embedded_union = None;
      self.expose_union(id, &union, &mut acc);
    }

    for (name, target) in &source.links.properties {
      acc.structured = true;
      acc.merge_field(Field::new(name, *target, false, FieldOrigin::Own));
    }
    acc.required.extend(source.fragment.required_names());

    if !acc.structured
      && acc.embedded_union.is_none()
      && let [scalar] = acc.scalars.as_slice()
    {
      let scalar = *scalar;
      self.finish(id, NodeKind::Reference(scalar), None);
      return;
    }

    let (fields, required, mut composition) = acc.into_fields();
    composition.members.clone_from(&source.links.all_of);
    if let Some(node) = self.graph.get_mut(id) {
      node.fields = fields;
      node.required = required;
    }
    self.finish(id, NodeKind::Object, Some(composition));
  }

  fn finish(&mut self, id: SchemaId, kind: NodeKind, composition: Option<Composition>) {
    if let Some(node) = self.graph.get_mut(id) {
      node.kind = kind;
      node.composition = composition;
    }
    self.in_progress.remove(&id);
    self.done.insert(id);
  }

  fn merge_member(&self, composite: SchemaId, member: SchemaId, resolved: SchemaId, acc: &mut MergeAccumulator) {
    let Some(node) = self.graph.get(resolved) else {
      return;
    };
    match &node.kind {
      NodeKind::Object => {
        acc.structured = true;
        for field in &node.fields {
          let origin = match field.origin {
            FieldOrigin::Own => FieldOrigin::Inherited { source: resolved },
            inherited => inherited,
          };
          let field = Field {
            origin,
            ..field.clone()
          };
          if origin.is_exclusive() {
            acc.merge_variant_field(field);
          } else {
            acc.merge_field(field);
          }
        }
        acc.required.extend(node.required.iter().cloned());
        if let Some(union) = node.union() {
          self.expose_union(composite, union, acc);
        }
      }
      NodeKind::Union(union) => self.expose_union(composite, union, acc),
      NodeKind::Map { .. } => {
        acc.structured = true;
        acc.open_map_members.push(resolved);
      }
      NodeKind::Primitive(PrimitiveKind::Any | PrimitiveKind::Null) => {}
      _ => acc.scalars.push(member),
    }
  }

  /// Re-exposes a member union at the composite, unless one of its variants is
  /// the composite itself, which marks the member as an inheritance base.
  fn expose_union(&self, composite: SchemaId, union: &UnionDescriptor, acc: &mut MergeAccumulator) {
    if acc.embedded_union.is_some() || union.members.iter().any(|member| self.graph.resolve(*member) == composite) {
      return;
    }
    for member in &union.members {
      let member = self.graph.resolve(*member);
      let Some(node) = self.graph.get(member) else {
        continue;
      };
      for field in &node.fields {
        acc.merge_variant_field(Field {
          origin: FieldOrigin::Variant { source: member },
          required: false,
          ..field.clone()
        });
      }
    }
    acc.embedded_union = Some(union.clone());
  }
}

use std::collections::HashMap;

use anyhow::Context;
use json_canon::to_string as to_canonical_json;
use serde_json::{Value, json};

use super::{
  ast::{DocumentId, NamedType, Namespace, ReferenceIndex, SchemaGraph, SchemaId, SchemaNode},
  converter::instance::{InstanceMatcher, InstanceMismatch},
  operation_registry::OperationEntry,
};

/// Output of a successful run: the resolved node graph and the named types a
/// code generator renders.
#[derive(Debug, Clone)]
pub struct ResolvedModel {
  graph: SchemaGraph,
  named: Vec<NamedType>,
  by_id: HashMap<SchemaId, usize>,
  references: ReferenceIndex,
  operations: Vec<OperationEntry>,
}

impl ResolvedModel {
  pub(crate) fn new(
    graph: SchemaGraph,
    named: Vec<NamedType>,
    references: ReferenceIndex,
    operations: Vec<OperationEntry>,
  ) -> Self {
    let by_id = named.iter().enumerate().map(|(index, named)| (named.id, index)).collect();
    Self {
      graph,
      named,
      by_id,
      references,
      operations,
    }
  }

  #[must_use]
  pub const fn graph(&self) -> &SchemaGraph {
    &self.graph
  }

  #[must_use]
  pub fn node(&self, id: SchemaId) -> Option<&SchemaNode> {
    self.graph.get(id)
  }

  /// Named types in assignment order.
  #[must_use]
  pub fn named_types(&self) -> &[NamedType] {
    &self.named
  }

  pub fn types_in(&self, namespace: Namespace) -> impl Iterator<Item = &NamedType> {
    self.named.iter().filter(move |named| named.namespace == namespace)
  }

  /// Named type of `id`, looking through wrappers when `id` itself is unnamed.
  #[must_use]
  pub fn named(&self, id: SchemaId) -> Option<&NamedType> {
    self
      .by_id
      .get(&id)
      .or_else(|| self.by_id.get(&self.graph.resolve(id)))
      .map(|index| &self.named[*index])
  }

  /// First named type called `name`, in any namespace.
  #[must_use]
  pub fn find(&self, name: &str) -> Option<&NamedType> {
    self.named.iter().find(|named| named.name == name)
  }

  #[must_use]
  pub fn find_in(&self, namespace: Namespace, name: &str) -> Option<&NamedType> {
    self
      .named
      .iter()
      .find(|named| named.namespace == namespace && named.name == name)
  }

  /// Named type for a component schema name, aliases included.
  #[must_use]
  pub fn component(&self, name: &str) -> Option<&NamedType> {
    self.named.iter().find(|named| {
      named.namespace == Namespace::Schema
        && (matches!(&named.origin, super::ast::TypeOrigin::Component { name: component } if component == name)
          || named.aliases.iter().any(|alias| alias == name))
    })
  }

  #[must_use]
  pub const fn references(&self) -> &ReferenceIndex {
    &self.references
  }

  /// Node an original `$ref` string written in `document` resolved to.
  #[must_use]
  pub fn lookup_ref(&self, document: &DocumentId, reference: &str) -> Option<SchemaId> {
    self.references.get(document, reference)
  }

  #[must_use]
  pub fn operations(&self) -> &[OperationEntry] {
    &self.operations
  }

  /// Checks a JSON value against a node.
  pub fn check_instance(&self, id: SchemaId, value: &Value) -> Result<(), InstanceMismatch> {
    InstanceMatcher::new(&self.graph).check(id, value)
  }

  /// Fills declared defaults into a decoded value of `id`.
  pub fn apply_defaults(&self, id: SchemaId, value: &mut Value) {
    InstanceMatcher::new(&self.graph).apply_defaults(id, value);
  }

  /// BLAKE3 hash of the canonical JSON of every name, namespace and location.
  ///
  /// Two runs over the same documents produce the same fingerprint.
  pub fn fingerprint(&self) -> anyhow::Result<String> {
    let entries = self
      .named
      .iter()
      .map(|named| {
        let location = self.graph.get(named.id).map(|node| node.location.to_string());
        json!({
          "name": named.name,
          "namespace": named.namespace.to_string(),
          "location": location,
          "aliases": named.aliases,
        })
      })
      .collect::<Vec<_>>();
    let canonical = to_canonical_json(&Value::Array(entries)).context("Failed to create canonical JSON string")?;
    Ok(blake3::hash(canonical.as_bytes()).to_hex().to_string())
  }
}

use std::collections::BTreeMap;

use super::nodes::{DocumentId, SchemaId};
use crate::generator::naming::constants::{PARAMS_SUFFIX, REQUEST_BODY_SUFFIX, RESPONSE_SUFFIX};

/// Kind of declaration a named type was introduced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter)]
pub enum Namespace {
  #[strum(to_string = "schema")]
  Schema,
  #[strum(to_string = "parameter")]
  Parameter,
  #[strum(to_string = "requestBody")]
  RequestBody,
  #[strum(to_string = "response")]
  Response,
}

impl Namespace {
  /// Role suffix appended to the owning operation or component name.
  #[must_use]
  pub const fn role_suffix(self) -> &'static str {
    match self {
      Self::Schema => "",
      Self::Parameter => PARAMS_SUFFIX,
      Self::RequestBody => REQUEST_BODY_SUFFIX,
      Self::Response => RESPONSE_SUFFIX,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeOrigin {
  /// Declared under `components`, keyed by its component name.
  Component { name: String },
  /// Inline schema of an operation's parameters, request body or response.
  Operation { operation_id: String },
  /// Inline type nested in another named type.
  Nested { parent: SchemaId, path: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
  pub id: SchemaId,
  pub name: String,
  pub namespace: Namespace,
  pub origin: TypeOrigin,
  /// Component names that are pure aliases of this type.
  pub aliases: Vec<String>,
  /// Name was taken from the override extension.
  pub overridden: bool,
}

/// Every original `$ref` string, per document, with the node it resolved to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceIndex {
  entries: BTreeMap<(DocumentId, String), SchemaId>,
}

impl ReferenceIndex {
  pub(crate) fn insert(&mut self, document: DocumentId, reference: &str, id: SchemaId) {
    self.entries.entry((document, reference.to_string())).or_insert(id);
  }

  #[must_use]
  pub fn get(&self, document: &DocumentId, reference: &str) -> Option<SchemaId> {
    self.entries.get(&(document.clone(), reference.to_string())).copied()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&DocumentId, &str, SchemaId)> {
    self
      .entries
      .iter()
      .map(|((document, reference), id)| (document, reference.as_str(), *id))
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

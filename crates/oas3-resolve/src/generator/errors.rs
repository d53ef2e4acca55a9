use std::fmt;

use itertools::Itertools;

use super::ast::SchemaLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum UnresolvedReason {
  #[strum(to_string = "no document registered")]
  UnknownDocument,
  #[strum(to_string = "document could not be read")]
  UnreadableDocument,
  #[strum(to_string = "pointer addresses nothing")]
  MissingPointer,
  #[strum(to_string = "target is not a schema object")]
  NotASchema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum CycleKind {
  #[strum(to_string = "$ref alias loop")]
  ReferenceLoop,
  #[strum(to_string = "allOf self-inheritance")]
  AllOfInheritance,
  #[strum(to_string = "oneOf/anyOf composition loop")]
  CompositionLoop,
}

/// Structured failure found while resolving a document set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
  #[error("Unresolved reference '{reference}' at {from}: {reason}")]
  UnresolvedReference {
    from: SchemaLocation,
    reference: String,
    reason: UnresolvedReason,
  },
  #[error("Unsupported cycle ({kind}): {}", .chain.iter().join(" -> "))]
  CyclicUnsupported { kind: CycleKind, chain: Vec<SchemaLocation> },
  #[error("{union} at {location} expected exactly one matching member, found {matched}")]
  AmbiguousUnionMatch {
    location: SchemaLocation,
    union: SchemaLocation,
    matched: usize,
  },
  #[error("Unknown discriminator value '{tag}' for '{property}' of {union} at {location}")]
  DiscriminatorTagUnknown {
    location: SchemaLocation,
    union: SchemaLocation,
    property: String,
    tag: String,
  },
  #[error("Additional property '{key}' at {location} does not match the declared value schema")]
  AdditionalPropertyTypeMismatch { location: SchemaLocation, key: String },
  #[error("Name '{name}' is claimed by more than one override: {}", .claimants.iter().join(", "))]
  NameCollisionUnresolvable { name: String, claimants: Vec<SchemaLocation> },
}

impl ResolutionError {
  #[must_use]
  pub const fn kind(&self) -> &'static str {
    match self {
      Self::UnresolvedReference { .. } => "UnresolvedReference",
      Self::CyclicUnsupported { .. } => "CyclicUnsupported",
      Self::AmbiguousUnionMatch { .. } => "AmbiguousUnionMatch",
      Self::DiscriminatorTagUnknown { .. } => "DiscriminatorTagUnknown",
      Self::AdditionalPropertyTypeMismatch { .. } => "AdditionalPropertyTypeMismatch",
      Self::NameCollisionUnresolvable { .. } => "NameCollisionUnresolvable",
    }
  }
}

/// Every resolution error of a run, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionErrors {
  errors: Vec<ResolutionError>,
}

impl fmt::Display for ResolutionErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} resolution error(s)", self.errors.len())?;
    for error in &self.errors {
      write!(f, "\n  - {error}")?;
    }
    Ok(())
  }
}

impl std::error::Error for ResolutionErrors {}

impl ResolutionErrors {
  pub fn push(&mut self, error: ResolutionError) {
    if !self.errors.contains(&error) {
      self.errors.push(error);
    }
  }

  pub fn extend(&mut self, errors: impl IntoIterator<Item = ResolutionError>) {
    for error in errors {
      self.push(error);
    }
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.errors.is_empty()
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.errors.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = &ResolutionError> {
    self.errors.iter()
  }

  #[must_use]
  pub fn into_vec(self) -> Vec<ResolutionError> {
    self.errors
  }

  /// `Ok(value)` when no error was collected.
  pub fn into_result<T>(self, value: T) -> Result<T, Self> {
    if self.errors.is_empty() { Ok(value) } else { Err(self) }
  }
}

impl IntoIterator for ResolutionErrors {
  type Item = ResolutionError;
  type IntoIter = std::vec::IntoIter<ResolutionError>;

  fn into_iter(self) -> Self::IntoIter {
    self.errors.into_iter()
  }
}

/// Failure to read a document. Only the root document is fatal.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
  #[error("Failed to parse '{name}' as JSON: {source}")]
  Json {
    name: String,
    #[source]
    source: serde_json::Error,
  },
  #[error("Failed to parse '{name}' as YAML: {source}")]
  Yaml {
    name: String,
    #[source]
    source: serde_yaml::Error,
  },
  #[error("Root document is not a valid OpenAPI document: {source}")]
  Spec {
    #[source]
    source: serde_json::Error,
  },
}

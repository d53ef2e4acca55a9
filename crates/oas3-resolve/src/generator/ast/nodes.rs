use std::{collections::BTreeSet, fmt};

use serde_json::Value;
use string_cache::DefaultAtom;

use super::unions::{DiscriminatorDescriptor, DiscriminatorView, UnionDescriptor};
use crate::utils::refs::{SCHEMA_POINTER_PREFIX, component_name, join_pointer, parent_dir, pointer_tokens};

/// Index of a node in the schema arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaId(pub(crate) usize);

impl SchemaId {
  #[must_use]
  pub const fn index(self) -> usize {
    self.0
  }
}

impl fmt::Display for SchemaId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// Document a schema was read from.
///
/// External documents are keyed by their path relative to the root document,
/// normalized so that `./a/../pets.yaml` and `pets.yaml` are the same document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentId {
  Root,
  External(String),
}

impl DocumentId {
  /// Directory used to resolve relative references made from this document.
  #[must_use]
  pub fn dir(&self) -> &str {
    match self {
      Self::Root => "",
      Self::External(path) => parent_dir(path),
    }
  }
}

impl fmt::Display for DocumentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Root => Ok(()),
      Self::External(path) => f.write_str(path),
    }
  }
}

/// Originating location of a schema: its document plus a JSON pointer.
///
/// Two nodes with the same location are the same node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaLocation {
  pub document: DocumentId,
  pub pointer: DefaultAtom,
}

impl SchemaLocation {
  pub fn new(document: DocumentId, pointer: impl AsRef<str>) -> Self {
    Self {
      document,
      pointer: DefaultAtom::from(pointer.as_ref()),
    }
  }

  pub fn root(pointer: impl AsRef<str>) -> Self {
    Self::new(DocumentId::Root, pointer)
  }

  /// Location of a child reached by appending unescaped pointer tokens.
  #[must_use]
  pub fn child<'a>(&self, tokens: impl IntoIterator<Item = &'a str>) -> Self {
    Self::new(self.document.clone(), join_pointer(&self.pointer, tokens))
  }

  /// Component name when this is `#/components/schemas/{name}` of any document.
  #[must_use]
  pub fn schema_component(&self) -> Option<String> {
    component_name(&self.pointer, "schemas")
  }

  /// Bare name used for implicit discriminator tags: the component name, or the
  /// single pointer token of a top-level definition in an external document.
  #[must_use]
  pub fn bare_name(&self) -> Option<String> {
    if let Some(name) = self.schema_component() {
      return Some(name);
    }
    match (&self.document, pointer_tokens(&self.pointer).as_slice()) {
      (DocumentId::External(_), [name]) => Some(name.clone()),
      _ => None,
    }
  }

  #[must_use]
  pub fn is_schema_component(&self) -> bool {
    self.pointer.starts_with(SCHEMA_POINTER_PREFIX) && self.schema_component().is_some()
  }
}

impl fmt::Display for SchemaLocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}#{}", self.document, self.pointer)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PrimitiveKind {
  String,
  Integer,
  Number,
  Boolean,
  Null,
  Any,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
  Object,
  /// `None` items accept any value.
  Array {
    items: Option<SchemaId>,
  },
  Primitive(PrimitiveKind),
  Enum {
    values: Vec<Value>,
  },
  /// Object without properties whose additional properties are declared.
  /// `None` values accept any value.
  Map {
    values: Option<SchemaId>,
  },
  Union(UnionDescriptor),
  /// Transparent wrapper presenting another node, such as `allOf: [$ref]` or
  /// `oneOf: [$ref, {type: null}]`.
  Reference(SchemaId),
}

impl NodeKind {
  #[must_use]
  pub const fn label(&self) -> &'static str {
    match self {
      Self::Object => "object",
      Self::Array { .. } => "array",
      Self::Primitive(_) => "primitive",
      Self::Enum { .. } => "enum",
      Self::Map { .. } => "map",
      Self::Union(_) => "union",
      Self::Reference(_) => "reference",
    }
  }

  #[must_use]
  pub const fn union(&self) -> Option<&UnionDescriptor> {
    match self {
      Self::Union(descriptor) => Some(descriptor),
      _ => None,
    }
  }
}

/// Observable states of a field on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum PresenceState {
  #[strum(to_string = "unspecified")]
  Unspecified,
  #[strum(to_string = "explicit-null")]
  ExplicitNull,
  #[strum(to_string = "present")]
  Present,
}

/// Required × nullable classification of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
pub enum FieldPresence {
  #[strum(to_string = "required")]
  Required,
  #[default]
  #[strum(to_string = "optional")]
  Optional,
  #[strum(to_string = "required-nullable")]
  RequiredNullable,
  #[strum(to_string = "optional-nullable")]
  OptionalNullable,
}

impl FieldPresence {
  #[must_use]
  pub const fn classify(required: bool, nullable: bool) -> Self {
    match (required, nullable) {
      (true, false) => Self::Required,
      (false, false) => Self::Optional,
      (true, true) => Self::RequiredNullable,
      (false, true) => Self::OptionalNullable,
    }
  }

  #[must_use]
  pub const fn is_required(self) -> bool {
    matches!(self, Self::Required | Self::RequiredNullable)
  }

  #[must_use]
  pub const fn is_nullable(self) -> bool {
    matches!(self, Self::RequiredNullable | Self::OptionalNullable)
  }

  /// Nullable fields need a tri-state container to keep explicit null apart from absence.
  #[must_use]
  pub const fn needs_tri_state(self) -> bool {
    self.is_nullable()
  }

  #[must_use]
  pub const fn states(self) -> &'static [PresenceState] {
    match self {
      Self::Required => &[PresenceState::Present],
      Self::Optional => &[PresenceState::Unspecified, PresenceState::Present],
      Self::RequiredNullable => &[PresenceState::ExplicitNull, PresenceState::Present],
      Self::OptionalNullable => &[
        PresenceState::Unspecified,
        PresenceState::ExplicitNull,
        PresenceState::Present,
      ],
    }
  }

  /// State observed for a field when decoding an object.
  ///
  /// A missing required-nullable key reads as explicit null.
  #[must_use]
  pub fn observe(self, value: Option<&Value>) -> PresenceState {
    match value {
      Some(Value::Null) => PresenceState::ExplicitNull,
      Some(_) => PresenceState::Present,
      None if self == Self::RequiredNullable => PresenceState::ExplicitNull,
      None => PresenceState::Unspecified,
    }
  }
}

/// Where a field of a flattened object came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldOrigin {
  #[default]
  Own,
  /// Inherited from an `allOf` member; `source` is the member that declared it.
  Inherited { source: SchemaId },
  /// Contributed by one variant of a union re-exposed at the composite.
  Variant { source: SchemaId },
}

impl FieldOrigin {
  #[must_use]
  pub const fn source(self) -> Option<SchemaId> {
    match self {
      Self::Own => None,
      Self::Inherited { source } | Self::Variant { source } => Some(source),
    }
  }

  #[must_use]
  pub const fn is_exclusive(self) -> bool {
    matches!(self, Self::Variant { .. })
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
  pub name: String,
  pub target: SchemaId,
  pub required: bool,
  pub nullable: bool,
  pub presence: FieldPresence,
  pub default: Option<Value>,
  pub origin: FieldOrigin,
}

impl Field {
  pub(crate) fn new(name: impl Into<String>, target: SchemaId, required: bool, origin: FieldOrigin) -> Self {
    Self {
      name: name.into(),
      target,
      required,
      nullable: false,
      presence: FieldPresence::classify(required, false),
      default: None,
      origin,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdditionalProperties {
  Closed,
  #[default]
  OpenAny,
  OpenTyped(SchemaId),
}

impl AdditionalProperties {
  #[must_use]
  pub const fn label(&self) -> &'static str {
    match self {
      Self::Closed => "closed",
      Self::OpenAny => "open-any",
      Self::OpenTyped(_) => "open-typed",
    }
  }
}

/// A field replaced by a later `allOf` member or by the composite itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOverride {
  pub name: String,
  pub replaced: FieldOrigin,
  pub by: FieldOrigin,
}

/// Provenance of a flattened `allOf` composite.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Composition {
  pub members: Vec<SchemaId>,
  /// Union re-exposed from a member (or declared next to `allOf`).
  pub embedded_union: Option<UnionDescriptor>,
  pub open_map_members: Vec<SchemaId>,
  pub overrides: Vec<FieldOverride>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
  pub id: SchemaId,
  pub location: SchemaLocation,
  /// Component locations that are pure `$ref` aliases of this node.
  pub aliases: Vec<SchemaLocation>,
  pub kind: NodeKind,
  pub fields: Vec<Field>,
  pub required: BTreeSet<String>,
  pub nullable: bool,
  pub default: Option<Value>,
  pub discriminator: Option<DiscriminatorDescriptor>,
  pub discriminator_views: Vec<DiscriminatorView>,
  pub additional_properties: AdditionalProperties,
  pub composition: Option<Composition>,
  pub cyclic: bool,
  pub title: Option<String>,
  pub description: Option<String>,
}

impl SchemaNode {
  pub(crate) fn new(id: SchemaId, location: SchemaLocation) -> Self {
    Self {
      id,
      location,
      aliases: vec![],
      kind: NodeKind::Primitive(PrimitiveKind::Any),
      fields: vec![],
      required: BTreeSet::new(),
      nullable: false,
      default: None,
      discriminator: None,
      discriminator_views: vec![],
      additional_properties: AdditionalProperties::default(),
      composition: None,
      cyclic: false,
      title: None,
      description: None,
    }
  }

  #[must_use]
  pub fn field(&self, name: &str) -> Option<&Field> {
    self.fields.iter().find(|field| field.name == name)
  }

  pub fn field_names(&self) -> impl Iterator<Item = &str> {
    self.fields.iter().map(|field| field.name.as_str())
  }

  /// Union declared on the node or re-exposed through composition.
  #[must_use]
  pub fn union(&self) -> Option<&UnionDescriptor> {
    self
      .kind
      .union()
      .or_else(|| self.composition.as_ref()?.embedded_union.as_ref())
  }

  /// Whether the node is a structured object that carries fields.
  #[must_use]
  pub const fn is_object(&self) -> bool {
    matches!(self.kind, NodeKind::Object)
  }
}

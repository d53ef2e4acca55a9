use indexmap::IndexMap;

use super::nodes::SchemaId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum UnionKind {
  /// Exactly one member matches.
  #[strum(to_string = "oneOf")]
  OneOf,
  /// One or more members match; their fields merge.
  #[strum(to_string = "anyOf")]
  AnyOf,
}

impl UnionKind {
  #[must_use]
  pub const fn keyword(self) -> &'static str {
    match self {
      Self::OneOf => "oneOf",
      Self::AnyOf => "anyOf",
    }
  }

  #[must_use]
  pub const fn is_exclusive(self) -> bool {
    matches!(self, Self::OneOf)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionDescriptor {
  pub kind: UnionKind,
  /// Non-null members in declaration order.
  pub members: Vec<SchemaId>,
  pub discriminator: Option<DiscriminatorDescriptor>,
}

impl UnionDescriptor {
  #[must_use]
  pub const fn new(kind: UnionKind, members: Vec<SchemaId>) -> Self {
    Self {
      kind,
      members,
      discriminator: None,
    }
  }
}

/// Tag-based dispatch for a union or an inheritance base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscriminatorDescriptor {
  pub property_name: String,
  /// Tag value to member, explicit entries first then implicit ones.
  pub mapping: IndexMap<String, SchemaId>,
  /// Node declaring the discriminator.
  pub owner: SchemaId,
}

impl DiscriminatorDescriptor {
  #[must_use]
  pub fn member_for(&self, tag: &str) -> Option<SchemaId> {
    self.mapping.get(tag).copied()
  }

  /// Every tag dispatching to `member`, in mapping order.
  #[must_use]
  pub fn tags_for(&self, member: SchemaId) -> Vec<String> {
    self
      .mapping
      .iter()
      .filter(|(_, target)| **target == member)
      .map(|(tag, _)| tag.clone())
      .collect()
  }

  pub fn tags(&self) -> impl Iterator<Item = &str> {
    self.mapping.keys().map(String::as_str)
  }
}

/// How a concrete node is reached through one discriminating ancestor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DiscriminatorView {
  pub ancestor: SchemaId,
  pub property_name: String,
  /// Tags that select this node at the ancestor.
  pub tags: Vec<String>,
  /// Intermediate nodes between the ancestor and this node, outermost first.
  pub via: Vec<SchemaId>,
}

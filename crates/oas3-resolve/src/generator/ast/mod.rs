mod named;
mod nodes;
mod unions;

pub use named::{NamedType, Namespace, ReferenceIndex, TypeOrigin};
pub use nodes::{
  AdditionalProperties, Composition, DocumentId, Field, FieldOrigin, FieldOverride, FieldPresence, NodeKind,
  PresenceState, PrimitiveKind, SchemaId, SchemaLocation, SchemaNode,
};
pub use unions::{DiscriminatorDescriptor, DiscriminatorView, UnionDescriptor, UnionKind};

#[cfg(test)]
mod tests;

/// Arena of schema nodes addressed by [`SchemaId`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaGraph {
  nodes: Vec<SchemaNode>,
}

impl SchemaGraph {
  pub(crate) fn push(&mut self, location: SchemaLocation) -> SchemaId {
    let id = SchemaId(self.nodes.len());
    self.nodes.push(SchemaNode::new(id, location));
    id
  }

  #[must_use]
  pub fn get(&self, id: SchemaId) -> Option<&SchemaNode> {
    self.nodes.get(id.0)
  }

  pub(crate) fn get_mut(&mut self, id: SchemaId) -> Option<&mut SchemaNode> {
    self.nodes.get_mut(id.0)
  }

  pub fn iter(&self) -> impl Iterator<Item = &SchemaNode> {
    self.nodes.iter()
  }

  pub fn ids(&self) -> impl Iterator<Item = SchemaId> + use<> {
    (0..self.nodes.len()).map(SchemaId)
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Follows transparent `reference` wrappers to the node they present.
  ///
  /// Wrapper loops stop at the last distinct node.
  #[must_use]
  pub fn resolve(&self, mut id: SchemaId) -> SchemaId {
    for _ in 0..self.nodes.len() {
      match self.get(id).map(|node| &node.kind) {
        Some(NodeKind::Reference(target)) if *target != id => id = *target,
        _ => break,
      }
    }
    id
  }

  /// Node presented by `id` after following wrappers.
  #[must_use]
  pub fn resolved(&self, id: SchemaId) -> Option<&SchemaNode> {
    self.get(self.resolve(id))
  }

  /// Returns true if `id`, or any wrapper on the way to its target, admits `null`.
  #[must_use]
  pub fn is_nullable(&self, mut id: SchemaId) -> bool {
    for _ in 0..=self.nodes.len() {
      let Some(node) = self.get(id) else {
        return false;
      };
      if node.nullable || matches!(node.kind, NodeKind::Primitive(PrimitiveKind::Null)) {
        return true;
      }
      match node.kind {
        NodeKind::Reference(target) if target != id => id = target,
        _ => return false,
      }
    }
    false
  }
}

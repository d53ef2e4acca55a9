use serde_json::{Map, Value};

use crate::generator::ast::{
  AdditionalProperties, DiscriminatorDescriptor, NodeKind, PrimitiveKind, SchemaGraph, SchemaId, SchemaNode,
  UnionDescriptor, UnionKind,
};

/// Why a JSON value is not an instance of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceMismatch {
  /// Wrong JSON type, unknown enum value or missing required key.
  Shape(String),
  /// A `oneOf` matched zero or several members, or an `anyOf` matched none.
  AmbiguousUnion { union: SchemaId, matched: usize },
  UnknownTag {
    union: SchemaId,
    property: String,
    tag: String,
  },
  /// An undeclared key does not satisfy the typed additional-properties schema.
  ExtraProperty { node: SchemaId, key: String },
}

/// Checks JSON values against resolved nodes.
///
/// Tagged unions dispatch on their discriminator when the tag is present;
/// otherwise members are tried structurally. Undeclared keys of closed objects
/// are accepted; they are collected aside rather than rejected.
#[derive(Debug, Clone, Copy)]
pub struct InstanceMatcher<'a> {
  graph: &'a SchemaGraph,
}

impl<'a> InstanceMatcher<'a> {
  #[must_use]
  pub const fn new(graph: &'a SchemaGraph) -> Self {
    Self { graph }
  }

  pub fn check(&self, id: SchemaId, value: &Value) -> Result<(), InstanceMismatch> {
    self.check_in(id, value, &mut vec![])
  }

  fn check_in(&self, id: SchemaId, value: &Value, path: &mut Visits) -> Result<(), InstanceMismatch> {
    if value.is_null() {
      return if self.graph.is_nullable(id) || self.admits_null(id) {
        Ok(())
      } else {
        Err(InstanceMismatch::Shape("null is not allowed".to_string()))
      };
    }

    let id = self.graph.resolve(id);
    let Some(node) = self.graph.get(id) else {
      return Ok(());
    };
    let visit = (id, address(value));
    if path.contains(&visit) {
      return Err(InstanceMismatch::Shape(format!("{} contains itself", node.location)));
    }
    path.push(visit);
    let result = self.check_kind(node, value, path);
    path.pop();
    result
  }

  fn check_kind(&self, node: &SchemaNode, value: &Value, path: &mut Visits) -> Result<(), InstanceMismatch> {
    match &node.kind {
      NodeKind::Primitive(kind) => check_primitive(*kind, value),
      NodeKind::Enum { values } => {
        if values.contains(value) {
          Ok(())
        } else {
          Err(InstanceMismatch::Shape(format!("{value} is not an allowed value")))
        }
      }
      NodeKind::Array { items } => {
        let Some(elements) = value.as_array() else {
          return Err(shape("array", value));
        };
        match items {
          Some(items) => elements
            .iter()
            .try_for_each(|element| self.check_in(*items, element, path)),
          None => Ok(()),
        }
      }
      NodeKind::Map { values } => {
        let Some(object) = value.as_object() else {
          return Err(shape("object", value));
        };
        let Some(values) = values else {
          return Ok(());
        };
        for (key, entry) in object {
          if self.check_in(*values, entry, path).is_err() {
            return Err(InstanceMismatch::ExtraProperty {
              node: node.id,
              key: key.clone(),
            });
          }
        }
        Ok(())
      }
      NodeKind::Object => self.check_object(node, value, path),
      NodeKind::Union(union) => self.check_union(node.id, union, value, path),
      NodeKind::Reference(_) => Err(InstanceMismatch::Shape(format!("{} contains itself", node.location))),
    }
  }

  fn admits_null(&self, id: SchemaId) -> bool {
    matches!(
      self.graph.resolved(id).map(|node| &node.kind),
      Some(NodeKind::Primitive(PrimitiveKind::Any | PrimitiveKind::Null))
    )
  }

  /// A tagged composite checks the tagged member first, then its own fields.
  fn check_object(&self, node: &SchemaNode, value: &Value, path: &mut Visits) -> Result<(), InstanceMismatch> {
    let Some(object) = value.as_object() else {
      return Err(shape("object", value));
    };

    if let Some(descriptor) = &node.discriminator
      && node.kind.union().is_none()
      && let Some(target) = self.dispatch(node.id, descriptor, object)?
      && target != node.id
    {
      self.check_in(target, value, path)?;
    }

    for field in &node.fields {
      match object.get(&field.name) {
        Some(entry) => self.check_in(field.target, entry, path)?,
        None if field.required && !field.nullable => {
          return Err(InstanceMismatch::Shape(format!("missing required key '{}'", field.name)));
        }
        None => {}
      }
    }

    if let AdditionalProperties::OpenTyped(values) = node.additional_properties {
      for (key, entry) in object.iter().filter(|(key, _)| node.field(key).is_none()) {
        if self.check_in(values, entry, path).is_err() {
          return Err(InstanceMismatch::ExtraProperty {
            node: node.id,
            key: key.clone(),
          });
        }
      }
    }

    if let Some(union) = node.composition.as_ref().and_then(|composition| composition.embedded_union.as_ref()) {
      self.check_union(node.id, union, value, path)?;
    }
    Ok(())
  }

  /// Member selected by the tag of `object`, or `None` when the tag is absent.
  fn dispatch(
    &self,
    union: SchemaId,
    descriptor: &DiscriminatorDescriptor,
    object: &Map<String, Value>,
  ) -> Result<Option<SchemaId>, InstanceMismatch> {
    let Some(tag) = object.get(&descriptor.property_name).and_then(Value::as_str) else {
      return Ok(None);
    };
    descriptor
      .member_for(tag)
      .map(Some)
      .ok_or_else(|| InstanceMismatch::UnknownTag {
        union,
        property: descriptor.property_name.clone(),
        tag: tag.to_string(),
      })
  }

  fn check_union(
    &self,
    id: SchemaId,
    union: &UnionDescriptor,
    value: &Value,
    path: &mut Visits,
  ) -> Result<(), InstanceMismatch> {
    if let Some(descriptor) = &union.discriminator
      && let Some(object) = value.as_object()
      && let Some(member) = self.dispatch(id, descriptor, object)?
    {
      return self.check_in(member, value, path);
    }

    let matched = self.members_in(union, value, path).len();
    match (union.kind, matched) {
      (UnionKind::OneOf, 1) => Ok(()),
      (UnionKind::AnyOf, 1..) => Ok(()),
      _ => Err(InstanceMismatch::AmbiguousUnion { union: id, matched }),
    }
  }

  /// Members `value` is an instance of, in declaration order.
  #[must_use]
  pub fn matching_members(&self, union: &UnionDescriptor, value: &Value) -> Vec<SchemaId> {
    self.members_in(union, value, &mut vec![])
  }

  fn members_in(&self, union: &UnionDescriptor, value: &Value, path: &mut Visits) -> Vec<SchemaId> {
    union
      .members
      .iter()
      .copied()
      .filter(|member| self.check_in(*member, value, path).is_ok())
      .collect()
  }

  /// Fills absent keys that declare a default, then descends into present values.
  ///
  /// Only keys are added; absent objects are never created, and values already
  /// present are never replaced. Applying twice gives the same result.
  pub fn apply_defaults(&self, id: SchemaId, value: &mut Value) {
    self.apply_defaults_in(id, value, &mut vec![]);
  }

  fn apply_defaults_in(&self, id: SchemaId, value: &mut Value, path: &mut Visits) {
    if value.is_null() {
      return;
    }
    let id = self.graph.resolve(id);
    let Some(node) = self.graph.get(id) else {
      return;
    };
    let visit = (id, address(value));
    if path.contains(&visit) {
      return;
    }
    path.push(visit);

    match (&node.kind, &mut *value) {
      (NodeKind::Object, Value::Object(object)) => {
        for field in &node.fields {
          if let Some(default) = &field.default
            && !object.contains_key(&field.name)
          {
            object.insert(field.name.clone(), default.clone());
          }
        }
        for field in &node.fields {
          if let Some(entry) = object.get_mut(&field.name) {
            self.apply_defaults_in(field.target, entry, path);
          }
        }
        if let AdditionalProperties::OpenTyped(values) = node.additional_properties {
          for (key, entry) in object.iter_mut() {
            if node.field(key).is_none() {
              self.apply_defaults_in(values, entry, path);
            }
          }
        }
      }
      (NodeKind::Array { items: Some(items) }, Value::Array(elements)) => {
        for element in elements {
          self.apply_defaults_in(*items, element, path);
        }
      }
      (NodeKind::Map { values: Some(values) }, Value::Object(object)) => {
        for entry in object.values_mut() {
          self.apply_defaults_in(*values, entry, path);
        }
      }
      (NodeKind::Union(union), value) => self.apply_union_defaults(union, value, path),
      _ => {}
    }

    if node.is_object()
      && let Some(union) = node.composition.as_ref().and_then(|composition| composition.embedded_union.as_ref())
    {
      self.apply_union_defaults(union, value, path);
    }
    path.pop();
  }

  fn apply_union_defaults(&self, union: &UnionDescriptor, value: &mut Value, path: &mut Visits) {
    let tagged = union.discriminator.as_ref().and_then(|descriptor| {
      let tag = value.get(&descriptor.property_name)?.as_str()?;
      descriptor.member_for(tag)
    });
    let members = match tagged {
      Some(member) => vec![member],
      None => self.members_in(union, value, path),
    };
    if union.kind == UnionKind::OneOf && members.len() != 1 {
      return;
    }
    for member in members {
      self.apply_defaults_in(member, value, path);
    }
  }
}

/// Node and value pairs on the current descent. The same pair reached twice
/// means the node contains itself without consuming any of the value.
type Visits = Vec<(SchemaId, usize)>;

fn address(value: &Value) -> usize {
  std::ptr::from_ref(value).addr()
}

fn check_primitive(kind: PrimitiveKind, value: &Value) -> Result<(), InstanceMismatch> {
  let matches = match kind {
    PrimitiveKind::String => value.is_string(),
    PrimitiveKind::Integer => value.is_i64() || value.is_u64() || value.as_f64().is_some_and(|n| n.fract() == 0.0),
    PrimitiveKind::Number => value.is_number(),
    PrimitiveKind::Boolean => value.is_boolean(),
    PrimitiveKind::Null => value.is_null(),
    PrimitiveKind::Any => true,
  };
  if matches { Ok(()) } else { Err(shape(&kind.to_string(), value)) }
}

fn shape(expected: &str, value: &Value) -> InstanceMismatch {
  let found = match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  };
  InstanceMismatch::Shape(format!("expected {expected}, found {found}"))
}

use serde_json::json;

use super::convert;
use crate::generator::{
  ast::{NodeKind, PrimitiveKind},
  metrics::ResolutionWarning,
};

#[test]
fn test_primitive_kinds() {
  let converted = convert(json!({
    "Name": {"type": "string"},
    "Count": {"type": "integer"},
    "Ratio": {"type": "number"},
    "Flag": {"type": "boolean"},
    "Nothing": {"type": "null"},
    "Anything": {},
    "Bag": {"type": "object"},
    "Mixed": {"type": ["string", "integer"]}
  }));
  let kind = |name: &str| converted.node(name).kind.clone();
  assert_eq!(kind("Name"), NodeKind::Primitive(PrimitiveKind::String));
  assert_eq!(kind("Count"), NodeKind::Primitive(PrimitiveKind::Integer));
  assert_eq!(kind("Ratio"), NodeKind::Primitive(PrimitiveKind::Number));
  assert_eq!(kind("Flag"), NodeKind::Primitive(PrimitiveKind::Boolean));
  assert_eq!(kind("Nothing"), NodeKind::Primitive(PrimitiveKind::Null));
  assert_eq!(kind("Anything"), NodeKind::Primitive(PrimitiveKind::Any));
  assert_eq!(kind("Bag"), NodeKind::Primitive(PrimitiveKind::Any));
  assert_eq!(kind("Mixed"), NodeKind::Primitive(PrimitiveKind::Any));
  assert!(
    converted
      .stats
      .warnings
      .iter()
      .any(|warning| matches!(warning, ResolutionWarning::MultipleTypes { .. }))
  );
}

#[test]
fn test_enum_drops_null_and_marks_nullable() {
  let converted = convert(json!({
    "Status": {"type": "string", "enum": ["active", "inactive", null]}
  }));
  let status = converted.node("Status");
  assert_eq!(
    status.kind,
    NodeKind::Enum {
      values: vec![json!("active"), json!("inactive")]
    }
  );
  assert!(status.nullable);
}

#[test]
fn test_alias_component_shares_target_node() {
  let converted = convert(json!({
    "Pet": {"type": "object", "properties": {"name": {"type": "string"}}},
    "Animal": {"$ref": "#/components/schemas/Pet"}
  }));
  assert_eq!(converted.id("Pet"), converted.id("Animal"));
  let pet = converted.node("Pet");
  assert_eq!(pet.aliases.len(), 1);
  assert_eq!(pet.aliases[0].schema_component().as_deref(), Some("Animal"));
}

use serde_json::json;

use super::convert;
use crate::generator::{
  ast::NodeKind,
  converter::instance::InstanceMismatch,
  errors::{CycleKind, ResolutionError},
};

#[test]
fn test_recursive_schema_is_cyclic_not_error() {
  let converted = convert(json!({
    "Node": {
      "type": "object",
      "properties": {
        "value": {"type": "string"},
        "children": {"type": "array", "items": {"$ref": "#/components/schemas/Node"}}
      }
    }
  }));
  assert!(converted.errors.is_empty());
  let node = converted.node("Node");
  assert!(node.cyclic);
  let children = converted.graph.get(node.field("children").unwrap().target).unwrap();
  assert_eq!(
    children.kind,
    NodeKind::Array {
      items: Some(converted.id("Node"))
    }
  );
}

#[test]
fn test_union_containing_itself_is_checked_without_recursing() {
  let converted = convert(json!({
    "U": {"oneOf": [{"$ref": "#/components/schemas/U"}, {"type": "integer"}], "default": "x"}
  }));
  assert!(converted.errors.iter().any(|error| matches!(
    error,
    ResolutionError::CyclicUnsupported {
      kind: CycleKind::CompositionLoop,
      ..
    }
  )));

  let matcher = converted.matcher();
  let union = converted.id("U");
  assert_eq!(matcher.check(union, &json!(7)), Ok(()));
  assert_eq!(
    matcher.check(union, &json!("x")),
    Err(InstanceMismatch::AmbiguousUnion { union, matched: 0 })
  );

  let mut value = json!({"a": 1});
  matcher.apply_defaults(union, &mut value);
  assert_eq!(value, json!({"a": 1}));
}

#[test]
fn test_mutual_any_of_wrappers_are_reported() {
  let converted = convert(json!({
    "A": {"anyOf": [{"$ref": "#/components/schemas/B"}]},
    "B": {"anyOf": [{"$ref": "#/components/schemas/A"}]}
  }));
  let kinds = converted
    .errors
    .iter()
    .filter_map(|error| match error {
      ResolutionError::CyclicUnsupported { kind, .. } => Some(*kind),
      _ => None,
    })
    .collect::<Vec<_>>();
  assert_eq!(kinds, vec![CycleKind::CompositionLoop]);
  assert!(converted.matcher().check(converted.id("A"), &json!({})).is_err());
}

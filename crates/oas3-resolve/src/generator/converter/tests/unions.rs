use serde_json::json;

use super::convert;
use crate::generator::converter::instance::InstanceMismatch;

#[test]
fn test_one_of_matching_counts() {
  let converted = convert(json!({
    "Exclusive": {
      "oneOf": [
        {"type": "object", "required": ["a"], "properties": {"a": {"type": "string"}}},
        {"type": "object", "required": ["b"], "properties": {"b": {"type": "string"}}}
      ]
    },
    "Inclusive": {
      "anyOf": [
        {"type": "object", "required": ["a"], "properties": {"a": {"type": "string"}}},
        {"type": "object", "required": ["b"], "properties": {"b": {"type": "string"}}}
      ]
    }
  }));
  let matcher = converted.matcher();
  let exclusive = converted.id("Exclusive");
  let inclusive = converted.id("Inclusive");

  assert_eq!(matcher.check(exclusive, &json!({"a": "x"})), Ok(()));
  assert_eq!(
    matcher.check(exclusive, &json!({"a": "x", "b": "y"})),
    Err(InstanceMismatch::AmbiguousUnion {
      union: exclusive,
      matched: 2
    })
  );
  assert_eq!(
    matcher.check(exclusive, &json!({})),
    Err(InstanceMismatch::AmbiguousUnion {
      union: exclusive,
      matched: 0
    })
  );

  assert_eq!(matcher.check(inclusive, &json!({"a": "x", "b": "y"})), Ok(()));
  assert!(matcher.check(inclusive, &json!({})).is_err());

  let union = converted.node("Inclusive").kind.union().cloned().unwrap();
  assert_eq!(matcher.matching_members(&union, &json!({"a": "x", "b": "y"})).len(), 2);
}

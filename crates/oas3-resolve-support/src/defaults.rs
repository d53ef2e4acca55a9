use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::{Extensible, Nullable};

/// Recursive default application for generated types.
///
/// Implementations fill their own unset fields first and then recurse into
/// every nested value that is present. Absent nested objects are never
/// created, and fields that already hold a value or an explicit null are never
/// overwritten, so applying defaults twice is the same as applying them once.
pub trait ApplyDefaults {
  fn apply_defaults(&mut self);
}

/// Sets an optional field when it is unset.
pub fn default_if_unset<T>(slot: &mut Option<T>, default: impl FnOnce() -> T) {
  if slot.is_none() {
    *slot = Some(default());
  }
}

/// Sets a nullable field when it is unspecified; an explicit null stays null.
pub fn default_if_unspecified<T>(slot: &mut Nullable<T>, default: impl FnOnce() -> T) {
  if slot.is_unspecified() {
    *slot = Nullable::Present(default());
  }
}

impl<T: ApplyDefaults> ApplyDefaults for Option<T> {
  fn apply_defaults(&mut self) {
    if let Some(value) = self {
      value.apply_defaults();
    }
  }
}

impl<T: ApplyDefaults> ApplyDefaults for Nullable<T> {
  fn apply_defaults(&mut self) {
    if let Nullable::Present(value) = self {
      value.apply_defaults();
    }
  }
}

impl<T: ApplyDefaults> ApplyDefaults for Box<T> {
  fn apply_defaults(&mut self) {
    self.as_mut().apply_defaults();
  }
}

impl<T: ApplyDefaults> ApplyDefaults for Vec<T> {
  fn apply_defaults(&mut self) {
    self.iter_mut().for_each(ApplyDefaults::apply_defaults);
  }
}

impl<T: ApplyDefaults> ApplyDefaults for IndexMap<String, T> {
  fn apply_defaults(&mut self) {
    self.values_mut().for_each(ApplyDefaults::apply_defaults);
  }
}

impl<T: ApplyDefaults> ApplyDefaults for BTreeMap<String, T> {
  fn apply_defaults(&mut self) {
    self.values_mut().for_each(ApplyDefaults::apply_defaults);
  }
}

impl<T: ApplyDefaults, V> ApplyDefaults for Extensible<T, V> {
  fn apply_defaults(&mut self) {
    self.known.apply_defaults();
  }
}

#[cfg(test)]
mod tests {
  use serde::{Deserialize, Serialize};
  use serde_json::json;

  use super::{ApplyDefaults, default_if_unset, default_if_unspecified};
  use crate::Nullable;

  #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
  struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unspecified")]
    region: Nullable<String>,
  }

  impl ApplyDefaults for Address {
    fn apply_defaults(&mut self) {
      default_if_unset(&mut self.country, || "US".to_string());
      default_if_unspecified(&mut self.region, || "none".to_string());
    }
  }

  #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
  struct Order {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shipping: Option<Address>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    stops: Vec<Address>,
  }

  impl ApplyDefaults for Order {
    fn apply_defaults(&mut self) {
      default_if_unset(&mut self.status, || "pending".to_string());
      self.shipping.apply_defaults();
      self.stops.apply_defaults();
    }
  }

  #[test]
  fn test_fills_own_keys_and_present_nested_values() {
    let mut order: Order = serde_json::from_value(json!({"shipping": {}, "stops": [{"country": "DE"}]})).unwrap();
    order.apply_defaults();
    assert_eq!(
      serde_json::to_value(&order).unwrap(),
      json!({
        "status": "pending",
        "shipping": {"country": "US", "region": "none"},
        "stops": [{"country": "DE", "region": "none"}]
      })
    );
  }

  #[test]
  fn test_never_creates_absent_objects() {
    let mut order = Order::default();
    order.apply_defaults();
    assert_eq!(order.shipping, None);
    assert_eq!(serde_json::to_value(&order).unwrap(), json!({"status": "pending"}));
  }

  #[test]
  fn test_explicit_values_are_kept() {
    let mut order: Order =
      serde_json::from_value(json!({"status": "shipped", "shipping": {"region": null}})).unwrap();
    order.apply_defaults();
    assert_eq!(order.status.as_deref(), Some("shipped"));
    let shipping = order.shipping.as_ref().unwrap();
    assert_eq!(shipping.region, Nullable::Null);
    assert_eq!(shipping.country.as_deref(), Some("US"));
  }

  #[test]
  fn test_apply_is_idempotent() {
    let mut once: Order = serde_json::from_value(json!({"shipping": {"region": null}, "stops": [{}]})).unwrap();
    once.apply_defaults();
    let mut twice = once.clone();
    twice.apply_defaults();
    assert_eq!(once, twice);
  }
}

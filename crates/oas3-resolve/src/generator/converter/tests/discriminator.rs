use serde_json::{Value, json};

use super::{Converted, convert};
use crate::generator::{converter::instance::InstanceMismatch, metrics::ResolutionWarning};

#[test]
fn test_discriminator_implicit_and_explicit_tags() {
  let converted = convert(json!({
    "Pet": {
      "oneOf": [{"$ref": "#/components/schemas/Cat"}, {"$ref": "#/components/schemas/Dog"}],
      "discriminator": {"propertyName": "petType", "mapping": {"doggo": "#/components/schemas/Dog"}}
    },
    "Cat": {"type": "object", "properties": {"petType": {"type": "string"}}},
    "Dog": {"type": "object", "properties": {"petType": {"type": "string"}}}
  }));
  let pet = converted.node("Pet");
  let descriptor = pet.discriminator.as_ref().unwrap();
  assert_eq!(descriptor.property_name, "petType");
  assert_eq!(descriptor.tags().collect::<Vec<_>>(), vec!["doggo", "Cat"]);
  assert_eq!(descriptor.member_for("doggo"), Some(converted.id("Dog")));
  assert_eq!(descriptor.member_for("Dog"), None);
  assert_eq!(pet.kind.union().unwrap().discriminator.as_ref(), Some(descriptor));
}

#[test]
fn test_discriminator_mapping_outside_union_warns() {
  let converted = convert(json!({
    "Pet": {
      "oneOf": [{"$ref": "#/components/schemas/Cat"}, {"$ref": "#/components/schemas/Dog"}],
      "discriminator": {"propertyName": "petType", "mapping": {"fish": "Fish"}}
    },
    "Cat": {"type": "object", "properties": {"petType": {"type": "string"}}},
    "Dog": {"type": "object", "properties": {"petType": {"type": "string"}}},
    "Fish": {"type": "object", "properties": {"petType": {"type": "string"}}}
  }));
  assert!(converted.stats.warnings.contains(&ResolutionWarning::DiscriminatorMappingOutsideUnion {
    location: "#/components/schemas/Pet".to_string(),
    tag: "fish".to_string(),
  }));
}

fn pet_and_pest() -> Converted {
  convert(json!({
    "Animal": {
      "oneOf": [{"$ref": "#/components/schemas/Pet"}, {"$ref": "#/components/schemas/Fish"}],
      "discriminator": {
        "propertyName": "kind",
        "mapping": {"pet": "#/components/schemas/Pet", "fish": "#/components/schemas/Fish"}
      }
    },
    "Pet": {
      "oneOf": [{"$ref": "#/components/schemas/Cat"}, {"$ref": "#/components/schemas/Mouse"}],
      "discriminator": {"propertyName": "petType"}
    },
    "Pest": {
      "oneOf": [{"$ref": "#/components/schemas/Mouse"}, {"$ref": "#/components/schemas/Rat"}],
      "discriminator": {"propertyName": "pestType", "mapping": {"mouse": "#/components/schemas/Mouse"}}
    },
    "Cat": {
      "type": "object",
      "required": ["petType"],
      "properties": {"petType": {"type": "string"}, "meow": {"type": "boolean"}}
    },
    "Mouse": {
      "type": "object",
      "properties": {"petType": {"type": "string"}, "pestType": {"type": "string"}, "squeak": {"type": "boolean"}}
    },
    "Rat": {"type": "object", "properties": {"pestType": {"type": "string"}, "size": {"type": "integer"}}},
    "Fish": {"type": "object", "properties": {"kind": {"type": "string"}, "fins": {"type": "integer"}}}
  }))
}

#[test]
fn test_member_of_two_unions_has_both_views() {
  let converted = pet_and_pest();
  let mouse = converted.node("Mouse");

  let pet_view = mouse
    .discriminator_views
    .iter()
    .find(|view| view.ancestor == converted.id("Pet"))
    .unwrap();
  assert_eq!(pet_view.property_name, "petType");
  assert_eq!(pet_view.tags, vec!["Mouse"]);
  assert!(pet_view.via.is_empty());

  let pest_view = mouse
    .discriminator_views
    .iter()
    .find(|view| view.ancestor == converted.id("Pest"))
    .unwrap();
  assert_eq!(pest_view.property_name, "pestType");
  assert_eq!(pest_view.tags, vec!["mouse"]);
}

#[test]
fn test_nested_discriminator_view_records_intermediate() {
  let converted = pet_and_pest();
  let mouse = converted.node("Mouse");
  let outer = mouse
    .discriminator_views
    .iter()
    .find(|view| view.ancestor == converted.id("Animal"))
    .unwrap();
  assert_eq!(outer.property_name, "kind");
  assert_eq!(outer.tags, vec!["pet"]);
  assert_eq!(outer.via, vec![converted.id("Pet")]);
  assert_eq!(mouse.discriminator_views.len(), 3);
}

#[test]
fn test_dispatch_through_both_views() {
  let converted = pet_and_pest();
  let matcher = converted.matcher();
  let mouse = json!({"petType": "Mouse", "pestType": "mouse", "squeak": true});

  assert_eq!(matcher.check(converted.id("Pet"), &mouse), Ok(()));
  assert_eq!(matcher.check(converted.id("Pest"), &mouse), Ok(()));
  assert_eq!(
    matcher.check(converted.id("Pest"), &json!({"pestType": "Cat"})),
    Err(InstanceMismatch::UnknownTag {
      union: converted.id("Pest"),
      property: "pestType".to_string(),
      tag: "Cat".to_string(),
    })
  );
}

#[test]
fn test_dispatch_ignores_key_order() {
  let converted = pet_and_pest();
  let matcher = converted.matcher();
  let tag_first: Value = serde_json::from_str(r#"{"petType": "Cat", "meow": true}"#).unwrap();
  let tag_last: Value = serde_json::from_str(r#"{"meow": true, "petType": "Cat"}"#).unwrap();
  assert_eq!(matcher.check(converted.id("Pet"), &tag_first), Ok(()));
  assert_eq!(matcher.check(converted.id("Pet"), &tag_last), Ok(()));
}

#[test]
fn test_inheritance_base_discriminator_maps_descendants() {
  let converted = convert(json!({
    "Vehicle": {
      "type": "object",
      "required": ["vehicleType"],
      "properties": {"vehicleType": {"type": "string"}},
      "discriminator": {"propertyName": "vehicleType"}
    },
    "Car": {"allOf": [{"$ref": "#/components/schemas/Vehicle"}, {"properties": {"doors": {"type": "integer"}}}]},
    "SportsCar": {"allOf": [{"$ref": "#/components/schemas/Car"}, {"properties": {"turbo": {"type": "boolean"}}}]}
  }));
  let descriptor = converted.node("Vehicle").discriminator.clone().unwrap();
  assert_eq!(descriptor.member_for("Car"), Some(converted.id("Car")));
  assert_eq!(descriptor.member_for("SportsCar"), Some(converted.id("SportsCar")));
  assert_eq!(descriptor.member_for("Vehicle"), None);

  let matcher = converted.matcher();
  assert!(matcher.check(converted.id("Vehicle"), &json!({"vehicleType": "Car", "doors": 4})).is_ok());
  assert!(matches!(
    matcher.check(converted.id("Vehicle"), &json!({"vehicleType": "Car", "doors": "four"})),
    Err(InstanceMismatch::Shape(_))
  ));
}

#[test]
fn test_tagged_member_and_own_fields_are_both_checked() {
  let converted = convert(json!({
    "Vehicle": {
      "type": "object",
      "required": ["vehicleType", "vin"],
      "properties": {"vehicleType": {"type": "string"}, "vin": {"type": "string"}},
      "discriminator": {"propertyName": "vehicleType", "mapping": {"truck": "#/components/schemas/Truck"}}
    },
    "Truck": {"type": "object", "properties": {"vehicleType": {"type": "string"}, "axles": {"type": "integer"}}}
  }));
  let matcher = converted.matcher();
  let vehicle = converted.id("Vehicle");
  assert_eq!(matcher.check(vehicle, &json!({"vehicleType": "truck", "vin": "X1", "axles": 3})), Ok(()));
  assert_eq!(
    matcher.check(vehicle, &json!({"vehicleType": "truck", "axles": 3})),
    Err(InstanceMismatch::Shape("missing required key 'vin'".to_string()))
  );
  assert!(matcher.check(vehicle, &json!({"vehicleType": "truck", "vin": "X1", "axles": "three"})).is_err());
}

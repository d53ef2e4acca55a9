use serde_json::{Map, Value, json};

use super::{
  SchemaExt,
  refs::{
    component_name, is_bare_schema_name, join_pointer, normalize_document_path, parent_dir, pointer_tokens,
    split_reference,
  },
  schema_ext::AdditionalPropertiesDecl,
  spec::SpecFormat,
};

fn fragment(value: Value) -> Map<String, Value> {
  match value {
    Value::Object(map) => map,
    other => panic!("expected object, got {other}"),
  }
}

#[test]
fn test_split_reference() {
  assert_eq!(split_reference("pets.yaml#/Pet"), ("pets.yaml", "/Pet"));
  assert_eq!(split_reference("#/components/schemas/Cat"), ("", "/components/schemas/Cat"));
  assert_eq!(split_reference("common.json"), ("common.json", ""));
}

#[test]
fn test_pointer_tokens_round_trip_escapes() {
  let pointer = join_pointer("/paths", ["/pets/{id}", "get", "a~b"]);
  assert_eq!(pointer, "/paths/~1pets~1{id}/get/a~0b");
  assert_eq!(pointer_tokens(&pointer), vec!["paths", "/pets/{id}", "get", "a~b"]);
}

#[test]
fn test_component_name() {
  assert_eq!(
    component_name("/components/schemas/Pet", "schemas").as_deref(),
    Some("Pet")
  );
  assert_eq!(component_name("/components/schemas/Pet/properties/id", "schemas"), None);
  assert_eq!(component_name("/components/responses/Pet", "schemas"), None);
}

#[test]
fn test_normalize_document_path() {
  assert_eq!(normalize_document_path("", "./pets.yaml"), "pets.yaml");
  assert_eq!(normalize_document_path("common", "../shared/ids.json"), "shared/ids.json");
  assert_eq!(normalize_document_path("common/v1", "./types.yaml"), "common/v1/types.yaml");
  assert_eq!(normalize_document_path("", "../outside.yaml"), "../outside.yaml");
  assert_eq!(parent_dir("common/v1/types.yaml"), "common/v1");
  assert_eq!(parent_dir("types.yaml"), "");
}

#[test]
fn test_bare_schema_name() {
  assert!(is_bare_schema_name("Cat"));
  assert!(!is_bare_schema_name("#/components/schemas/Cat"));
  assert!(!is_bare_schema_name("pets.yaml"));
}

#[test]
fn test_spec_format_from_path() {
  assert_eq!(SpecFormat::from_path("openapi.yaml"), SpecFormat::Yaml);
  assert_eq!(SpecFormat::from_path("openapi.yml"), SpecFormat::Yaml);
  assert_eq!(SpecFormat::from_path("openapi.json"), SpecFormat::Json);
  assert_eq!(SpecFormat::from_path("openapi"), SpecFormat::Json);
}

#[test]
fn test_nullability_forms() {
  assert!(fragment(json!({"type": "string", "nullable": true})).is_nullable());
  assert!(fragment(json!({"type": ["string", "null"]})).is_nullable());
  assert!(fragment(json!({"enum": ["a", null]})).is_nullable());
  assert!(!fragment(json!({"type": "string"})).is_nullable());

  assert!(fragment(json!({"type": "null"})).is_null_schema());
  assert!(fragment(json!({"enum": [null]})).is_null_schema());
  assert!(!fragment(json!({"type": ["string", "null"]})).is_null_schema());
}

#[test]
fn test_non_null_types() {
  let schema = fragment(json!({"type": ["integer", "null"]}));
  assert_eq!(schema.non_null_types(), vec![oas3::spec::SchemaType::Integer]);
  assert!(fragment(json!({"type": "bogus"})).schema_types().is_empty());
}

#[test]
fn test_properties_keep_document_order() {
  let schema = fragment(json!({
    "type": "object",
    "required": ["zeta"],
    "properties": {"zeta": {"type": "string"}, "alpha": {"type": "integer"}}
  }));
  assert_eq!(schema.property_names(), vec!["zeta", "alpha"]);
  assert!(schema.required_names().contains("zeta"));
  assert!(schema.property("alpha").is_some());
}

#[test]
fn test_additional_properties_decl() {
  assert_eq!(
    fragment(json!({})).additional_properties(),
    AdditionalPropertiesDecl::Absent
  );
  assert_eq!(
    fragment(json!({"additionalProperties": false})).additional_properties(),
    AdditionalPropertiesDecl::Allowed(false)
  );
  let typed = fragment(json!({"additionalProperties": {"type": "integer"}}));
  assert!(matches!(typed.additional_properties(), AdditionalPropertiesDecl::Schema(_)));
  assert!(typed.additional_properties().is_declared());
}

#[test]
fn test_enum_and_const_values() {
  assert_eq!(
    fragment(json!({"enum": ["a", "b"]})).enum_values(),
    Some(vec![json!("a"), json!("b")])
  );
  assert_eq!(fragment(json!({"const": 3})).enum_values(), Some(vec![json!(3)]));
  assert_eq!(fragment(json!({"type": "string"})).enum_values(), None);
}

#[test]
fn test_discriminator_mapping_order() {
  let schema = fragment(json!({
    "oneOf": [{"$ref": "#/components/schemas/Dog"}, {"$ref": "#/components/schemas/Cat"}],
    "discriminator": {
      "propertyName": "petType",
      "mapping": {"dog": "#/components/schemas/Dog", "cat": "Cat"}
    }
  }));
  assert_eq!(
    schema.discriminator_mapping(),
    vec![("dog", "#/components/schemas/Dog"), ("cat", "Cat")]
  );
  assert_eq!(
    schema.discriminator().map(|d| d.property_name).as_deref(),
    Some("petType")
  );
  assert_eq!(schema.members("oneOf").len(), 2);
  assert!(schema.members("allOf").is_empty());
}

#[test]
fn test_is_only() {
  assert!(fragment(json!({"allOf": [{}], "description": "x", "x-internal": true})).is_only("allOf"));
  assert!(fragment(json!({"allOf": [{}], "type": "object"})).is_only("allOf"));
  assert!(!fragment(json!({"allOf": [{}], "properties": {}})).is_only("allOf"));
}

#[test]
fn test_reference_and_extension() {
  let schema = fragment(json!({"$ref": "#/components/schemas/Pet", "x-type-name": "Animal"}));
  assert_eq!(schema.reference(), Some("#/components/schemas/Pet"));
  assert_eq!(schema.extension("x-type-name"), Some("Animal"));
  assert_eq!(schema.extension("x-other"), None);
}

#[test]
fn test_items_requires_object() {
  assert!(fragment(json!({"items": {"type": "string"}})).items().is_some());
  assert!(fragment(json!({"items": [{"type": "string"}]})).items().is_none());
}

use serde_json::json;

use super::{bar_spec, names, resolve, resolve_with, spec};
use crate::generator::{
  NamingScope, ResolutionError, ResolverConfig,
  ast::{DocumentId, Namespace, NodeKind, TypeOrigin},
};

#[test]
fn test_component_keeps_name_and_response_is_suffixed() {
  let output = resolve(bar_spec());
  let model = &output.model;

  let component = model.component("Bar").unwrap();
  assert_eq!(component.name, "Bar");
  assert_eq!(component.namespace, Namespace::Schema);

  let response = model.find_in(Namespace::Response, "BarResponse").unwrap();
  assert_eq!(response.origin, TypeOrigin::Component { name: "Bar".to_string() });
  assert_ne!(response.id, component.id);

  let body = model.find_in(Namespace::RequestBody, "PostFooRequestBody").unwrap();
  assert_eq!(
    body.origin,
    TypeOrigin::Operation {
      operation_id: "post_foo".to_string()
    }
  );
  assert_eq!(output.stats.renamed_types, 1);
}

#[test]
fn test_per_namespace_scope_allows_same_name() {
  let config = ResolverConfig::builder().naming_scope(NamingScope::PerNamespace).build();
  let output = resolve_with(bar_spec(), config).unwrap();
  assert!(output.model.find_in(Namespace::Schema, "Bar").is_some());
  assert!(output.model.find_in(Namespace::Response, "Bar").is_some());
  assert_eq!(output.stats.renamed_types, 0);
}

#[test]
fn test_names_are_deterministic() {
  let first = resolve(bar_spec());
  let second = resolve(bar_spec());
  assert_eq!(names(&first), names(&second));
  assert_eq!(first.model.fingerprint().unwrap(), second.model.fingerprint().unwrap());
  assert_eq!(first.model.fingerprint().unwrap().len(), 64);
}

#[test]
fn test_fingerprint_changes_with_names() {
  let shared = resolve(bar_spec());
  let config = ResolverConfig::builder().naming_scope(NamingScope::PerNamespace).build();
  let scoped = resolve_with(bar_spec(), config).unwrap();
  assert_ne!(shared.model.fingerprint().unwrap(), scoped.model.fingerprint().unwrap());
}

#[test]
fn test_references_point_at_renamed_type() {
  let output = resolve(spec(
    json!({}),
    json!({
      "schemas": {
        "pet_store": {"type": "object", "properties": {"name": {"type": "string"}}},
        "PetStore": {"type": "object", "properties": {"id": {"type": "integer"}}},
        "Catalog": {
          "type": "object",
          "properties": {
            "first": {"$ref": "#/components/schemas/pet_store"},
            "second": {"$ref": "#/components/schemas/PetStore"}
          }
        }
      }
    }),
  ));
  let model = &output.model;
  let first = model.lookup_ref(&DocumentId::Root, "#/components/schemas/pet_store").unwrap();
  let second = model.lookup_ref(&DocumentId::Root, "#/components/schemas/PetStore").unwrap();
  assert_eq!(model.named(first).unwrap().name, "PetStore");
  assert_eq!(model.named(second).unwrap().name, "PetStore2");

  let catalog = model.node(model.component("Catalog").unwrap().id).unwrap();
  assert_eq!(catalog.field("second").unwrap().target, second);
}

#[test]
fn test_alias_component_is_listed_on_target() {
  let output = resolve(spec(
    json!({}),
    json!({
      "schemas": {
        "Pet": {"type": "object", "properties": {"name": {"type": "string"}}},
        "Animal": {"$ref": "#/components/schemas/Pet"}
      }
    }),
  ));
  let pet = output.model.component("Pet").unwrap();
  assert_eq!(pet.aliases, vec!["Animal".to_string()]);
  assert_eq!(output.model.component("Animal").map(|named| named.id), Some(pet.id));
  assert_eq!(output.model.named_types().len(), 1);
}

#[test]
fn test_override_extension_wins_and_reserves_name() {
  let output = resolve(spec(
    json!({}),
    json!({
      "schemas": {
        "Animal": {"type": "object", "properties": {"legs": {"type": "integer"}}},
        "Pet": {"type": "object", "x-type-name": "Animal", "properties": {"name": {"type": "string"}}}
      }
    }),
  ));
  let model = &output.model;
  let pet = model.component("Pet").unwrap();
  assert_eq!(pet.name, "Animal");
  assert!(pet.overridden);
  assert_eq!(model.component("Animal").unwrap().name, "Animal2");
  assert_eq!(output.stats.overrides_applied, 1);
}

#[test]
fn test_custom_override_extension() {
  let config = ResolverConfig::builder().override_extension("x-rust-type").build();
  let output = resolve_with(
    spec(
      json!({}),
      json!({
        "schemas": {
          "Pet": {"type": "object", "x-rust-type": "Creature", "properties": {"name": {"type": "string"}}}
        }
      }),
    ),
    config,
  )
  .unwrap();
  assert_eq!(output.model.component("Pet").unwrap().name, "Creature");
}

#[test]
fn test_duplicate_override_is_unresolvable() {
  let errors = resolve_with(
    spec(
      json!({}),
      json!({
        "schemas": {
          "Cat": {"type": "object", "x-type-name": "Animal", "properties": {"meow": {"type": "boolean"}}},
          "Dog": {"type": "object", "x-type-name": "Animal", "properties": {"bark": {"type": "boolean"}}}
        }
      }),
    ),
    ResolverConfig::default(),
  )
  .unwrap_err();
  assert!(matches!(
    errors.as_slice(),
    [ResolutionError::NameCollisionUnresolvable { name, claimants }] if name == "Animal" && claimants.len() == 2
  ));
}

#[test]
fn test_nested_inline_types_are_named_under_parent() {
  let output = resolve(spec(
    json!({}),
    json!({
      "schemas": {
        "Order": {
          "type": "object",
          "properties": {
            "shipping": {"type": "object", "properties": {"street": {"type": "string"}}},
            "lines": {
              "type": "array",
              "items": {"type": "object", "properties": {"sku": {"type": "string"}}}
            },
            "status": {"type": "string", "enum": ["open", "closed"]},
            "metadata": {"type": "object", "additionalProperties": {"type": "string"}},
            "total": {"type": "number"}
          }
        }
      }
    }),
  ));
  let model = &output.model;
  let order = model.component("Order").unwrap().id;

  let shipping = model.find("OrderShipping").unwrap();
  assert_eq!(
    shipping.origin,
    TypeOrigin::Nested {
      parent: order,
      path: "properties/shipping".to_string()
    }
  );
  let line = model.find("OrderLinesItem").unwrap();
  assert_eq!(
    line.origin,
    TypeOrigin::Nested {
      parent: order,
      path: "properties/lines/items".to_string()
    }
  );
  assert!(model.find("OrderStatus").is_some());
  assert!(model.find("OrderMetadata").is_none());
  assert!(model.find("OrderTotal").is_none());
}

#[test]
fn test_inline_union_variants_are_numbered() {
  let output = resolve(spec(
    json!({}),
    json!({
      "schemas": {
        "Shape": {
          "oneOf": [
            {"type": "object", "required": ["radius"], "properties": {"radius": {"type": "number"}}},
            {"type": "object", "required": ["side"], "properties": {"side": {"type": "number"}}}
          ]
        }
      }
    }),
  ));
  let model = &output.model;
  assert!(matches!(
    model.node(model.component("Shape").unwrap().id).unwrap().kind,
    NodeKind::Union(_)
  ));
  let variant = model.find("ShapeVariant2").unwrap();
  assert!(matches!(&variant.origin, TypeOrigin::Nested { path, .. } if path == "oneOf/1"));
}

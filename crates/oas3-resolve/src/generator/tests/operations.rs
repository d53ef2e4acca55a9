use serde_json::json;

use super::{resolve, resolve_with, spec};
use crate::generator::{
  ResolverConfig, SchemaScope,
  ast::{AdditionalProperties, FieldPresence, Namespace},
};

#[test]
fn test_operation_parameters_become_closed_object() {
  let output = resolve(spec(
    json!({
      "/pets/{petId}": {
        "parameters": [{"name": "petId", "in": "path", "schema": {"type": "string"}}],
        "get": {
          "operationId": "getPet",
          "parameters": [
            {"name": "limit", "in": "query", "schema": {"type": "integer", "default": 20}},
            {"name": "trace", "in": "header", "required": true, "schema": {"type": "string", "nullable": true}}
          ],
          "responses": {
            "200": {
              "description": "ok",
              "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}
            }
          }
        }
      }
    }),
    json!({"schemas": {"Pet": {"type": "object", "properties": {"name": {"type": "string"}}}}}),
  ));
  let model = &output.model;

  let params = model.find_in(Namespace::Parameter, "GetPetParams").unwrap();
  let node = model.node(params.id).unwrap();
  assert_eq!(node.field_names().collect::<Vec<_>>(), vec!["petId", "limit", "trace"]);
  assert_eq!(node.field("petId").unwrap().presence, FieldPresence::Required);
  assert_eq!(node.field("limit").unwrap().presence, FieldPresence::Optional);
  assert_eq!(node.field("limit").unwrap().default, Some(json!(20)));
  assert_eq!(node.field("trace").unwrap().presence, FieldPresence::RequiredNullable);
  assert_eq!(node.additional_properties, AdditionalProperties::Closed);

  assert!(model.find_in(Namespace::Response, "GetPetResponse").is_none());
  assert_eq!(output.stats.operations_resolved, 1);
  assert_eq!(model.operations()[0].stable_id, "get_pet");
}

#[test]
fn test_multiple_media_types_are_tagged() {
  let output = resolve(spec(
    json!({
      "/upload": {
        "post": {
          "operationId": "upload",
          "requestBody": {
            "content": {
              "application/json": {"schema": {"type": "object", "properties": {"url": {"type": "string"}}}},
              "multipart/form-data": {"schema": {"type": "object", "properties": {"file": {"type": "string"}}}}
            }
          },
          "responses": {"204": {"description": "done"}}
        }
      }
    }),
    json!({}),
  ));
  assert!(output.model.find("UploadRequestBodyJson").is_some());
  assert!(output.model.find("UploadRequestBodyMultipart").is_some());
}

#[test]
fn test_referenced_only_scope_skips_orphans() {
  let root = spec(
    json!({
      "/pets": {
        "get": {
          "operationId": "listPets",
          "responses": {
            "200": {
              "description": "ok",
              "content": {
                "application/json": {"schema": {"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}}
              }
            }
          }
        }
      }
    }),
    json!({
      "schemas": {
        "Pet": {"type": "object", "properties": {"name": {"type": "string"}}},
        "Orphan": {"type": "object", "properties": {"lonely": {"type": "boolean"}}}
      }
    }),
  );

  let config = ResolverConfig::builder().schema_scope(SchemaScope::ReferencedOnly).build();
  let referenced = resolve_with(root.clone(), config).unwrap();
  assert!(referenced.model.component("Pet").is_some());
  assert!(referenced.model.component("Orphan").is_none());
  assert_eq!(referenced.stats.orphaned_schemas_count, 1);

  let all = resolve(root);
  assert!(all.model.component("Orphan").is_some());
  assert_eq!(all.stats.orphaned_schemas_count, 1);
}

mod naming;
mod operations;

use serde_json::{Value, json};

use super::{DocumentSet, Orchestrator, ResolutionError, ResolveOutput, ResolverConfig, ast::Namespace};

pub(super) fn spec(paths: Value, components: Value) -> Value {
  json!({
    "openapi": "3.1.0",
    "info": {"title": "resolver", "version": "1.0.0"},
    "paths": paths,
    "components": components
  })
}

pub(super) fn resolve_with(root: Value, config: ResolverConfig) -> Result<ResolveOutput, Vec<ResolutionError>> {
  let documents = DocumentSet::new(root).unwrap();
  Orchestrator::new(documents, config)
    .resolve()
    .map_err(super::ResolutionErrors::into_vec)
}

pub(super) fn resolve(root: Value) -> ResolveOutput {
  resolve_with(root, ResolverConfig::default()).unwrap()
}

pub(super) fn names(output: &ResolveOutput) -> Vec<(String, Namespace)> {
  output
    .model
    .named_types()
    .iter()
    .map(|named| (named.name.clone(), named.namespace))
    .collect()
}

pub(super) fn bar_spec() -> Value {
  spec(
    json!({
      "/foo": {
        "post": {
          "operationId": "postFoo",
          "requestBody": {
            "content": {
              "application/json": {
                "schema": {"type": "object", "properties": {"payload": {"type": "string"}}}
              }
            }
          },
          "responses": {"200": {"$ref": "#/components/responses/Bar"}}
        }
      }
    }),
    json!({
      "schemas": {
        "Bar": {"type": "object", "properties": {"id": {"type": "integer"}}}
      },
      "responses": {
        "Bar": {
          "description": "inline bar",
          "content": {
            "application/json": {
              "schema": {"type": "object", "properties": {"message": {"type": "string"}}}
            }
          }
        }
      }
    }),
  )
}

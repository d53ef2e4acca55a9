use super::identifiers::{to_snake_id, to_type_name};

/// Stable identifier of an operation: its `operationId`, or one derived from
/// the method and path when absent.
pub fn compute_stable_id(method: &str, path: &str, operation_id: Option<&str>) -> String {
  to_snake_id(&operation_id.map_or_else(|| generate_operation_id(method, path), str::to_string))
}

/// `GET /pets/{petId}/toys` gives `get_pets_by_id_toys`.
pub(crate) fn generate_operation_id(method: &str, path: &str) -> String {
  let segments = path
    .split('/')
    .filter(|segment| !segment.is_empty())
    .map(|segment| {
      if segment.starts_with('{') && segment.ends_with('}') {
        "by_id"
      } else {
        segment
      }
    })
    .collect::<Vec<_>>();

  if segments.is_empty() {
    method.to_lowercase()
  } else {
    format!("{method}_{}", segments.join("_")).to_lowercase()
  }
}

/// Type name prefix used for an operation's parameters, request bodies and responses.
pub fn operation_type_base(stable_id: &str) -> String {
  to_type_name(stable_id)
}

use thiserror::Error;

/// Errors raised by generated types while encoding or decoding.
#[derive(Debug, Error)]
pub enum SupportError {
  #[error("'{union}' expected exactly one matching member, found {matched}")]
  AmbiguousUnionMatch { union: &'static str, matched: usize },

  #[error("Unknown discriminator value '{tag}' for field '{field}'")]
  DiscriminatorTagUnknown { field: &'static str, tag: String },

  #[error("additional property '{key}' does not match the declared type: {source}")]
  AdditionalPropertyTypeMismatch {
    key: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("expected a JSON object, found {found}")]
  NotAnObject { found: &'static str },

  #[error("invalid value at '{path}': {source}")]
  InvalidField {
    path: String,
    #[source]
    source: serde_json::Error,
  },

  #[error(transparent)]
  Json(#[from] serde_json::Error),
}

impl SupportError {
  pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
      serde_json::Value::Null => "null",
      serde_json::Value::Bool(_) => "boolean",
      serde_json::Value::Number(_) => "number",
      serde_json::Value::String(_) => "string",
      serde_json::Value::Array(_) => "array",
      serde_json::Value::Object(_) => "object",
    }
  }
}

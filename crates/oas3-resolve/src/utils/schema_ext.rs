use std::collections::BTreeSet;

use oas3::spec::{Discriminator, SchemaType, SchemaTypeSet};
use serde_json::{Map, Value};

pub(crate) const REF_KEYWORD: &str = "$ref";

/// Keywords that never change the shape of a schema.
const ANNOTATION_KEYWORDS: &[&str] = &[
  "$comment",
  "default",
  "deprecated",
  "description",
  "example",
  "examples",
  "externalDocs",
  "nullable",
  "readOnly",
  "summary",
  "title",
  "writeOnly",
  "xml",
];

/// Raw `additionalProperties` declaration of a schema fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AdditionalPropertiesDecl<'a> {
  Absent,
  Allowed(bool),
  /// `{}` or any other schema object.
  Schema(&'a Value),
}

impl AdditionalPropertiesDecl<'_> {
  pub(crate) const fn is_declared(&self) -> bool {
    !matches!(self, Self::Absent)
  }
}

/// Extension methods over a raw JSON schema fragment.
pub(crate) trait SchemaExt {
  /// The `$ref` string when the fragment is a reference object.
  fn reference(&self) -> Option<&str>;

  /// Declared types, parsed into `oas3` schema types. Unknown type names are dropped.
  fn schema_types(&self) -> Vec<SchemaType>;

  /// Declared types without `null`.
  fn non_null_types(&self) -> Vec<SchemaType> {
    self
      .schema_types()
      .into_iter()
      .filter(|t| *t != SchemaType::Null)
      .collect()
  }

  /// Returns true if the fragment only admits `null`.
  fn is_null_schema(&self) -> bool;

  /// `nullable: true`, `type: [T, "null"]`, or `null` among the enum values.
  fn is_nullable(&self) -> bool;

  /// Property names in document order.
  fn property_names(&self) -> Vec<&str>;

  fn property(&self, name: &str) -> Option<&Value>;

  fn required_names(&self) -> BTreeSet<String>;

  /// Members of `allOf`, `oneOf` or `anyOf`.
  fn members(&self, keyword: &str) -> &[Value];

  /// `enum` values, or the single `const` value.
  fn enum_values(&self) -> Option<Vec<Value>>;

  fn discriminator(&self) -> Option<Discriminator>;

  /// Raw `discriminator.mapping` entries in document order.
  fn discriminator_mapping(&self) -> Vec<(&str, &str)>;

  fn additional_properties(&self) -> AdditionalPropertiesDecl<'_>;

  fn default_value(&self) -> Option<&Value>;

  fn items(&self) -> Option<&Value>;

  fn extension(&self, name: &str) -> Option<&str>;

  /// Returns true if nothing but `keyword` and annotations are present.
  fn is_only(&self, keyword: &str) -> bool;
}

impl SchemaExt for Map<String, Value> {
  fn reference(&self) -> Option<&str> {
    self.get(REF_KEYWORD).and_then(Value::as_str)
  }

  fn schema_types(&self) -> Vec<SchemaType> {
    let Some(value) = self.get("type") else {
      return vec![];
    };
    match serde_json::from_value::<SchemaTypeSet>(value.clone()) {
      Ok(SchemaTypeSet::Single(t)) => vec![t],
      Ok(SchemaTypeSet::Multiple(types)) => types,
      Err(_) => vec![],
    }
  }

  fn is_null_schema(&self) -> bool {
    let types = self.schema_types();
    let enum_only_null = self
      .enum_values()
      .is_some_and(|values| !values.is_empty() && values.iter().all(Value::is_null));
    (!types.is_empty() && types.iter().all(|t| *t == SchemaType::Null)) || enum_only_null
  }

  fn is_nullable(&self) -> bool {
    self.get("nullable").and_then(Value::as_bool).unwrap_or(false)
      || self.schema_types().contains(&SchemaType::Null)
      || self
        .enum_values()
        .is_some_and(|values| values.iter().any(Value::is_null))
  }

  fn property_names(&self) -> Vec<&str> {
    self
      .get("properties")
      .and_then(Value::as_object)
      .map(|properties| properties.keys().map(String::as_str).collect())
      .unwrap_or_default()
  }

  fn property(&self, name: &str) -> Option<&Value> {
    self.get("properties").and_then(Value::as_object)?.get(name)
  }

  fn required_names(&self) -> BTreeSet<String> {
    self
      .get("required")
      .and_then(Value::as_array)
      .map(|names| names.iter().filter_map(Value::as_str).map(String::from).collect())
      .unwrap_or_default()
  }

  fn members(&self, keyword: &str) -> &[Value] {
    self
      .get(keyword)
      .and_then(Value::as_array)
      .map_or(&[], Vec::as_slice)
  }

  fn enum_values(&self) -> Option<Vec<Value>> {
    if let Some(values) = self.get("enum").and_then(Value::as_array) {
      return Some(values.clone());
    }
    self.get("const").map(|value| vec![value.clone()])
  }

  fn discriminator(&self) -> Option<Discriminator> {
    let value = self.get("discriminator")?;
    serde_json::from_value(value.clone()).ok()
  }

  fn discriminator_mapping(&self) -> Vec<(&str, &str)> {
    self
      .get("discriminator")
      .and_then(|discriminator| discriminator.get("mapping"))
      .and_then(Value::as_object)
      .map(|mapping| {
        mapping
          .iter()
          .filter_map(|(tag, target)| Some((tag.as_str(), target.as_str()?)))
          .collect()
      })
      .unwrap_or_default()
  }

  fn additional_properties(&self) -> AdditionalPropertiesDecl<'_> {
    match self.get("additionalProperties") {
      None => AdditionalPropertiesDecl::Absent,
      Some(Value::Bool(allowed)) => AdditionalPropertiesDecl::Allowed(*allowed),
      Some(schema) => AdditionalPropertiesDecl::Schema(schema),
    }
  }

  fn default_value(&self) -> Option<&Value> {
    self.get("default")
  }

  fn items(&self) -> Option<&Value> {
    self.get("items").filter(|items| items.is_object())
  }

  fn extension(&self, name: &str) -> Option<&str> {
    self.get(name).and_then(Value::as_str)
  }

  fn is_only(&self, keyword: &str) -> bool {
    self.iter().all(|(key, value)| {
      key == keyword
        || key.starts_with("x-")
        || ANNOTATION_KEYWORDS.contains(&key.as_str())
        || (key == "type" && value.as_str() == Some("object"))
    })
  }
}

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::DeserializeOwned};
use serde_json::Value;

use crate::{SupportError, union::split_known};

/// Declared property names of a generated object type.
pub trait KnownFields {
  const KNOWN_FIELDS: &'static [&'static str];
}

/// Object wrapper that keeps the declared fields and every other key apart.
///
/// Decoding splits the incoming object by key membership in
/// [`KnownFields::KNOWN_FIELDS`]: known keys decode into `known`, everything
/// else lands in `extra` in input order. Encoding writes `known` first and then
/// `extra` into one flat object.
///
/// `V` is the declared additional-properties type. Open-any and closed objects
/// both use `Value`; closed objects keep unknown keys only for round-trip
/// fidelity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extensible<T, V = Value> {
  pub known: T,
  pub extra: IndexMap<String, V>,
}

impl<T, V> Extensible<T, V> {
  pub fn new(known: T) -> Self {
    Self {
      known,
      extra: IndexMap::new(),
    }
  }

  #[must_use]
  pub fn with_extra(mut self, key: impl Into<String>, value: V) -> Self {
    self.extra.insert(key.into(), value);
    self
  }
}

impl<T, V> Extensible<T, V>
where
  T: DeserializeOwned + KnownFields,
  V: DeserializeOwned,
{
  pub fn from_value(value: Value) -> Result<Self, SupportError> {
    let Value::Object(object) = value else {
      return Err(SupportError::NotAnObject {
        found: SupportError::json_kind(&value),
      });
    };

    let (known, extra) = split_known(object, T::KNOWN_FIELDS);

    let known = serde_path_to_error::deserialize(Value::Object(known)).map_err(|err| SupportError::InvalidField {
      path: err.path().to_string(),
      source: err.into_inner(),
    })?;

    let extra = extra
      .into_iter()
      .map(|(key, value)| match serde_json::from_value::<V>(value) {
        Ok(value) => Ok((key, value)),
        Err(source) => Err(SupportError::AdditionalPropertyTypeMismatch { key, source }),
      })
      .collect::<Result<IndexMap<_, _>, _>>()?;

    Ok(Self { known, extra })
  }
}

impl<T, V> Extensible<T, V>
where
  T: Serialize + KnownFields,
  V: Serialize,
{
  pub fn to_value(&self) -> Result<Value, SupportError> {
    let mut object = match serde_json::to_value(&self.known)? {
      Value::Object(object) => object,
      other => {
        return Err(SupportError::NotAnObject {
          found: SupportError::json_kind(&other),
        });
      }
    };
    for (key, value) in &self.extra {
      if T::KNOWN_FIELDS.contains(&key.as_str()) {
        continue;
      }
      object.insert(key.clone(), serde_json::to_value(value)?);
    }
    Ok(Value::Object(object))
  }
}

impl<T, V> Serialize for Extensible<T, V>
where
  T: Serialize + KnownFields,
  V: Serialize,
{
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    self
      .to_value()
      .map_err(<S::Error as serde::ser::Error>::custom)?
      .serialize(serializer)
  }
}

impl<'de, T, V> Deserialize<'de> for Extensible<T, V>
where
  T: DeserializeOwned + KnownFields,
  V: DeserializeOwned,
{
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let value = Value::deserialize(deserializer)?;
    Self::from_value(value).map_err(serde::de::Error::custom)
  }
}

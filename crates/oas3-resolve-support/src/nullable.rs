use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Tri-state container for nullable fields.
///
/// A nullable field has three observable states on the wire: the key is
/// absent, the key is present with a `null` literal, or the key carries a
/// value. `Option<T>` can only express two of them, so nullable fields use
/// this type together with
/// `#[serde(default, skip_serializing_if = "Nullable::is_unspecified")]`.
///
/// Required-but-nullable fields omit the `skip_serializing_if` so they always
/// emit the key. When such a key is missing on decode it reads as
/// [`Nullable::Null`], never as [`Nullable::Unspecified`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Nullable<T> {
  #[default]
  Unspecified,
  Null,
  Present(T),
}

impl<T> Nullable<T> {
  #[must_use]
  pub const fn is_unspecified(&self) -> bool {
    matches!(self, Self::Unspecified)
  }

  #[must_use]
  pub const fn is_null(&self) -> bool {
    matches!(self, Self::Null)
  }

  #[must_use]
  pub const fn is_present(&self) -> bool {
    matches!(self, Self::Present(_))
  }

  #[must_use]
  pub const fn as_ref(&self) -> Nullable<&T> {
    match self {
      Self::Unspecified => Nullable::Unspecified,
      Self::Null => Nullable::Null,
      Self::Present(value) => Nullable::Present(value),
    }
  }

  pub fn as_mut(&mut self) -> Nullable<&mut T> {
    match self {
      Self::Unspecified => Nullable::Unspecified,
      Self::Null => Nullable::Null,
      Self::Present(value) => Nullable::Present(value),
    }
  }

  /// Returns the value when present.
  #[must_use]
  pub const fn get(&self) -> Option<&T> {
    match self {
      Self::Present(value) => Some(value),
      Self::Unspecified | Self::Null => None,
    }
  }

  pub fn set(&mut self, value: T) {
    *self = Self::Present(value);
  }

  pub fn set_null(&mut self) {
    *self = Self::Null;
  }

  pub fn unset(&mut self) {
    *self = Self::Unspecified;
  }

  /// `None` when unspecified, `Some(None)` for an explicit null.
  pub fn into_option(self) -> Option<Option<T>> {
    match self {
      Self::Unspecified => None,
      Self::Null => Some(None),
      Self::Present(value) => Some(Some(value)),
    }
  }

  pub fn from_option(value: Option<Option<T>>) -> Self {
    match value {
      None => Self::Unspecified,
      Some(None) => Self::Null,
      Some(Some(value)) => Self::Present(value),
    }
  }

  pub fn map<U, F>(self, f: F) -> Nullable<U>
  where
    F: FnOnce(T) -> U,
  {
    match self {
      Self::Unspecified => Nullable::Unspecified,
      Self::Null => Nullable::Null,
      Self::Present(value) => Nullable::Present(f(value)),
    }
  }
}

impl<T> From<T> for Nullable<T> {
  fn from(value: T) -> Self {
    Self::Present(value)
  }
}

impl<T> From<Option<T>> for Nullable<T> {
  fn from(value: Option<T>) -> Self {
    value.map_or(Self::Null, Self::Present)
  }
}

impl<T> Serialize for Nullable<T>
where
  T: Serialize,
{
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    match self {
      Self::Present(value) => value.serialize(serializer),
      Self::Unspecified | Self::Null => serializer.serialize_none(),
    }
  }
}

impl<'de, T> Deserialize<'de> for Nullable<T>
where
  T: Deserialize<'de>,
{
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    Option::<T>::deserialize(deserializer).map(|value| value.map_or(Self::Null, Self::Present))
  }
}

//! Encode/decode helpers for `oneOf` and `anyOf` unions.
//!
//! `oneOf` unions are closed enums generated with [`one_of_enum!`]: decoding
//! tries every member and accepts the input only when exactly one member
//! matches. `anyOf` unions are structs of optional members generated with
//! [`any_of_struct!`]: decoding keeps every member that matches, encoding
//! serializes each populated member and merges the object keys with later
//! members overwriting earlier ones.
//!
//! [`one_of_enum!`]: crate::one_of_enum
//! [`any_of_struct!`]: crate::any_of_struct

use serde_json::{Map, Value};

use crate::SupportError;

/// Accepts `matched` only when it holds a single element.
pub fn exactly_one<T>(union: &'static str, mut matched: Vec<T>) -> Result<T, SupportError> {
  if matched.len() == 1
    && let Some(only) = matched.pop()
  {
    return Ok(only);
  }
  Err(SupportError::AmbiguousUnionMatch {
    union,
    matched: matched.len(),
  })
}

/// Encodes a `oneOf` from the encoded value of every member, `None` for members
/// that are not populated.
pub fn encode_one_of<I>(union: &'static str, members: I) -> Result<Value, SupportError>
where
  I: IntoIterator<Item = Option<Value>>,
{
  exactly_one(union, members.into_iter().flatten().collect())
}

/// Encodes an `anyOf` by merging the populated members in declaration order.
///
/// Object members contribute their keys, later members overwrite earlier keys.
/// A non-object member replaces whatever was accumulated so far.
pub fn merge_any_of<I>(union: &'static str, members: I) -> Result<Value, SupportError>
where
  I: IntoIterator<Item = Option<Value>>,
{
  let mut merged: Option<Value> = None;
  for member in members.into_iter().flatten() {
    merged = Some(match (merged, member) {
      (Some(Value::Object(mut acc)), Value::Object(next)) => {
        acc.extend(next);
        Value::Object(acc)
      }
      (_, next) => next,
    });
  }
  merged.ok_or(SupportError::AmbiguousUnionMatch { union, matched: 0 })
}

/// Reads the raw discriminator tag without decoding the rest of the payload.
#[must_use]
pub fn read_tag<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
  value.get(field).and_then(Value::as_str)
}

/// Splits an object by key membership.
///
/// Returns `(known, extra)`, both keeping the input order.
#[must_use]
pub fn split_known(object: Map<String, Value>, known: &[&str]) -> (Map<String, Value>, Map<String, Value>) {
  object
    .into_iter()
    .partition(|(key, _)| known.contains(&key.as_str()))
}

#[macro_export]
macro_rules! one_of_enum {
  (
    $(#[$meta:meta])*
    $vis:vis enum $name:ident {
      $($variant:ident($variant_type:ty)),+ $(,)?
    }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq)]
    $vis enum $name {
      $($variant($variant_type),)+
    }

    impl $name {
      /// Builds the union from one slot per member; exactly one must be populated.
      #[allow(non_snake_case, clippy::too_many_arguments)]
      $vis fn try_from_members($($variant: Option<$variant_type>),+) -> Result<Self, $crate::SupportError> {
        $crate::union::exactly_one(
          stringify!($name),
          [$($variant.map(Self::$variant)),+].into_iter().flatten().collect(),
        )
      }
    }

    impl serde::Serialize for $name {
      fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
      where
        S: serde::Serializer,
      {
        match self {
          $(Self::$variant(v) => serde::Serialize::serialize(v, serializer),)+
        }
      }
    }

    impl<'de> serde::Deserialize<'de> for $name {
      fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
      where
        D: serde::Deserializer<'de>,
      {
        let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
        let matched: Vec<Self> = [
          $(serde_json::from_value::<$variant_type>(value.clone()).ok().map(Self::$variant)),+
        ]
        .into_iter()
        .flatten()
        .collect();
        $crate::union::exactly_one(stringify!($name), matched).map_err(serde::de::Error::custom)
      }
    }
  };
}

#[macro_export]
macro_rules! any_of_struct {
  (
    $(#[$meta:meta])*
    $vis:vis struct $name:ident {
      $($member:ident: $member_type:ty),+ $(,)?
    }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq, Default)]
    $vis struct $name {
      $(pub $member: Option<$member_type>,)+
    }

    impl $name {
      $vis fn populated(&self) -> usize {
        [$(self.$member.is_some()),+].into_iter().filter(|populated| *populated).count()
      }
    }

    impl serde::Serialize for $name {
      fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
      where
        S: serde::Serializer,
      {
        use serde::ser::Error as _;
        let members = [
          $(self.$member.as_ref().map(serde_json::to_value).transpose().map_err(S::Error::custom)?),+
        ];
        $crate::union::merge_any_of(stringify!($name), members)
          .map_err(S::Error::custom)
          .and_then(|merged| serde::Serialize::serialize(&merged, serializer))
      }
    }

    impl<'de> serde::Deserialize<'de> for $name {
      fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
      where
        D: serde::Deserializer<'de>,
      {
        let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
        let decoded = Self {
          $($member: serde_json::from_value::<$member_type>(value.clone()).ok(),)+
        };
        if decoded.populated() == 0 {
          return Err(serde::de::Error::custom($crate::SupportError::AmbiguousUnionMatch {
            union: stringify!($name),
            matched: 0,
          }));
        }
        Ok(decoded)
      }
    }
  };
}

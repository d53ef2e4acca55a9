#[doc(hidden)]
#[macro_export]
macro_rules! discriminated_enum_default_helper {
  ($fallback_type:ty, $constructor:expr) => {
    $constructor(<$fallback_type>::default())
  };
}

#[doc(hidden)]
#[macro_export]
macro_rules! discriminated_enum_unknown_tag {
  ($field:expr, $tag:expr) => {
    serde::de::Error::custom($crate::SupportError::DiscriminatorTagUnknown {
      field: $field,
      tag: $tag.to_string(),
    })
  };
}

/// Tagged dispatch over the members of a union or the children of a base schema.
///
/// Decoding reads the raw tag first and only decodes the mapped member. A tag
/// that is not mapped fails with `DiscriminatorTagUnknown`; a missing tag uses
/// the fallback when one is declared. The same concrete type can appear in any
/// number of discriminated enums, each enum being one ancestor's view of it.
#[macro_export]
macro_rules! discriminated_enum {
  (
    $(#[$meta:meta])*
    $vis:vis enum $name:ident {
      discriminator: $disc_field:expr,
      variants: [
        $(($($disc_value:literal)|+, $variant:ident($variant_type:ty))),* $(,)?
      ],
      fallback: $fallback_variant:ident($fallback_type:ty) $(,)?
    }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq)]
    $vis enum $name {
      $($variant($variant_type),)*
      $fallback_variant($fallback_type),
    }

    impl $name {
      $vis const DISCRIMINATOR_FIELD: &'static str = $disc_field;

      /// Tag values mapped to the current variant, empty for the fallback.
      $vis fn tags(&self) -> &'static [&'static str] {
        match self {
          $(Self::$variant(_) => &[$($disc_value),+],)*
          Self::$fallback_variant(_) => &[],
        }
      }
    }

    $(
      impl From<$variant_type> for $name {
        fn from(value: $variant_type) -> Self {
          Self::$variant(value)
        }
      }
    )*

    impl Default for $name {
      fn default() -> Self {
        $crate::discriminated_enum_default_helper!($fallback_type, Self::$fallback_variant)
      }
    }

    impl serde::Serialize for $name {
      fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
      where
        S: serde::Serializer,
      {
        match self {
          $(Self::$variant(v) => serde::Serialize::serialize(v, serializer),)*
          Self::$fallback_variant(v) => serde::Serialize::serialize(v, serializer),
        }
      }
    }

    impl<'de> serde::Deserialize<'de> for $name {
      fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
      where
        D: serde::Deserializer<'de>,
      {
        let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
        match $crate::union::read_tag(&value, Self::DISCRIMINATOR_FIELD) {
          $(
            Some($($disc_value)|+) =>
              serde_json::from_value(value)
                .map(Self::$variant)
                .map_err(serde::de::Error::custom),
          )*
          None => {
            serde_json::from_value(value)
              .map(Self::$fallback_variant)
              .map_err(serde::de::Error::custom)
          }
          Some(other) => Err($crate::discriminated_enum_unknown_tag!(Self::DISCRIMINATOR_FIELD, other)),
        }
      }
    }
  };

  (
    $(#[$meta:meta])*
    $vis:vis enum $name:ident {
      discriminator: $disc_field:expr,
      variants: [
        $(($($disc_value:literal)|+, $variant:ident($variant_type:ty))),* $(,)?
      ] $(,)?
    }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq)]
    $vis enum $name {
      $($variant($variant_type),)*
    }

    impl $name {
      $vis const DISCRIMINATOR_FIELD: &'static str = $disc_field;

      $vis fn tags(&self) -> &'static [&'static str] {
        match self {
          $(Self::$variant(_) => &[$($disc_value),+],)*
        }
      }
    }

    $(
      impl From<$variant_type> for $name {
        fn from(value: $variant_type) -> Self {
          Self::$variant(value)
        }
      }
    )*

    impl serde::Serialize for $name {
      fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
      where
        S: serde::Serializer,
      {
        match self {
          $(Self::$variant(v) => serde::Serialize::serialize(v, serializer),)*
        }
      }
    }

    impl<'de> serde::Deserialize<'de> for $name {
      fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
      where
        D: serde::Deserializer<'de>,
      {
        let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;

        match $crate::union::read_tag(&value, Self::DISCRIMINATOR_FIELD) {
          $(
            Some($($disc_value)|+) =>
              serde_json::from_value(value)
                .map(Self::$variant)
                .map_err(serde::de::Error::custom),
          )*
          None => Err(serde::de::Error::missing_field(Self::DISCRIMINATOR_FIELD)),
          Some(other) => Err($crate::discriminated_enum_unknown_tag!(Self::DISCRIMINATOR_FIELD, other)),
        }
      }
    }
  };
}

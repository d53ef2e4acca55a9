pub const DEFAULT_OVERRIDE_EXTENSION: &str = "x-type-name";

/// How final type names are scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum NamingScope {
  /// All namespaces render into one module and share one name table.
  #[default]
  Shared,
  /// Each namespace renders into its own module; names only need to be unique within it.
  PerNamespace,
}

/// Which component schemas become named types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum SchemaScope {
  #[default]
  All,
  /// Only schemas reachable from an operation.
  ReferencedOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct ResolverConfig {
  #[builder(default)]
  pub naming_scope: NamingScope,
  #[builder(default = DEFAULT_OVERRIDE_EXTENSION.to_string(), into)]
  pub override_extension: String,
  #[builder(default)]
  pub schema_scope: SchemaScope,
}

impl Default for ResolverConfig {
  fn default() -> Self {
    Self::builder().build()
  }
}

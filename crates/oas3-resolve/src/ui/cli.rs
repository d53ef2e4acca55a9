use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use oas3_resolve::generator::{NamingScope, config::DEFAULT_OVERRIDE_EXTENSION};

use super::colors::{ColorMode, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "oas3-resolve")]
#[command(author, version, about = "OpenAPI schema resolver and type-model engine")]
#[command(styles = super::Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from a resolved OpenAPI specification
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Resolve an OpenAPI specification into named types
  Resolve(ResolveCommand),
}

#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct ResolveCommand {
  /// Path to the OpenAPI JSON or YAML specification file
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Enable verbose output with cycle details and every warning
  #[arg(short, long, default_value_t = false, conflicts_with = "quiet")]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,

  /// How type names are scoped across namespaces
  #[arg(long, value_enum, default_value = "shared")]
  pub naming_scope: NamingScopeArg,

  /// Schema extension carrying a user-chosen type name
  #[arg(long, value_name = "NAME", default_value = DEFAULT_OVERRIDE_EXTENSION)]
  pub override_extension: String,

  /// Name every component schema, including ones no operation reaches
  #[arg(long, default_value_t = false)]
  pub all_schemas: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamingScopeArg {
  /// One name table shared by every namespace
  Shared,
  /// One name table per namespace
  PerNamespace,
}

impl From<NamingScopeArg> for NamingScope {
  fn from(value: NamingScopeArg) -> Self {
    match value {
      NamingScopeArg::Shared => Self::Shared,
      NamingScopeArg::PerNamespace => Self::PerNamespace,
    }
  }
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List every named type of the resolved specification
  Types {
    /// Path to the OpenAPI JSON or YAML specification file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Name every component schema, including ones no operation reaches
    #[arg(long, default_value_t = false)]
    all_schemas: bool,
  },
}

#[cfg(test)]
mod tests {
  use clap::Parser;

  use super::*;

  #[test]
  fn test_resolve_defaults() {
    let cli = Cli::try_parse_from(["oas3-resolve", "resolve", "-i", "spec.yaml"]).unwrap();
    let Commands::Resolve(command) = cli.command else {
      panic!("expected resolve command");
    };
    assert_eq!(command.input, PathBuf::from("spec.yaml"));
    assert_eq!(command.naming_scope, NamingScopeArg::Shared);
    assert_eq!(command.override_extension, "x-type-name");
    assert!(!command.all_schemas);
    assert!(!command.verbose);
  }

  #[test]
  fn test_resolve_flags() {
    let cli = Cli::try_parse_from([
      "oas3-resolve",
      "resolve",
      "-i",
      "spec.json",
      "--naming-scope",
      "per-namespace",
      "--override-extension",
      "x-rust-type",
      "--all-schemas",
      "--verbose",
    ])
    .unwrap();
    let Commands::Resolve(command) = cli.command else {
      panic!("expected resolve command");
    };
    assert_eq!(NamingScope::from(command.naming_scope), NamingScope::PerNamespace);
    assert_eq!(command.override_extension, "x-rust-type");
    assert!(command.all_schemas);
    assert!(command.verbose);
  }

  #[test]
  fn test_verbose_conflicts_with_quiet() {
    let result = Cli::try_parse_from(["oas3-resolve", "resolve", "-i", "a.json", "-v", "-q"]);
    assert!(result.is_err());
  }

  #[test]
  fn test_list_types() {
    let cli = Cli::try_parse_from(["oas3-resolve", "list", "types", "-i", "spec.yaml"]).unwrap();
    assert!(matches!(
      cli.command,
      Commands::List {
        list_command: ListCommands::Types { .. }
      }
    ));
  }
}

use std::path::{Path, PathBuf};

use chrono::{Local, Timelike};
use comfy_table::{Attribute, Cell, ContentArrangement, Row, Table};
use crossterm::style::Stylize;
use num_format::{Locale, ToFormattedString};
use oas3_resolve::{
  generator::{
    DocumentCache, Orchestrator, ResolutionErrors, ResolutionStats, ResolutionWarning, ResolveOutput,
    ResolvedModel, ResolverConfig, SchemaScope,
    ast::{Namespace, TypeOrigin},
  },
  utils::spec::load_documents,
};
use strum::IntoEnumIterator;

use crate::ui::{Colors, ResolveCommand, colors::IntoComfyColor, term_width};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

fn format_count(count: usize) -> String {
  count.to_formatted_string(&Locale::en)
}

#[derive(Debug, Clone)]
pub struct ResolveConfig {
  pub input: PathBuf,
  pub verbose: bool,
  pub quiet: bool,
  pub resolver: ResolverConfig,
}

impl ResolveConfig {
  #[must_use]
  pub fn from_command(command: ResolveCommand) -> Self {
    let ResolveCommand {
      input,
      verbose,
      quiet,
      naming_scope,
      override_extension,
      all_schemas,
    } = command;

    let resolver = ResolverConfig::builder()
      .naming_scope(naming_scope.into())
      .override_extension(override_extension)
      .schema_scope(schema_scope(all_schemas))
      .build();

    Self {
      input,
      verbose,
      quiet,
      resolver,
    }
  }
}

pub(super) const fn schema_scope(all_schemas: bool) -> SchemaScope {
  if all_schemas {
    SchemaScope::All
  } else {
    SchemaScope::ReferencedOnly
  }
}

/// Outcome of loading and resolving one root document.
pub(super) struct Resolution {
  pub result: Result<ResolveOutput, ResolutionErrors>,
  pub external_warnings: Vec<ResolutionWarning>,
}

/// Loads the root document with its external references, then runs the resolver.
pub(super) async fn run_resolution(input: &Path, config: ResolverConfig) -> anyhow::Result<Resolution> {
  let mut cache = DocumentCache::new();
  let loaded = load_documents(input, &mut cache).await?;
  let external_warnings = loaded
    .unreadable
    .into_iter()
    .map(|(path, message)| ResolutionWarning::UnreadableDocument { path, message })
    .collect();

  let result = Orchestrator::new(loaded.documents, config).resolve();
  Ok(Resolution {
    result,
    external_warnings,
  })
}

/// Prints every collected error to stderr, in discovery order.
pub(super) fn print_errors(errors: &ResolutionErrors, colors: &Colors) {
  for error in errors.iter() {
    eprintln!(
      "{} {}",
      format!("{}:", error.kind()).with(colors.error()),
      error.to_string().with(colors.primary())
    );
  }
}

/// Table of named types: name, namespace, origin and source location.
pub(super) fn named_types_table(model: &ResolvedModel, colors: &Colors) -> Table {
  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  for header in ["NAME", "NAMESPACE", "ORIGIN", "LOCATION"] {
    row.add_cell(Cell::new(header).fg(IntoComfyColor::into(colors.label())));
  }
  table.set_header(row);

  for named in model.named_types() {
    let origin = match &named.origin {
      TypeOrigin::Component { .. } if named.overridden => "component (override)".to_string(),
      TypeOrigin::Component { .. } => "component".to_string(),
      TypeOrigin::Operation { operation_id } => operation_id.clone(),
      TypeOrigin::Nested { parent, path } => {
        let parent = model.named(*parent).map_or("?", |parent| parent.name.as_str());
        format!("{parent}/{path}")
      }
    };
    let location = model
      .node(named.id)
      .map(|node| node.location.to_string())
      .unwrap_or_default();

    let mut row = Row::new();
    row.add_cell(
      Cell::new(&named.name)
        .fg(IntoComfyColor::into(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(named.namespace).fg(IntoComfyColor::into(colors.namespace(named.namespace))));
    row.add_cell(Cell::new(origin).fg(IntoComfyColor::into(colors.accent())));
    row.add_cell(Cell::new(location).fg(IntoComfyColor::into(colors.primary())));
    table.add_row(row);
  }

  table
}

struct ResolveLogger<'a> {
  config: &'a ResolveConfig,
  colors: &'a Colors,
}

impl<'a> ResolveLogger<'a> {
  const fn new(config: &'a ResolveConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading OpenAPI spec from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_resolving(&self) {
    self.info(&"Resolving schemas...".with(self.colors.primary()).to_string());
  }

  fn print_statistics(&self, stats: &ResolutionStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Schema nodes:", format_count(stats.nodes_resolved));
    self.stat("Types named:", format_count(stats.types_named));
    for namespace in Namespace::iter() {
      let count = stats.types_in(namespace);
      if count > 0 {
        self.stat("", format!("{} {namespace}", format_count(count)));
      }
    }
    self.stat("Operations resolved:", format_count(stats.operations_resolved));
    self.stat("References indexed:", format_count(stats.references_indexed));
    if stats.external_documents > 0 {
      self.stat("External documents:", format_count(stats.external_documents));
    }
    if stats.overrides_applied > 0 {
      self.stat("Overrides applied:", format_count(stats.overrides_applied));
    }
    if stats.renamed_types > 0 {
      self.stat("Renamed on collision:", format_count(stats.renamed_types));
    }
    if stats.defaults_recorded > 0 {
      self.stat("Defaults recorded:", format_count(stats.defaults_recorded));
    }
    if !stats.warnings.is_empty() {
      self.stat("Warnings:", format_count(stats.warnings.len()));
    }

    self.print_cycles(stats);
    self.print_orphaned_schemas(stats);
    self.print_warnings(stats);
  }

  fn print_cycles(&self, stats: &ResolutionStats) {
    if stats.cycles_detected == 0 {
      return;
    }

    self.stat("Cycles:", format_count(stats.cycles_detected));

    if self.config.verbose {
      for (i, cycle) in stats.cycle_details.iter().enumerate() {
        println!(
          "              {}: {}",
          format!("Cycle {}", i + 1).with(self.colors.accent()),
          cycle.join(" -> ").with(self.colors.info())
        );
      }
    }
  }

  fn print_orphaned_schemas(&self, stats: &ResolutionStats) {
    if stats.orphaned_schemas_count > 0 && self.config.verbose {
      self.stat("Orphaned schemas:", format_count(stats.orphaned_schemas_count));
    }
  }

  /// Unreadable external documents are always shown; the rest only with `--verbose`.
  fn print_warnings(&self, stats: &ResolutionStats) {
    let mut printed_header = false;
    for warning in &stats.warnings {
      let always = matches!(warning, ResolutionWarning::UnreadableDocument { .. });
      if !always && !self.config.verbose {
        continue;
      }

      if !printed_header {
        println!();
        printed_header = true;
      }

      eprintln!(
        "{} {}",
        "Warning:".with(self.colors.accent()),
        warning.to_string().with(self.colors.primary())
      );
    }
  }

  fn print_types(&self, model: &ResolvedModel) {
    if self.config.quiet || model.named_types().is_empty() {
      return;
    }
    println!();
    println!("{}", named_types_table(model, self.colors));
  }

  fn log_failure(&self, errors: &ResolutionErrors) {
    print_errors(errors, self.colors);
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        format!("Resolution failed with {} error(s)", format_count(errors.len())).with(self.colors.error())
      );
    }
  }

  fn log_success(&self, model: &ResolvedModel) {
    if self.config.quiet {
      return;
    }
    println!();
    println!(
      "{} {}",
      format_timestamp().with(self.colors.timestamp()),
      "Successfully resolved OpenAPI spec".with(self.colors.success())
    );
    if self.config.verbose
      && let Ok(fingerprint) = model.fingerprint()
    {
      self.stat("Fingerprint:", fingerprint);
    }
  }
}

pub async fn resolve_spec(config: ResolveConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = ResolveLogger::new(&config, colors);

  logger.log_loading();
  let resolution = run_resolution(&config.input, config.resolver.clone()).await?;

  logger.log_resolving();
  match resolution.result {
    Ok(mut output) => {
      output.stats.record_warnings(resolution.external_warnings);
      logger.print_statistics(&output.stats);
      logger.print_types(&output.model);
      logger.log_success(&output.model);
      Ok(())
    }
    Err(errors) => {
      for warning in &resolution.external_warnings {
        eprintln!(
          "{} {}",
          "Warning:".with(colors.accent()),
          warning.to_string().with(colors.primary())
        );
      }
      logger.log_failure(&errors);
      anyhow::bail!("{} resolution error(s) in {}", errors.len(), config.input.display())
    }
  }
}

#[cfg(test)]
mod tests {
  use oas3_resolve::generator::NamingScope;

  use super::*;

  fn command(all_schemas: bool) -> ResolveCommand {
    ResolveCommand {
      input: PathBuf::from("openapi.yaml"),
      verbose: false,
      quiet: true,
      naming_scope: crate::ui::cli::NamingScopeArg::PerNamespace,
      override_extension: "x-name".to_string(),
      all_schemas,
    }
  }

  #[test]
  fn test_config_from_command() {
    let config = ResolveConfig::from_command(command(false));
    assert!(config.quiet);
    assert_eq!(config.resolver.naming_scope, NamingScope::PerNamespace);
    assert_eq!(config.resolver.override_extension, "x-name");
    assert_eq!(config.resolver.schema_scope, SchemaScope::ReferencedOnly);
  }

  #[test]
  fn test_all_schemas_scope() {
    let config = ResolveConfig::from_command(command(true));
    assert_eq!(config.resolver.schema_scope, SchemaScope::All);
  }

  #[test]
  fn test_format_count_groups_thousands() {
    assert_eq!(format_count(7), "7");
    assert_eq!(format_count(12_345), "12,345");
  }

  #[test]
  fn test_timestamp_shape() {
    let stamp = format_timestamp();
    assert_eq!(stamp.len(), 10);
    assert!(stamp.starts_with('[') && stamp.ends_with(']'));
  }
}

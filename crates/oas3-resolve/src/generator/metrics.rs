use std::collections::BTreeMap;

use strum::Display;

use super::ast::Namespace;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolutionStats {
  pub nodes_resolved: usize,
  pub types_named: usize,
  pub types_per_namespace: BTreeMap<Namespace, usize>,
  pub operations_resolved: usize,
  pub references_indexed: usize,
  pub external_documents: usize,
  pub cycles_detected: usize,
  pub cycle_details: Vec<Vec<String>>,
  pub overrides_applied: usize,
  pub renamed_types: usize,
  pub orphaned_schemas_count: usize,
  pub defaults_recorded: usize,
  pub warnings: Vec<ResolutionWarning>,
}

impl ResolutionStats {
  pub fn record_named_type(&mut self, namespace: Namespace) {
    self.types_named += 1;
    *self.types_per_namespace.entry(namespace).or_default() += 1;
  }

  pub fn record_cycle(&mut self, cycle: Vec<String>) {
    self.cycles_detected += 1;
    self.cycle_details.push(cycle);
  }

  pub fn record_cycles(&mut self, cycles: Vec<Vec<String>>) {
    for cycle in cycles {
      self.record_cycle(cycle);
    }
  }

  pub fn record_orphaned_schemas(&mut self, count: usize) {
    self.orphaned_schemas_count += count;
  }

  pub fn record_override(&mut self) {
    self.overrides_applied += 1;
  }

  pub fn record_rename(&mut self) {
    self.renamed_types += 1;
  }

  pub fn record_default(&mut self) {
    self.defaults_recorded += 1;
  }

  pub fn record_warning(&mut self, warning: ResolutionWarning) {
    if !self.warnings.contains(&warning) {
      self.warnings.push(warning);
    }
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = ResolutionWarning>) {
    for warning in warnings {
      self.record_warning(warning);
    }
  }

  #[must_use]
  pub fn types_in(&self, namespace: Namespace) -> usize {
    self.types_per_namespace.get(&namespace).copied().unwrap_or_default()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ResolutionWarning {
  #[strum(to_string = "Default for '{field}' at {location} does not match its type: {message}")]
  DefaultMismatch {
    location: String,
    field: String,
    message: String,
  },
  #[strum(to_string = "Schema at {location} declares several non-null types; treated as any value")]
  MultipleTypes { location: String },
  #[strum(to_string = "Schema at {location} declares both oneOf and anyOf; anyOf ignored")]
  AnyOfIgnored { location: String },
  #[strum(to_string = "Discriminator at {location} maps '{tag}' to a non-member schema")]
  DiscriminatorMappingOutsideUnion { location: String, tag: String },
  #[strum(to_string = "Parameter '{name}' of '{operation_id}' is declared more than once; first kept")]
  DuplicateParameter { operation_id: String, name: String },
  #[strum(to_string = "External document '{path}' could not be read: {message}")]
  UnreadableDocument { path: String, message: String },
  #[strum(to_string = "[{operation_id}] {message}")]
  OperationSpecific { operation_id: String, message: String },
}

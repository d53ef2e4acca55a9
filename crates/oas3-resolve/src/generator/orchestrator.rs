//! Orchestration of the schema resolution pipeline.
//!
//! The `Orchestrator` runs every stage over one document set: reference
//! resolution, composition, nullability, additional properties, defaults and
//! naming. Errors from all stages are collected and returned together.
//!
//! ## Usage
//!
//! ```no_run
//! use oas3_resolve::generator::{DocumentSet, Orchestrator, ResolverConfig};
//!
//! # fn example() -> anyhow::Result<()> {
//! let root = serde_json::from_str(&std::fs::read_to_string("openapi.json")?)?;
//! let documents = DocumentSet::new(root)?;
//!
//! let output = Orchestrator::new(documents, ResolverConfig::default()).resolve()?;
//! for named in output.model.named_types() {
//!   println!("{} ({})", named.name, named.namespace);
//! }
//! # Ok(())
//! # }
//! ```

use serde_json::{Map, Value, json};

use super::{
  ast::SchemaId,
  config::{ResolverConfig, SchemaScope},
  converter::SchemaConverter,
  documents::DocumentSet,
  errors::ResolutionErrors,
  metrics::ResolutionStats,
  model::ResolvedModel,
  naming::resolver::NameResolver,
  operation_registry::{OperationRegistry, RootTarget, TypeRoot, collect_component_roots},
  schema_registry::{NodeLinks, SchemaRegistry},
};

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct ResolveOutput {
  pub model: ResolvedModel,
  pub stats: ResolutionStats,
}

/// Runs the resolution pipeline over a document set.
#[derive(Debug, Clone)]
pub struct Orchestrator {
  documents: DocumentSet,
  config: ResolverConfig,
}

impl Orchestrator {
  #[must_use]
  pub const fn new(documents: DocumentSet, config: ResolverConfig) -> Self {
    Self { documents, config }
  }

  #[must_use]
  pub const fn config(&self) -> &ResolverConfig {
    &self.config
  }

  #[must_use]
  pub const fn documents(&self) -> &DocumentSet {
    &self.documents
  }

  /// Resolves the document set into a named type model.
  ///
  /// # Errors
  ///
  /// Returns every resolution error found, in discovery order. Warnings never
  /// fail a run; they are reported in the stats of a successful one.
  pub fn resolve(&self) -> Result<ResolveOutput, ResolutionErrors> {
    let mut stats = ResolutionStats {
      external_documents: self.documents.external_paths().count(),
      ..ResolutionStats::default()
    };
    let mut errors = ResolutionErrors::default();

    let operations = OperationRegistry::new(self.documents.spec());
    stats.operations_resolved = operations.len();

    let mut collection = operations.collect_roots(&self.documents);
    if self.config.schema_scope == SchemaScope::All {
      let components = collect_component_roots(&self.documents);
      collection.roots.extend(components.roots);
      collection.errors.extend(components.errors);
      collection.warnings.extend(components.warnings);
    }
    errors.extend(collection.errors);
    stats.record_warnings(collection.warnings);

    let mut registry = SchemaRegistry::new(&self.documents);
    let roots = collection
      .roots
      .into_iter()
      .filter_map(|root| {
        let id = intern_root(&mut registry, &root)?;
        Some((root, id))
      })
      .collect::<Vec<_>>();

    if self.config.schema_scope == SchemaScope::All {
      for (_, location) in registry.component_locations() {
        registry.intern(location);
      }
    }

    let entry_points = roots.iter().map(|(_, id)| *id).collect::<Vec<_>>();
    let (mut output, registry_errors) = registry.finish(&entry_points);
    errors.extend(registry_errors);
    stats.references_indexed = output.references.len();
    stats.record_orphaned_schemas(output.orphaned_components);
    let cycles = output
      .cycles
      .iter()
      .map(|cycle| {
        cycle
          .iter()
          .filter_map(|id| output.graph.get(*id).map(|node| node.location.to_string()))
          .collect()
      })
      .collect();
    stats.record_cycles(cycles);

    SchemaConverter::new(&output.sources).convert(&mut output.graph, &mut errors, &mut stats);

    let assignment =
      NameResolver::new(&output.graph, &output.sources, &self.config).resolve(&output.components, &roots, &mut stats);
    errors.extend(assignment.errors);

    let model = ResolvedModel::new(
      output.graph,
      assignment.named,
      output.references,
      operations.operations().cloned().collect(),
    );
    errors.into_result(ResolveOutput { model, stats })
  }
}

/// Interns the schema a root points at. A parameter group becomes one object
/// whose properties are the parameters' schemas.
fn intern_root(registry: &mut SchemaRegistry<'_>, root: &TypeRoot) -> Option<SchemaId> {
  let id = match &root.target {
    RootTarget::Schema(location) => registry.intern(location.clone())?,
    RootTarget::Parameters { location, slots } => {
      let mut links = NodeLinks::default();
      let mut required = vec![];
      for slot in slots {
        let Some(target) = registry.intern(slot.schema.clone()) else {
          continue;
        };
        for (document, reference) in &slot.references {
          registry.index_reference(document.clone(), reference, target);
        }
        links.properties.push((slot.name.clone(), target));
        if slot.required {
          required.push(Value::String(slot.name.clone()));
        }
      }
      let mut fragment = Map::new();
      fragment.insert("type".to_string(), json!("object"));
      fragment.insert("required".to_string(), Value::Array(required));
      fragment.insert("additionalProperties".to_string(), Value::Bool(false));
      registry.intern_synthetic(location.clone(), fragment, links)
    }
  };
  for (document, reference) in &root.references {
    registry.index_reference(document.clone(), reference, id);
  }
  Some(id)
}

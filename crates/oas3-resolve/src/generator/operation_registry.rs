use oas3::Spec;
use serde_json::{Map, Value};

use crate::{
  generator::{
    ast::{DocumentId, Namespace, SchemaLocation, TypeOrigin},
    documents::{DocumentSet, Followed},
    errors::ResolutionError,
    metrics::ResolutionWarning,
    naming::{
      constants::PARAMS_SUFFIX,
      identifiers::{ensure_unique, to_type_name},
      media::MediaTag,
      operations::{compute_stable_id, operation_type_base},
    },
  },
  utils::refs::component_name,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum OperationKind {
  #[strum(to_string = "http")]
  Http,
  #[strum(to_string = "webhook")]
  Webhook,
}

/// A single operation of the root document.
#[derive(Debug, Clone)]
pub struct OperationEntry {
  /// Unique `snake_case` identifier, derived from `operationId` or method and path.
  pub stable_id: String,
  /// Lowercase HTTP method.
  pub method: String,
  /// URL path pattern, or `webhooks/{name}` for webhooks.
  pub path: String,
  /// Location of the path item holding the operation.
  pub item: SchemaLocation,
  /// Location of the operation object.
  pub location: SchemaLocation,
  pub kind: OperationKind,
}

/// One parameter of an operation's parameter group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParameterSlot {
  pub name: String,
  pub required: bool,
  pub schema: SchemaLocation,
  /// `$ref` strings followed to reach the parameter.
  pub references: Vec<(DocumentId, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RootTarget {
  Schema(SchemaLocation),
  /// Parameters of one operation, modeled as one object.
  Parameters {
    location: SchemaLocation,
    slots: Vec<ParameterSlot>,
  },
}

/// A non-schema entry point that becomes a named type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TypeRoot {
  pub namespace: Namespace,
  /// Preferred names, best first. The last one takes a numeric suffix when all are taken.
  pub candidates: Vec<String>,
  pub origin: TypeOrigin,
  pub target: RootTarget,
  /// `$ref` strings followed to reach the request body, response or parameter.
  pub references: Vec<(DocumentId, String)>,
}

#[derive(Debug, Default)]
pub(crate) struct RootCollection {
  pub roots: Vec<TypeRoot>,
  pub errors: Vec<ResolutionError>,
  pub warnings: Vec<ResolutionWarning>,
}

/// Registry of every operation of the root document, HTTP operations first
/// and webhooks after, each with a stable identifier.
#[derive(Debug, Default)]
pub struct OperationRegistry {
  entries: Vec<OperationEntry>,
}

impl OperationRegistry {
  #[must_use]
  pub fn new(spec: &Spec) -> Self {
    let mut registry = Self::default();

    for (path, method, operation) in spec.operations() {
      let method = method.as_str().to_lowercase();
      let item = SchemaLocation::root("").child(["paths", path.as_str()]);
      let location = item.child([method.as_str()]);
      registry.register(&path, method, operation.operation_id.as_deref(), item, location, OperationKind::Http);
    }

    for (name, path_item) in &spec.webhooks {
      for (method, operation) in path_item.methods() {
        let method = method.as_str().to_lowercase();
        let item = SchemaLocation::root("").child(["webhooks", name.as_str()]);
        let location = item.child([method.as_str()]);
        let display_path = format!("webhooks/{name}");
        registry.register(
          &display_path,
          method,
          operation.operation_id.as_deref(),
          item,
          location,
          OperationKind::Webhook,
        );
      }
    }

    registry
  }

  fn register(
    &mut self,
    path: &str,
    method: String,
    operation_id: Option<&str>,
    item: SchemaLocation,
    location: SchemaLocation,
    kind: OperationKind,
  ) {
    let base_id = compute_stable_id(&method, path, operation_id);
    let stable_id = ensure_unique(&base_id, |id| self.entries.iter().any(|entry| entry.stable_id == id));
    self.entries.push(OperationEntry {
      stable_id,
      method,
      path: path.to_string(),
      item,
      location,
      kind,
    });
  }

  pub fn operations(&self) -> impl Iterator<Item = &OperationEntry> {
    self.entries.iter()
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Parameter groups, request bodies and responses of every operation, in
  /// operation order.
  pub(crate) fn collect_roots(&self, documents: &DocumentSet) -> RootCollection {
    let mut collection = RootCollection::default();
    for entry in &self.entries {
      let base = operation_type_base(&entry.stable_id);
      let owner = OperationOwner {
        base: &base,
        operation_id: &entry.stable_id,
      };
      collect_parameters(documents, entry, &owner, &mut collection);

      let request_body = entry.location.child(["requestBody"]);
      if documents.lookup(&request_body).is_some() {
        match documents.follow(request_body) {
          Ok(body) => collect_content(&body, Namespace::RequestBody, Some(&owner), &mut collection),
          Err(error) => collection.errors.push(error),
        }
      }

      let responses = entry.location.child(["responses"]);
      let statuses = documents
        .fragment(&responses)
        .map(|responses| responses.keys().cloned().collect::<Vec<_>>())
        .unwrap_or_default();
      for status in statuses {
        match documents.follow(responses.child([status.as_str()])) {
          Ok(response) => collect_content(&response, Namespace::Response, Some(&owner), &mut collection),
          Err(error) => collection.errors.push(error),
        }
      }
    }
    collection
  }
}

/// Component request bodies, responses and parameters of the root document,
/// whether or not an operation uses them.
pub(crate) fn collect_component_roots(documents: &DocumentSet) -> RootCollection {
  let mut collection = RootCollection::default();
  let components = SchemaLocation::root("").child(["components"]);

  for (section, namespace) in [
    ("requestBodies", Namespace::RequestBody),
    ("responses", Namespace::Response),
  ] {
    let section = components.child([section]);
    for name in object_keys(documents, &section) {
      match documents.follow(section.child([name.as_str()])) {
        Ok(object) => collect_content(&object, namespace, None, &mut collection),
        Err(error) => collection.errors.push(error),
      }
    }
  }

  let parameters = components.child(["parameters"]);
  for name in object_keys(documents, &parameters) {
    match documents.follow(parameters.child([name.as_str()])) {
      Ok(parameter) => {
        if let Some(schema) = parameter_schema(&parameter.location, parameter.object) {
          push_component_parameter(&parameter, schema, &mut collection);
        }
      }
      Err(error) => collection.errors.push(error),
    }
  }

  collection
}

struct OperationOwner<'a> {
  base: &'a str,
  operation_id: &'a str,
}

fn object_keys(documents: &DocumentSet, location: &SchemaLocation) -> Vec<String> {
  documents
    .fragment(location)
    .map(|object| object.keys().cloned().collect())
    .unwrap_or_default()
}

/// Schema of a parameter: `schema`, or the schema of its first `content` entry.
fn parameter_schema(location: &SchemaLocation, parameter: &Map<String, Value>) -> Option<SchemaLocation> {
  if parameter.contains_key("schema") {
    return Some(location.child(["schema"]));
  }
  parameter
    .get("content")
    .and_then(Value::as_object)?
    .iter()
    .find(|(_, media)| media.get("schema").is_some())
    .map(|(media_type, _)| location.child(["content", media_type.as_str(), "schema"]))
}

fn push_component_parameter(parameter: &Followed<'_>, schema: SchemaLocation, collection: &mut RootCollection) {
  let Some(name) = component_name(&parameter.location.pointer, "parameters") else {
    return;
  };
  let type_name = to_type_name(&name);
  collection.roots.push(TypeRoot {
    namespace: Namespace::Parameter,
    candidates: vec![type_name.clone(), format!("{type_name}{PARAMS_SUFFIX}")],
    origin: TypeOrigin::Component { name },
    target: RootTarget::Schema(schema),
    references: parameter.references.clone(),
  });
}

/// Path-item parameters followed by operation parameters; an operation
/// parameter replaces a path-item parameter with the same name and location.
fn collect_parameters(
  documents: &DocumentSet,
  entry: &OperationEntry,
  owner: &OperationOwner<'_>,
  collection: &mut RootCollection,
) {
  let mut slots: Vec<(String, ParameterSlot)> = vec![];

  for list in [entry.item.child(["parameters"]), entry.location.child(["parameters"])] {
    let count = documents.lookup(&list).and_then(Value::as_array).map_or(0, Vec::len);
    for index in 0..count {
      let index = index.to_string();
      let followed = match documents.follow(list.child([index.as_str()])) {
        Ok(followed) => followed,
        Err(error) => {
          collection.errors.push(error);
          continue;
        }
      };
      let parameter = followed.object;
      let Some(name) = parameter.get("name").and_then(Value::as_str) else {
        continue;
      };
      let Some(schema) = parameter_schema(&followed.location, parameter) else {
        continue;
      };
      push_component_parameter(&followed, schema.clone(), collection);

      let placement = parameter.get("in").and_then(Value::as_str).unwrap_or("query").to_string();
      let slot = ParameterSlot {
        name: name.to_string(),
        required: placement == "path" || parameter.get("required").and_then(Value::as_bool).unwrap_or(false),
        schema,
        references: followed.references.clone(),
      };

      if let Some(existing) = slots
        .iter_mut()
        .find(|(existing, slot)| *existing == placement && slot.name == name)
      {
        existing.1 = slot;
      } else if slots.iter().any(|(_, existing)| existing.name == name) {
        collection.warnings.push(ResolutionWarning::DuplicateParameter {
          operation_id: owner.operation_id.to_string(),
          name: name.to_string(),
        });
      } else {
        slots.push((placement, slot));
      }
    }
  }

  if slots.is_empty() {
    return;
  }

  collection.roots.push(TypeRoot {
    namespace: Namespace::Parameter,
    candidates: vec![format!("{}{PARAMS_SUFFIX}", owner.base)],
    origin: TypeOrigin::Operation {
      operation_id: owner.operation_id.to_string(),
    },
    target: RootTarget::Parameters {
      location: entry.location.child(["parameters"]),
      slots: slots.into_iter().map(|(_, slot)| slot).collect(),
    },
    references: vec![],
  });
}

/// One root per media type of a request body or response. Component-level
/// objects start from their component name; inline ones from the operation.
fn collect_content(
  followed: &Followed<'_>,
  namespace: Namespace,
  owner: Option<&OperationOwner<'_>>,
  collection: &mut RootCollection,
) {
  let location = &followed.location;
  let Some(content) = followed.object.get("content").and_then(Value::as_object) else {
    return;
  };
  let media = content
    .iter()
    .filter(|(_, media)| media.get("schema").is_some())
    .map(|(media_type, _)| media_type.as_str())
    .collect::<Vec<_>>();
  let tagged = media.len() > 1;

  let section = match namespace {
    Namespace::RequestBody => "requestBodies",
    _ => "responses",
  };
  let component = component_name(&location.pointer, section);
  let suffix = namespace.role_suffix();

  for media_type in media {
    let tag = if tagged {
      MediaTag::from_content_type(media_type).to_string()
    } else {
      String::new()
    };
    let (candidates, origin) = match (&component, owner) {
      (Some(name), _) => {
        let type_name = to_type_name(name);
        (
          vec![format!("{type_name}{tag}"), format!("{type_name}{suffix}{tag}")],
          TypeOrigin::Component { name: name.clone() },
        )
      }
      (None, Some(owner)) => (
        vec![format!("{}{suffix}{tag}", owner.base)],
        TypeOrigin::Operation {
          operation_id: owner.operation_id.to_string(),
        },
      ),
      (None, None) => continue,
    };
    collection.roots.push(TypeRoot {
      namespace,
      candidates,
      origin,
      target: RootTarget::Schema(location.child(["content", media_type, "schema"])),
      references: followed.references.clone(),
    });
  }
}

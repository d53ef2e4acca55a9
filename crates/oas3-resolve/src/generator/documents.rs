use std::{
  collections::{BTreeMap, BTreeSet, HashMap},
  sync::Arc,
};

use oas3::Spec;
use serde_json::{Map, Value};

use super::{
  ast::{DocumentId, SchemaLocation},
  errors::{CycleKind, DocumentError, ResolutionError, UnresolvedReason},
};
use crate::utils::{
  SchemaExt,
  refs::{normalize_document_path, split_reference},
  spec::{SpecFormat, parse_document},
};

/// Decoded documents keyed by content hash.
///
/// Owned by the caller so repeated runs over the same inputs skip parsing,
/// and cleared explicitly.
#[derive(Debug, Default)]
pub struct DocumentCache {
  entries: HashMap<blake3::Hash, Arc<Value>>,
  hits: usize,
}

impl DocumentCache {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Parses `bytes`, or returns the value decoded earlier for identical content.
  pub fn parse(&mut self, name: &str, bytes: &[u8], format: SpecFormat) -> Result<Arc<Value>, DocumentError> {
    let key = Self::key(bytes, format);
    if let Some(value) = self.entries.get(&key) {
      self.hits += 1;
      return Ok(Arc::clone(value));
    }
    let value = Arc::new(parse_document(name, bytes, format)?);
    self.entries.insert(key, Arc::clone(&value));
    Ok(value)
  }

  fn key(bytes: &[u8], format: SpecFormat) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[u8::from(format == SpecFormat::Yaml)]);
    hasher.update(bytes);
    hasher.finalize()
  }

  pub fn clear(&mut self) {
    self.entries.clear();
    self.hits = 0;
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  #[must_use]
  pub const fn hits(&self) -> usize {
    self.hits
  }
}

/// The immutable input of a run: the root document plus every external
/// document keyed by its path relative to the root.
#[derive(Debug, Clone)]
pub struct DocumentSet {
  root: Arc<Value>,
  spec: Arc<Spec>,
  root_name: Option<String>,
  externals: BTreeMap<String, Arc<Value>>,
  unreadable: BTreeSet<String>,
}

impl DocumentSet {
  /// Wraps a root document. Fails if it is not an OpenAPI document.
  pub fn new(root: Value) -> Result<Self, DocumentError> {
    Self::from_shared(Arc::new(root))
  }

  pub fn from_shared(root: Arc<Value>) -> Result<Self, DocumentError> {
    let spec = serde_json::from_value::<Spec>(Value::clone(&root)).map_err(|source| DocumentError::Spec { source })?;
    Ok(Self {
      root,
      spec: Arc::new(spec),
      root_name: None,
      externals: BTreeMap::new(),
      unreadable: BTreeSet::new(),
    })
  }

  /// Parses the root and each external document, choosing JSON or YAML by extension.
  ///
  /// Externals that fail to parse are kept as unreadable; references into them
  /// are reported during resolution.
  pub fn from_bytes<I>(
    root_name: &str,
    root: &[u8],
    externals: I,
    cache: &mut DocumentCache,
  ) -> Result<Self, DocumentError>
  where
    I: IntoIterator<Item = (String, Vec<u8>)>,
  {
    let root_value = cache.parse(root_name, root, SpecFormat::from_path(root_name))?;
    let mut documents = Self::from_shared(root_value)?.with_root_name(root_name);
    for (path, bytes) in externals {
      match cache.parse(&path, &bytes, SpecFormat::from_path(&path)) {
        Ok(value) => documents.insert_external(&path, value),
        Err(_) => documents.mark_unreadable(&path),
      }
    }
    Ok(documents)
  }

  /// Name of the root document, so external documents can refer back to it.
  #[must_use]
  pub fn with_root_name(mut self, name: &str) -> Self {
    self.root_name = Some(normalize_document_path("", name));
    self
  }

  #[must_use]
  pub fn with_external(mut self, path: &str, document: Value) -> Self {
    self.insert_external(path, Arc::new(document));
    self
  }

  pub fn insert_external(&mut self, path: &str, document: Arc<Value>) {
    let path = normalize_document_path("", path);
    self.unreadable.remove(&path);
    self.externals.insert(path, document);
  }

  pub fn mark_unreadable(&mut self, path: &str) {
    self.unreadable.insert(normalize_document_path("", path));
  }

  #[must_use]
  pub fn spec(&self) -> &Spec {
    &self.spec
  }

  #[must_use]
  pub fn root(&self) -> &Value {
    &self.root
  }

  #[must_use]
  pub fn document(&self, id: &DocumentId) -> Option<&Value> {
    match id {
      DocumentId::Root => Some(&self.root),
      DocumentId::External(path) => self.externals.get(path).map(AsRef::as_ref),
    }
  }

  pub fn external_paths(&self) -> impl Iterator<Item = &str> {
    self.externals.keys().map(String::as_str)
  }

  /// Every loaded document, root first.
  pub fn iter_documents(&self) -> impl Iterator<Item = (DocumentId, &Value)> {
    std::iter::once((DocumentId::Root, self.root.as_ref())).chain(
      self
        .externals
        .iter()
        .map(|(path, value)| (DocumentId::External(path.clone()), value.as_ref())),
    )
  }

  /// External documents referenced from loaded documents but not loaded yet.
  #[must_use]
  pub fn pending_references(&self) -> BTreeSet<String> {
    self
      .iter_documents()
      .flat_map(|(id, value)| external_references(value, &id))
      .filter(|path| {
        !self.externals.contains_key(path)
          && !self.unreadable.contains(path)
          && self.root_name.as_ref() != Some(path)
      })
      .collect()
  }

  /// Value addressed by a location.
  #[must_use]
  pub fn lookup(&self, location: &SchemaLocation) -> Option<&Value> {
    self.document(&location.document)?.pointer(&location.pointer)
  }

  /// Object addressed by a location.
  #[must_use]
  pub fn fragment(&self, location: &SchemaLocation) -> Option<&Map<String, Value>> {
    self.lookup(location)?.as_object()
  }

  /// Resolves a `$ref` string written at `from` to the location it addresses.
  pub fn resolve_reference(&self, from: &SchemaLocation, reference: &str) -> Result<SchemaLocation, UnresolvedReason> {
    let (document, pointer) = split_reference(reference);
    let document = self.document_id(&from.document, document)?;
    let location = SchemaLocation::new(document, pointer);
    match self.lookup(&location) {
      Some(_) => Ok(location),
      None => Err(UnresolvedReason::MissingPointer),
    }
  }

  fn document_id(&self, from: &DocumentId, relative: &str) -> Result<DocumentId, UnresolvedReason> {
    if relative.is_empty() {
      return Ok(from.clone());
    }
    let path = normalize_document_path(from.dir(), relative);
    if self.root_name.as_ref() == Some(&path) {
      Ok(DocumentId::Root)
    } else if self.externals.contains_key(&path) {
      Ok(DocumentId::External(path))
    } else if self.unreadable.contains(&path) {
      Err(UnresolvedReason::UnreadableDocument)
    } else {
      Err(UnresolvedReason::UnknownDocument)
    }
  }

  /// Follows `$ref` objects (parameters, request bodies, responses, schemas)
  /// from `location` until a concrete object is reached.
  pub(crate) fn follow(&self, mut location: SchemaLocation) -> Result<Followed<'_>, ResolutionError> {
    let mut chain = vec![];
    let mut references = vec![];
    loop {
      let Some(object) = self.fragment(&location) else {
        return Err(ResolutionError::UnresolvedReference {
          reference: location.to_string(),
          from: location,
          reason: UnresolvedReason::NotASchema,
        });
      };
      let Some(reference) = object.reference() else {
        return Ok(Followed {
          location,
          object,
          references,
        });
      };
      if chain.contains(&location) {
        chain.push(location);
        return Err(ResolutionError::CyclicUnsupported {
          kind: CycleKind::ReferenceLoop,
          chain,
        });
      }
      let next = self
        .resolve_reference(&location, reference)
        .map_err(|reason| ResolutionError::UnresolvedReference {
          from: location.clone(),
          reference: reference.to_string(),
          reason,
        })?;
      references.push((location.document.clone(), reference.to_string()));
      chain.push(location);
      location = next;
    }
  }
}

/// Object reached by [`DocumentSet::follow`], with every `$ref` string passed
/// on the way and the document it was written in.
#[derive(Debug)]
pub(crate) struct Followed<'a> {
  pub location: SchemaLocation,
  pub object: &'a Map<String, Value>,
  pub references: Vec<(DocumentId, String)>,
}

/// Normalized paths of external documents referenced from `document`.
#[must_use]
pub fn external_references(document: &Value, from: &DocumentId) -> BTreeSet<String> {
  let mut found = BTreeSet::new();
  let mut stack = vec![document];
  while let Some(value) = stack.pop() {
    match value {
      Value::Object(object) => {
        if let Some(reference) = object.reference() {
          let (path, _) = split_reference(reference);
          if !path.is_empty() {
            found.insert(normalize_document_path(from.dir(), path));
          }
        }
        stack.extend(object.values());
      }
      Value::Array(items) => stack.extend(items),
      _ => {}
    }
  }
  found
}

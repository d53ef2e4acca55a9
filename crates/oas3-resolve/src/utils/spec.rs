use std::{
  collections::BTreeSet,
  ffi::OsStr,
  path::{Path, PathBuf},
};

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use tokio::task::JoinSet;

use crate::generator::{
  documents::{DocumentCache, DocumentSet},
  errors::DocumentError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext {
      "yaml" | "yml" => Self::Yaml,
      _ => Self::Json,
    }
  }

  #[must_use]
  pub fn from_path(path: impl AsRef<Path>) -> Self {
    path
      .as_ref()
      .extension()
      .and_then(OsStr::to_str)
      .map_or(Self::default(), Self::from_extension)
  }
}

pub struct SpecLoader {
  file: AsyncMmapFile,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let format = SpecFormat::from_path(path);
    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("Failed to open {}", path.display()))?;

    Ok(Self { file, format })
  }

  #[must_use]
  pub const fn format(&self) -> SpecFormat {
    self.format
  }

  pub fn bytes(&self) -> &[u8] {
    self.file.as_slice()
  }
}

/// Result of loading a root document and everything it references.
#[derive(Debug)]
pub struct LoadedDocuments {
  pub documents: DocumentSet,
  /// External documents that could not be read, with the reason.
  pub unreadable: Vec<(String, String)>,
}

/// Loads the root document, then every external document reachable through
/// `$ref`, one concurrent wave per reference depth.
pub async fn load_documents(path: &Path, cache: &mut DocumentCache) -> anyhow::Result<LoadedDocuments> {
  let root = SpecLoader::open(path).await?;
  let root_name = path
    .file_name()
    .and_then(OsStr::to_str)
    .unwrap_or_default()
    .to_string();
  let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

  let root_value = cache.parse(&root_name, root.bytes(), root.format())?;
  let mut documents = DocumentSet::from_shared(root_value)?.with_root_name(&root_name);
  let mut unreadable = vec![];

  let mut seen = BTreeSet::new();
  let mut pending = documents.pending_references();

  while !pending.is_empty() {
    let mut tasks = JoinSet::new();
    for relative in pending {
      if !seen.insert(relative.clone()) {
        continue;
      }
      let full_path = base_dir.join(&relative);
      tasks.spawn(read_external(relative, full_path));
    }

    while let Some(joined) = tasks.join_next().await {
      let (relative, read) = joined.context("External document task failed")?;
      match read.and_then(|(bytes, format)| Ok(cache.parse(&relative, &bytes, format)?)) {
        Ok(value) => documents.insert_external(&relative, value),
        Err(error) => {
          documents.mark_unreadable(&relative);
          unreadable.push((relative, format!("{error:#}")));
        }
      }
    }

    pending = documents
      .pending_references()
      .into_iter()
      .filter(|relative| !seen.contains(relative))
      .collect();
  }

  unreadable.sort();
  Ok(LoadedDocuments { documents, unreadable })
}

async fn read_external(relative: String, path: PathBuf) -> (String, anyhow::Result<(Vec<u8>, SpecFormat)>) {
  let read = SpecLoader::open(&path)
    .await
    .map(|loader| (loader.bytes().to_vec(), loader.format()));
  (relative, read)
}

/// Parses a JSON or YAML document into a raw value.
pub fn parse_document(name: &str, bytes: &[u8], format: SpecFormat) -> Result<serde_json::Value, DocumentError> {
  match format {
    SpecFormat::Json => serde_json::from_slice(bytes).map_err(|source| DocumentError::Json {
      name: name.to_string(),
      source,
    }),
    SpecFormat::Yaml => serde_yaml::from_slice(bytes).map_err(|source| DocumentError::Yaml {
      name: name.to_string(),
      source,
    }),
  }
}

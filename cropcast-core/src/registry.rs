//! Model registry: (crop, state) → trained regressor.
//!
//! Models are loaded from a directory of JSON model files once, on first use
//! or eagerly through `ensure_loaded()`, and then served read-only for the
//! rest of the process. The load itself is serialized behind a mutex so that
//! concurrent first requests never load twice or observe a partial table.
//! A failed load leaves the cache empty and is retried on the next call.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::CropStateKey;
use crate::features::FeatureVector;
use crate::model::{ModelError, ModelFile, Regressor};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("model not found for {crop} in {state}")]
    UnknownCombination { crop: String, state: String },

    #[error("cannot read model directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read model file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model file {path}: {source}")]
    InvalidModel {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    #[error("duplicate model for {key}: {first} and {second}")]
    DuplicateModel {
        key: CropStateKey,
        first: PathBuf,
        second: PathBuf,
    },
}

/// One loaded model and where it came from.
pub struct ModelEntry {
    pub key: CropStateKey,
    pub model: Arc<dyn Regressor>,
    /// BLAKE3 hex digest of the model file bytes (or of the key for
    /// in-memory entries).
    pub fingerprint: String,
    pub source: Option<PathBuf>,
}

impl ModelEntry {
    /// An in-memory entry not backed by a file.
    pub fn new(key: CropStateKey, model: Arc<dyn Regressor>) -> Self {
        let fingerprint = blake3::hash(format!("{}|{}", key.crop, key.state).as_bytes())
            .to_hex()
            .to_string();
        Self {
            key,
            model,
            fingerprint,
            source: None,
        }
    }

    /// Run the regressor. Pure; the entry is never mutated.
    pub fn infer(&self, features: &FeatureVector) -> f64 {
        self.model.predict(features)
    }
}

impl fmt::Debug for ModelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelEntry")
            .field("key", &self.key)
            .field("kind", &self.model.kind())
            .field("fingerprint", &self.fingerprint)
            .field("source", &self.source)
            .finish()
    }
}

type ModelTable = BTreeMap<CropStateKey, Arc<ModelEntry>>;

#[derive(Debug, Clone)]
enum ModelSource {
    Directory(PathBuf),
    Preloaded,
}

/// Write-once cache of trained models.
#[derive(Debug)]
pub struct ModelRegistry {
    source: ModelSource,
    table: OnceLock<ModelTable>,
    init: Mutex<()>,
}

impl ModelRegistry {
    /// Registry backed by a directory of `*.json` model files, loaded lazily.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            source: ModelSource::Directory(dir.into()),
            table: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// Registry populated from in-memory entries. A later entry for the same
    /// key replaces an earlier one.
    pub fn from_entries(entries: impl IntoIterator<Item = ModelEntry>) -> Self {
        let table: ModelTable = entries
            .into_iter()
            .map(|e| (e.key.clone(), Arc::new(e)))
            .collect();
        Self {
            source: ModelSource::Preloaded,
            table: OnceLock::from(table),
            init: Mutex::new(()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    /// Populate the cache if it is still empty and return it.
    pub fn ensure_loaded(&self) -> Result<&ModelTable, RegistryError> {
        if let Some(table) = self.table.get() {
            return Ok(table);
        }

        let _guard = self.init.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(table) = self.table.get() {
            return Ok(table);
        }

        let table = match &self.source {
            ModelSource::Directory(dir) => load_dir(dir)?,
            ModelSource::Preloaded => ModelTable::new(),
        };
        Ok(self.table.get_or_init(|| table))
    }

    /// Resolve the model for a pair.
    pub fn lookup(&self, crop: &str, state: &str) -> Result<Arc<ModelEntry>, RegistryError> {
        let table = self.ensure_loaded()?;
        table
            .get(&CropStateKey::new(crop, state))
            .cloned()
            .ok_or_else(|| RegistryError::UnknownCombination {
                crop: crop.to_string(),
                state: state.to_string(),
            })
    }

    /// Run an entry's regressor on a feature vector.
    pub fn infer(entry: &ModelEntry, features: &FeatureVector) -> f64 {
        entry.infer(features)
    }

    /// All loaded entries in key order.
    pub fn entries(&self) -> Result<Vec<Arc<ModelEntry>>, RegistryError> {
        Ok(self.ensure_loaded()?.values().cloned().collect())
    }

    pub fn keys(&self) -> Result<Vec<CropStateKey>, RegistryError> {
        Ok(self.ensure_loaded()?.keys().cloned().collect())
    }
}

fn load_dir(dir: &Path) -> Result<ModelTable, RegistryError> {
    let read_dir = std::fs::read_dir(dir).map_err(|source| RegistryError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| RegistryError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut table = ModelTable::new();
    for path in paths {
        let entry = load_file(&path)?;
        if let Some(existing) = table.get(&entry.key) {
            return Err(RegistryError::DuplicateModel {
                key: entry.key.clone(),
                first: existing.source.clone().unwrap_or_default(),
                second: path,
            });
        }
        debug!(
            key = %entry.key,
            kind = entry.model.kind(),
            fingerprint = %&entry.fingerprint[..12],
            "loaded model"
        );
        table.insert(entry.key.clone(), Arc::new(entry));
    }

    info!(dir = %dir.display(), models = table.len(), "model registry loaded");
    Ok(table)
}

fn load_file(path: &Path) -> Result<ModelEntry, RegistryError> {
    let bytes = std::fs::read(path).map_err(|source| RegistryError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let invalid = |source: ModelError| RegistryError::InvalidModel {
        path: path.to_path_buf(),
        source,
    };

    let file = ModelFile::from_slice(&bytes).map_err(invalid)?;
    let key = file.key();
    let model = file.model.into_regressor().map_err(invalid)?;

    Ok(ModelEntry {
        key,
        model,
        fingerprint: blake3::hash(&bytes).to_hex().to_string(),
        source: Some(path.to_path_buf()),
    })
}

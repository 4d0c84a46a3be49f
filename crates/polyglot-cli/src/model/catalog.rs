//! On-disk catalog of trained models.
//!
//! Each model is stored as two files in the catalog directory:
//!
//! - `model-<id>.json` - the [`TrainedModel`] metadata
//! - `model-<id>.dat` - the decider blob
//!
//! Both are written through a temporary file and renamed into place, so a
//! crashed write never leaves a half-written model behind.

use std::{
    collections::BTreeMap,
    fs,
    io::Write as _,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};

use anyhow::Context;
use polyglot_learning::Decider;
use tempfile::NamedTempFile;

use super::TrainedModel;
use crate::util;

const FILE_PREFIX: &str = "model-";
const METADATA_EXTENSION: &str = "json";
const DECIDER_EXTENSION: &str = "dat";

/// Trained models stored in one directory.
///
/// The metadata map is shared between readers; registering a model takes the
/// write lock.
#[derive(Debug)]
pub struct ModelCatalog {
    dir: PathBuf,
    models: RwLock<BTreeMap<String, TrainedModel>>,
}

impl ModelCatalog {
    /// Opens the catalog in `dir`, loading the metadata of every stored model.
    ///
    /// A missing directory is an empty catalog.
    pub fn open<P>(dir: P) -> anyhow::Result<Self>
    where
        P: Into<PathBuf>,
    {
        let dir = dir.into();
        let mut models = BTreeMap::new();
        if dir.exists() {
            let entries = fs::read_dir(&dir)
                .with_context(|| format!("Failed to read model directory: {}", dir.display()))?;
            for entry in entries {
                let path = entry
                    .with_context(|| format!("Failed to read model directory: {}", dir.display()))?
                    .path();
                if !is_metadata_file(&path) {
                    continue;
                }
                let model: TrainedModel = util::read_json_file("model metadata", &path)?;
                models.insert(model.id.clone(), model);
            }
        }
        Ok(Self {
            dir,
            models: RwLock::new(models),
        })
    }

    /// Stores a model and its decider.
    pub fn register(&self, model: TrainedModel, decider: &Decider) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create model directory: {}", self.dir.display())
        })?;

        let bytes = decider
            .to_bytes()
            .with_context(|| format!("Failed to encode decider for model {}", model.id))?;
        let metadata = serde_json::to_vec_pretty(&model)
            .with_context(|| format!("Failed to encode metadata for model {}", model.id))?;

        let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);
        self.write_atomically(&self.decider_path(&model.id), &bytes)?;
        self.write_atomically(&self.metadata_path(&model.id), &metadata)?;
        tracing::info!(id = %model.id, dir = %self.dir.display(), "registered model");
        models.insert(model.id.clone(), model);
        Ok(())
    }

    /// Every model, ordered by id.
    pub fn models(&self) -> Vec<TrainedModel> {
        let models = self.models.read().unwrap_or_else(PoisonError::into_inner);
        models.values().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<TrainedModel> {
        let models = self.models.read().unwrap_or_else(PoisonError::into_inner);
        models.get(id).cloned()
    }

    /// Loads the decider of a registered model.
    pub fn load_decider(&self, id: &str) -> anyhow::Result<Decider> {
        if self.get(id).is_none() {
            anyhow::bail!("Unknown model: {id}");
        }
        let path = self.decider_path(id);
        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read decider file: {}", path.display()))?;
        let decider = Decider::from_bytes(&bytes)
            .with_context(|| format!("Failed to load decider file: {}", path.display()))?;
        Ok(decider)
    }

    fn metadata_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{id}.{METADATA_EXTENSION}"))
    }

    fn decider_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{id}.{DECIDER_EXTENSION}"))
    }

    fn write_atomically(&self, path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
        let mut file = NamedTempFile::new_in(&self.dir).with_context(|| {
            format!("Failed to create temporary file in {}", self.dir.display())
        })?;
        file.write_all(bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        file.persist(path)
            .with_context(|| format!("Failed to persist {}", path.display()))?;
        Ok(())
    }
}

fn is_metadata_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == METADATA_EXTENSION)
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(FILE_PREFIX))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use polyglot_core::{Example, Language};
    use polyglot_learning::{AbsoluteDecider, TrainingMethod, TrainingParams};

    use super::*;

    fn model(id: &str) -> TrainedModel {
        TrainedModel {
            id: id.to_owned(),
            description: "test model".to_owned(),
            method: TrainingMethod::DecisionTree { depth: 2 },
            params: TrainingParams::default(),
            seed: 7,
            trained_at: Utc::now(),
            training_accuracy_percentage: 100.0,
            testing_accuracy_percentage: None,
        }
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ModelCatalog::open(dir.path().join("missing")).unwrap();
        assert!(catalog.models().is_empty());
    }

    #[test]
    fn test_register_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let decider = Decider::from(AbsoluteDecider::for_language(Language::Romanian));

        let catalog = ModelCatalog::open(dir.path()).unwrap();
        catalog.register(model("b"), &decider).unwrap();
        catalog.register(model("a"), &decider).unwrap();
        assert_eq!(
            catalog.models().iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
            ["a", "b"]
        );

        let reopened = ModelCatalog::open(dir.path()).unwrap();
        assert_eq!(reopened.models(), catalog.models());
        let loaded = reopened.load_decider("a").unwrap();
        let example = Example::unlabeled("buna ziua");
        assert_eq!(loaded.decide(&example), decider.decide(&example));
    }

    #[test]
    fn test_unknown_model() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ModelCatalog::open(dir.path()).unwrap();
        assert!(catalog.get("nope").is_none());
        assert!(catalog.load_decider("nope").is_err());
    }

    #[test]
    fn test_ignores_unrelated_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.json"), "not a model").unwrap();
        fs::write(dir.path().join("model-x.txt"), "not a model").unwrap();
        let catalog = ModelCatalog::open(dir.path()).unwrap();
        assert!(catalog.models().is_empty());
    }
}

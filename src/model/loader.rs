//! Scoring artifact loader
//!
//! Loading never fails from the caller's point of view: a missing or broken
//! artifact yields [`ModelState::Absent`] and the predictor runs in degraded
//! mode.

use std::fmt;
use std::path::Path;

use anyhow::Result;
use polars::prelude::DataFrame;
use tracing::{error, info, warn};

use crate::model::artifact::PipelineArtifact;
use crate::model::error::ModelError;

/// Conventional location of the trained pipeline, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "model/final_model_pipeline.json";

/// Anything that can turn a table of feature rows into no-show probabilities.
pub trait ScoringModel: Send + Sync {
    /// Columns the model reads from its input table
    fn feature_names(&self) -> &[String];

    /// Probability of the positive (no-show) class, one per input row.
    ///
    /// Columns are looked up by name; a missing or unusable column is an error.
    fn predict_proba(&self, features: &DataFrame) -> Result<Vec<f64>>;
}

/// Result of a model load: either a usable scorer or nothing.
pub enum ModelState {
    Loaded(Box<dyn ScoringModel>),
    Absent,
}

impl ModelState {
    /// Wrap a concrete scorer
    pub fn loaded<M: ScoringModel + 'static>(model: M) -> Self {
        ModelState::Loaded(Box::new(model))
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelState::Loaded(_))
    }

    /// Borrow the scorer, if any
    pub fn model(&self) -> Option<&dyn ScoringModel> {
        match self {
            ModelState::Loaded(model) => Some(model.as_ref()),
            ModelState::Absent => None,
        }
    }
}

impl fmt::Debug for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelState::Loaded(model) => f
                .debug_struct("Loaded")
                .field("features", &model.feature_names())
                .finish(),
            ModelState::Absent => f.write_str("Absent"),
        }
    }
}

/// Read, parse and validate a pipeline artifact.
pub fn try_load_model(path: &Path) -> Result<PipelineArtifact, ModelError> {
    let contents = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ModelError::NotFound(path.to_path_buf())
        } else {
            ModelError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let artifact: PipelineArtifact =
        serde_json::from_str(&contents).map_err(|source| ModelError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;

    artifact.validate()?;
    Ok(artifact)
}

/// Load the pipeline at `path`, degrading to [`ModelState::Absent`] on any failure.
pub fn load_model(path: &Path) -> ModelState {
    match try_load_model(path) {
        Ok(artifact) => {
            info!(
                path = %path.display(),
                features = artifact.feature_names.len(),
                "Model pipeline loaded"
            );
            ModelState::loaded(artifact)
        }
        Err(e) if e.is_not_found() => {
            warn!(path = %path.display(), "Model file not found, predictions will use neutral scores");
            ModelState::Absent
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to load model, predictions will use neutral scores");
            ModelState::Absent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = try_load_model(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_missing_file_degrades() {
        let dir = TempDir::new().unwrap();
        let state = load_model(&dir.path().join("nope.json"));
        assert!(!state.is_loaded());
        assert!(state.model().is_none());
    }

    #[test]
    fn test_garbage_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = try_load_model(&path).unwrap_err();
        assert!(matches!(err, ModelError::Corrupt { .. }));
        assert!(!load_model(&path).is_loaded());
    }

    #[test]
    fn test_debug_absent() {
        let state = ModelState::Absent;
        assert_eq!(format!("{:?}", state), "Absent");
    }
}

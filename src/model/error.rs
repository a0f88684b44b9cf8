//! Error types for scoring artifact loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or validating a scoring artifact.
///
/// The loader only needs to tell [`ModelError::NotFound`] apart from the
/// rest: a missing file is expected on a fresh install, everything else is
/// a broken artifact.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No file at the artifact path.
    #[error("model file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("failed to read model file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid JSON pipeline.
    #[error("failed to parse model file {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The pipeline parsed but is internally inconsistent.
    #[error("invalid model pipeline: {0}")]
    Invalid(String),
}

impl ModelError {
    /// Returns true if the error means "there is no artifact at all".
    pub fn is_not_found(&self) -> bool {
        matches!(self, ModelError::NotFound(_))
    }
}

//! Batch no-show prediction
//!
//! Scores a table of appointment features and appends three columns:
//! `risk_score`, `risk_level` and `predicted_outcome`. Without a model every
//! row receives the neutral prediction so the rest of the pipeline can still
//! run.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::{debug, info};

use crate::model::{load_model, ModelState};
use crate::pipeline::risk::{Prediction, RiskLevel};

pub const RISK_SCORE_COLUMN: &str = "risk_score";
pub const RISK_LEVEL_COLUMN: &str = "risk_level";
pub const PREDICTED_OUTCOME_COLUMN: &str = "predicted_outcome";

/// Scores appointment batches with a model loaded once at construction.
#[derive(Debug)]
pub struct NoShowPredictor {
    model: ModelState,
}

impl NoShowPredictor {
    /// Load the model at `model_path`. A missing or unreadable model leaves the
    /// predictor in degraded mode rather than failing.
    pub fn new(model_path: &Path) -> Self {
        Self::with_model(load_model(model_path))
    }

    pub fn with_model(model: ModelState) -> Self {
        Self { model }
    }

    /// True when no model is loaded and neutral scores are used
    pub fn is_degraded(&self) -> bool {
        !self.model.is_loaded()
    }

    pub fn model(&self) -> &ModelState {
        &self.model
    }

    /// Feature columns the loaded model reads, if a model is loaded
    pub fn expected_features(&self) -> Option<&[String]> {
        self.model.model().map(|m| m.feature_names())
    }

    /// Typed predictions, one per row of `features`, in row order.
    ///
    /// Column mismatches are reported by the model itself; use
    /// [`crate::pipeline::ensure_schema`] first for a friendlier message.
    pub fn score(&self, features: &DataFrame) -> Result<Vec<Prediction>> {
        let rows = features.height();

        let model = match self.model.model() {
            Some(model) if rows > 0 => model,
            Some(_) => return Ok(Vec::new()),
            None => {
                debug!(rows, "No model loaded, assigning neutral predictions");
                return Ok(vec![Prediction::neutral(); rows]);
            }
        };

        let probabilities = model
            .predict_proba(features)
            .context("Model failed to score the input data")?;

        if probabilities.len() != rows {
            anyhow::bail!(
                "Model returned {} probabilities for {} rows",
                probabilities.len(),
                rows
            );
        }

        if let Some((row, p)) = probabilities
            .iter()
            .enumerate()
            .find(|(_, p)| !(0.0..=1.0).contains(*p))
        {
            anyhow::bail!(
                "Model returned probability {} for row {}, expected a value in [0, 1]",
                p,
                row
            );
        }

        info!(rows, "Scored appointment batch");
        Ok(probabilities
            .into_iter()
            .map(Prediction::from_score)
            .collect())
    }

    /// Score `features` and return a copy with the prediction columns
    /// appended. The input table is left untouched.
    pub fn predict_batch(&self, features: &DataFrame) -> Result<DataFrame> {
        let predictions = self.score(features)?;
        let mut result = features.clone();
        append_predictions(&mut result, &predictions)?;
        Ok(result)
    }
}

/// Append (or replace) the three prediction columns on `df`.
pub fn append_predictions(df: &mut DataFrame, predictions: &[Prediction]) -> Result<()> {
    if predictions.len() != df.height() {
        anyhow::bail!(
            "Cannot attach {} predictions to a table with {} rows",
            predictions.len(),
            df.height()
        );
    }

    let scores: Vec<f64> = predictions.iter().map(|p| p.risk_score).collect();
    let levels: Vec<&str> = predictions.iter().map(|p| p.risk_level.as_str()).collect();
    let outcomes: Vec<i32> = predictions.iter().map(|p| p.predicted_outcome).collect();

    df.with_column(Column::new(RISK_SCORE_COLUMN.into(), scores))?;
    df.with_column(Column::new(RISK_LEVEL_COLUMN.into(), levels))?;
    df.with_column(Column::new(PREDICTED_OUTCOME_COLUMN.into(), outcomes))?;

    Ok(())
}

/// Read the prediction columns of an augmented table back into typed values.
pub fn extract_predictions(df: &DataFrame) -> Result<Vec<Prediction>> {
    let scores_col = df
        .column(RISK_SCORE_COLUMN)
        .with_context(|| format!("Prediction column '{}' not found", RISK_SCORE_COLUMN))?
        .cast(&DataType::Float64)?;
    let scores = scores_col.f64()?;

    let levels_col = df
        .column(RISK_LEVEL_COLUMN)
        .with_context(|| format!("Prediction column '{}' not found", RISK_LEVEL_COLUMN))?;
    let levels = levels_col
        .as_materialized_series()
        .str()
        .with_context(|| format!("Column '{}' must contain text labels", RISK_LEVEL_COLUMN))?;

    let outcomes_col = df
        .column(PREDICTED_OUTCOME_COLUMN)
        .with_context(|| {
            format!("Prediction column '{}' not found", PREDICTED_OUTCOME_COLUMN)
        })?
        .cast(&DataType::Int32)?;
    let outcomes = outcomes_col.i32()?;

    let mut predictions = Vec::with_capacity(df.height());
    for (i, ((score, level), outcome)) in scores
        .iter()
        .zip(levels.iter())
        .zip(outcomes.iter())
        .enumerate()
    {
        let (Some(risk_score), Some(level), Some(predicted_outcome)) = (score, level, outcome)
        else {
            anyhow::bail!("Row {} has a missing prediction value", i);
        };

        let risk_level: RiskLevel = level
            .parse()
            .map_err(|e: String| anyhow::anyhow!("Row {}: {}", i, e))?;

        if predicted_outcome != 0 && predicted_outcome != 1 {
            anyhow::bail!(
                "Row {}: predicted_outcome must be 0 or 1, got {}",
                i,
                predicted_outcome
            );
        }

        predictions.push(Prediction {
            risk_score,
            risk_level,
            predicted_outcome,
        });
    }

    Ok(predictions)
}

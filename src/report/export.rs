//! Prediction summary export

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{RiskThresholds, OUTCOME_THRESHOLD, RISK_THRESHOLDS};
use crate::report::{ScoreBin, SummaryStatistics};

/// Metadata about the scoring run
#[derive(Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    pub noshow_version: String,
    pub input_file: String,
    pub model_path: String,
    /// True when no model was loaded and neutral scores were used
    pub degraded: bool,
    pub risk_thresholds: RiskThresholds,
    pub outcome_threshold: f64,
}

/// Complete summary export
#[derive(Serialize)]
pub struct SummaryExport<'a> {
    pub metadata: RunMetadata,
    /// `null` when the input had no rows
    pub summary: Option<&'a SummaryStatistics>,
    pub distribution: &'a [ScoreBin],
}

/// Parameters for the summary export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub model_path: &'a str,
    pub degraded: bool,
}

/// Write summary statistics and the score distribution to a JSON file.
pub fn export_summary_json(
    summary: Option<&SummaryStatistics>,
    distribution: &[ScoreBin],
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let export = SummaryExport {
        metadata: RunMetadata {
            timestamp: Utc::now().to_rfc3339(),
            noshow_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            model_path: params.model_path.to_string(),
            degraded: params.degraded,
            risk_thresholds: RISK_THRESHOLDS,
            outcome_threshold: OUTCOME_THRESHOLD,
        },
        summary,
        distribution,
    };

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize prediction summary to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write summary to {}", output_path.display()))?;

    Ok(())
}

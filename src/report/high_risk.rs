//! High-risk appointment report

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use crate::pipeline::{RiskLevel, RISK_LEVEL_COLUMN, RISK_SCORE_COLUMN};

/// Rows whose `risk_level` is High, ordered by `risk_score` descending.
///
/// The sort is stable: appointments with equal scores keep their input order.
pub fn high_risk_report(predictions: &DataFrame) -> Result<DataFrame> {
    predictions
        .clone()
        .lazy()
        .filter(col(RISK_LEVEL_COLUMN).eq(lit(RiskLevel::High.as_str())))
        .sort(
            [RISK_SCORE_COLUMN],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .collect()
        .context("Failed to build high-risk report")
}

/// Write the report as UTF-8 CSV with a header row.
pub fn export_report_csv(report: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(report)
        .with_context(|| format!("Failed to write report file: {}", path.display()))?;
    Ok(())
}

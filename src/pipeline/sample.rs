//! Sample file extraction for trying the scorer on real data

use anyhow::{Context, Result};
use polars::prelude::*;

use crate::pipeline::schema::ensure_schema;

/// Default number of rows taken for a sample file
pub const DEFAULT_SAMPLE_ROWS: usize = 100;

/// Take the first `rows` rows of a cleaned dataset, keeping only the model's
/// feature columns in the model's order. Target and identifier columns are
/// dropped.
pub fn build_sample(df: &DataFrame, features: &[String], rows: usize) -> Result<DataFrame> {
    ensure_schema(df, features)?;

    df.head(Some(rows))
        .select(features.iter().map(String::as_str))
        .context("Failed to select feature columns for the sample")
}

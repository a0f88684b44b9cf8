//! Input column checks against the model's expected feature set

use anyhow::Result;
use polars::prelude::*;

/// Outcome of comparing a table's columns with the model's features
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaCheck {
    /// Features the model needs that the table lacks
    pub missing: Vec<String>,
    /// Table columns the model does not read
    pub unexpected: Vec<String>,
}

impl SchemaCheck {
    /// True when every expected feature is present. Extra columns are allowed.
    pub fn is_compatible(&self) -> bool {
        self.missing.is_empty()
    }

    /// True when the column set matches exactly, ignoring order
    pub fn is_exact(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}

/// Compare the columns of `df` with `expected` by name.
pub fn validate_schema(df: &DataFrame, expected: &[String]) -> SchemaCheck {
    let actual: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    SchemaCheck {
        missing: expected
            .iter()
            .filter(|name| !actual.contains(name))
            .cloned()
            .collect(),
        unexpected: actual
            .iter()
            .filter(|name| !expected.contains(name))
            .cloned()
            .collect(),
    }
}

/// Fail with a readable message if `df` lacks any of the `expected` features.
pub fn ensure_schema(df: &DataFrame, expected: &[String]) -> Result<()> {
    let check = validate_schema(df, expected);
    if !check.is_compatible() {
        anyhow::bail!(
            "Input data is missing {} feature column(s) required by the model: {:?}",
            check.missing.len(),
            check.missing
        );
    }
    Ok(())
}

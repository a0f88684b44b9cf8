//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::model::DEFAULT_MODEL_PATH;
use crate::pipeline::DEFAULT_SAMPLE_ROWS;

/// No-show - Score appointments for no-show risk and report the high-risk ones
#[derive(Parser, Debug)]
#[command(name = "noshow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input file with appointment features (CSV or Parquet).
    /// Column names must match the features the model was trained on.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Trained pipeline (JSON). When missing or unreadable, every appointment
    /// gets a neutral score of 0.5.
    #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    /// High-risk report path (CSV).
    /// Defaults to input directory with '_high_risk' suffix (e.g., data.csv → data_high_risk.csv).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also save the full scored table (CSV or Parquet, determined by extension)
    #[arg(long)]
    pub predictions: Option<PathBuf>,

    /// Also save summary statistics and the score distribution as JSON
    #[arg(long)]
    pub summary_json: Option<PathBuf>,

    /// Number of equal-width bins for the risk score distribution
    #[arg(long, default_value = "30", value_parser = validate_bins)]
    pub bins: usize,

    /// Print the first N input rows before scoring (0 = off)
    #[arg(long, default_value = "0")]
    pub show_raw: usize,

    /// Number of high-risk rows to print before export
    #[arg(long, default_value = "10")]
    pub preview_rows: usize,

    /// Skip interactive confirmation prompts (overwrite existing report)
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Show diagnostic log messages
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract a sample input file holding only the model's feature columns
    Sample {
        /// Cleaned dataset (CSV or Parquet)
        input: PathBuf,

        /// Output CSV path (optional, defaults to input with '_sample.csv' suffix)
        output: Option<PathBuf>,

        /// Number of leading rows to keep
        #[arg(long, default_value_t = DEFAULT_SAMPLE_ROWS)]
        rows: usize,

        /// Trained pipeline providing the feature list
        #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,

        /// Number of rows to use for schema inference (CSV only)
        #[arg(long, default_value = "10000")]
        infer_schema_length: usize,
    },
}

impl Cli {
    pub fn input(&self) -> Option<&PathBuf> {
        self.input.as_ref()
    }

    /// Get the report path, deriving from input if not explicitly provided.
    /// The derived path will be in the same directory as the input with a '_high_risk.csv' suffix.
    pub fn output_path(&self) -> Option<PathBuf> {
        if let Some(output) = &self.output {
            return Some(output.clone());
        }
        let input = self.input.as_ref()?;
        let parent = input.parent().unwrap_or_else(|| std::path::Path::new("."));
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("appointments");
        Some(parent.join(format!("{}_high_risk.csv", stem)))
    }
}

/// Validator for the bins parameter
fn validate_bins(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid bin count", s))?;

    if value == 0 {
        Err("bins must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

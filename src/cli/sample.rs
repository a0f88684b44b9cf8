//! Sample input extraction

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;

use crate::model::try_load_model;
use crate::pipeline::{build_sample, load_dataset, save_dataset};
use crate::utils::create_spinner;

/// Default output path: input directory, '_sample.csv' suffix
pub fn sample_output_path(input: &Path) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("appointments");
    parent.join(format!("{}_sample.csv", stem))
}

/// Write the first `rows` rows of `input`, restricted to the model's features.
///
/// Unlike scoring, this needs a real model: the feature list comes from it.
pub fn run_sample(
    input: &Path,
    output: Option<&Path>,
    rows: usize,
    model_path: &Path,
    infer_schema_length: usize,
) -> Result<()> {
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| sample_output_path(input));

    println!(
        "\n {} Creating sample input file",
        style("◆").cyan().bold()
    );
    println!("   Input:  {}", style(input.display()).dim());
    println!("   Model:  {}", style(model_path.display()).dim());
    println!("   Output: {}", style(output_path.display()).dim());
    println!();

    let model = try_load_model(model_path).with_context(|| {
        format!(
            "A trained model is required to select sample columns ({})",
            model_path.display()
        )
    })?;
    println!(
        "   Model requires {} column(s): {}",
        style(model.feature_names.len()).yellow(),
        style(model.feature_names.join(", ")).dim()
    );

    let spinner = create_spinner("Reading dataset...");
    let df = load_dataset(input, infer_schema_length)?;
    spinner.finish_with_message(format!(
        "{} Dataset loaded ({} rows)",
        style("✓").green(),
        df.height()
    ));

    let mut sample = build_sample(&df, &model.feature_names, rows)?;
    save_dataset(&mut sample, &output_path)?;

    println!();
    println!(
        "   {} rows × {} columns",
        style(sample.height()).yellow(),
        style(sample.width()).yellow()
    );
    println!(
        " {} Sample written to {}",
        style("✓").green().bold(),
        output_path.display()
    );

    Ok(())
}

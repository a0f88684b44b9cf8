//! No-show: Appointment Risk Scoring CLI
//!
//! Scores an appointment table with a trained pipeline, prints summary
//! statistics and exports the high-risk appointments.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use noshow::cli::{confirm_overwrite, sample::run_sample, Cli, Commands};
use noshow::pipeline::{
    ensure_schema, load_dataset, save_dataset, validate_schema, NoShowPredictor, RISK_THRESHOLDS,
};
use noshow::report::{
    display_distribution, export_report_csv, export_summary_json, high_risk_report,
    risk_distribution, summarize, ExportParams,
};
use noshow::utils::{
    create_spinner, finish_with_success, finish_with_warning, init_logging, print_banner,
    print_completion, print_config, print_count, print_info, print_step_header, print_step_time,
    print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Sample {
                input,
                output,
                rows,
                model,
                infer_schema_length,
            } => run_sample(input, output.as_deref(), *rows, model, *infer_schema_length),
        };
    }

    // Main scoring pipeline - require input
    let input = cli.input().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;
    let output_path = cli
        .output_path()
        .ok_or_else(|| anyhow::anyhow!("Could not derive a report path from the input"))?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(input, &cli.model, &output_path, cli.bins);

    // Step 1: Load appointments
    print_step_header(1, "Load Appointments");

    let step_start = Instant::now();
    let spinner = create_spinner("Reading appointment data...");
    let df = load_dataset(input, cli.infer_schema_length)?;
    finish_with_success(&spinner, "Appointment data loaded");

    let (rows, cols) = df.shape();
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);

    if cli.show_raw > 0 {
        println!("\n{}", df.head(Some(cli.show_raw)));
    }
    print_step_time(step_start.elapsed());

    // Step 2: Load model
    print_step_header(2, "Load Model");

    let step_start = Instant::now();
    let predictor = NoShowPredictor::new(&cli.model);
    match predictor.expected_features() {
        Some(features) => {
            print_success(&format!("Model loaded ({} features)", features.len()));

            let check = validate_schema(&df, features);
            if !check.unexpected.is_empty() {
                print_info(&format!(
                    "{} column(s) not used by the model: {}",
                    check.unexpected.len(),
                    check.unexpected.join(", ")
                ));
            }
            ensure_schema(&df, features)?;
        }
        None => {
            print_warning("No usable model found - every appointment gets a neutral score");
        }
    }
    print_step_time(step_start.elapsed());

    // Step 3: Predict
    print_step_header(3, "Predict No-Shows");

    let step_start = Instant::now();
    let spinner = create_spinner("Running predictions...");
    let predictions = predictor.predict_batch(&df)?;
    if predictor.is_degraded() {
        finish_with_warning(&spinner, "Neutral predictions assigned (degraded mode)");
    } else {
        finish_with_success(&spinner, "Predictions complete");
    }
    print_step_time(step_start.elapsed());

    // Step 4: Analyze
    print_step_header(4, "Analyze Risk");

    let stats = summarize(&predictions)?;
    match &stats {
        Some(stats) => stats.display(),
        None => print_info("No appointments to summarize"),
    }

    let histogram = risk_distribution(&predictions, cli.bins)?;
    if !histogram.is_empty() {
        display_distribution(&histogram);
    }

    // Step 5: High-risk report
    print_step_header(5, "High-Risk Report");

    let step_start = Instant::now();
    let mut report = high_risk_report(&predictions)?;

    if report.height() == 0 {
        print_info("No high-risk appointments found");
    } else {
        let threshold_info = format!("(score ≥ {:.2})", RISK_THRESHOLDS.high);
        print_count("high-risk appointment(s)", report.height(), Some(&threshold_info));
        if cli.preview_rows > 0 {
            println!("\n{}", report.head(Some(cli.preview_rows)));
        }
    }

    if output_path.exists() && !cli.no_confirm && !confirm_overwrite(&output_path)? {
        print_info("Kept existing report file");
    } else {
        export_report_csv(&mut report, &output_path)?;
        print_success(&format!("Report saved to {}", output_path.display()));
    }

    if let Some(path) = &cli.predictions {
        let mut full = predictions.clone();
        save_dataset(&mut full, path)?;
        print_success(&format!("Predictions saved to {}", path.display()));
    }

    if let Some(path) = &cli.summary_json {
        let input_file = input.display().to_string();
        let model_path = cli.model.display().to_string();
        export_summary_json(
            stats.as_ref(),
            &histogram,
            path,
            &ExportParams {
                input_file: &input_file,
                model_path: &model_path,
                degraded: predictor.is_degraded(),
            },
        )?;
        print_success(&format!("Summary saved to {}", path.display()));
    }
    print_step_time(step_start.elapsed());

    print_completion();

    Ok(())
}

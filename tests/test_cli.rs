//! Tests for CLI argument parsing and end-to-end runs of the binary

use assert_cmd::Command;
use clap::Parser;
use noshow::cli::{Cli, Commands};
use predicates::prelude::*;
use std::path::PathBuf;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_cli_default_values() {
    let cli = Cli::parse_from(["noshow", "-i", "appointments.csv"]);

    assert_eq!(cli.model, PathBuf::from("model/final_model_pipeline.json"));
    assert_eq!(cli.bins, 30, "Default bins should be 30");
    assert_eq!(cli.show_raw, 0);
    assert_eq!(cli.preview_rows, 10);
    assert!(!cli.no_confirm, "Default no_confirm should be false");
    assert!(!cli.verbose);
    assert_eq!(cli.infer_schema_length, 10000);
    assert!(cli.predictions.is_none());
    assert!(cli.summary_json.is_none());
}

#[test]
fn test_cli_output_path_derivation() {
    let cli = Cli::parse_from(["noshow", "-i", "/path/to/appointments.csv"]);

    let output = cli.output_path().unwrap();
    assert_eq!(output, PathBuf::from("/path/to/appointments_high_risk.csv"));
}

#[test]
fn test_cli_explicit_output_path() {
    let cli = Cli::parse_from(["noshow", "-i", "data.parquet", "-o", "report.csv"]);

    assert_eq!(cli.output_path().unwrap(), PathBuf::from("report.csv"));
}

#[test]
fn test_cli_zero_bins_rejected() {
    let result = Cli::try_parse_from(["noshow", "-i", "data.csv", "--bins", "0"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_sample_subcommand() {
    let cli = Cli::parse_from(["noshow", "sample", "cleaned.csv", "--rows", "25"]);

    match cli.command {
        Some(Commands::Sample {
            input,
            output,
            rows,
            model,
            ..
        }) => {
            assert_eq!(input, PathBuf::from("cleaned.csv"));
            assert!(output.is_none());
            assert_eq!(rows, 25);
            assert_eq!(model, PathBuf::from("model/final_model_pipeline.json"));
        }
        other => panic!("expected sample subcommand, got {:?}", other),
    }
}

#[test]
fn test_binary_degraded_run_writes_empty_report() {
    let mut df = common::create_appointments();
    let (temp_dir, csv_path) = common::create_temp_csv(&mut df);
    let report_path = temp_dir.path().join("report.csv");
    let summary_path = temp_dir.path().join("summary.json");

    Command::cargo_bin("noshow")
        .unwrap()
        .arg("-i")
        .arg(&csv_path)
        .arg("-m")
        .arg(temp_dir.path().join("missing.json"))
        .arg("-o")
        .arg(&report_path)
        .arg("--summary-json")
        .arg(&summary_path)
        .arg("--no-confirm")
        .assert()
        .success()
        .stdout(predicate::str::contains("neutral score"));

    let report = std::fs::read_to_string(&report_path).unwrap();
    assert_eq!(report.lines().count(), 1, "only the header row expected");

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(summary["metadata"]["degraded"], true);
    assert_eq!(summary["summary"]["medium_risk_count"], 6);
}

#[test]
fn test_binary_scores_with_model() {
    let mut df = common::create_appointments();
    let (temp_dir, csv_path) = common::create_temp_csv(&mut df);
    let model_path = temp_dir.path().join("model.json");
    std::fs::write(
        &model_path,
        serde_json::to_string(&common::lead_time_forest()).unwrap(),
    )
    .unwrap();
    let report_path = temp_dir.path().join("report.csv");
    let predictions_path = temp_dir.path().join("scored.parquet");

    Command::cargo_bin("noshow")
        .unwrap()
        .arg("-i")
        .arg(&csv_path)
        .arg("-m")
        .arg(&model_path)
        .arg("-o")
        .arg(&report_path)
        .arg("--predictions")
        .arg(&predictions_path)
        .arg("--no-confirm")
        .assert()
        .success()
        .stdout(predicate::str::contains("Model loaded (8 features)"))
        .stdout(predicate::str::contains(format!(
            "(score ≥ {:.2})",
            noshow::pipeline::RISK_THRESHOLDS.high
        )));

    let report = std::fs::read_to_string(&report_path).unwrap();
    assert_eq!(report.lines().count(), 3, "header plus two high-risk rows");

    let scored = noshow::pipeline::load_dataset(&predictions_path, 100).unwrap();
    assert_eq!(scored.height(), 6);
    assert_eq!(scored.width(), 11);
}

#[test]
fn test_binary_schema_mismatch_fails() {
    let mut df = common::create_appointments().drop("age").unwrap();
    let (temp_dir, csv_path) = common::create_temp_csv(&mut df);
    let (_model_dir, model_path) = common::write_model(&common::lead_time_forest());

    Command::cargo_bin("noshow")
        .unwrap()
        .arg("-i")
        .arg(&csv_path)
        .arg("-m")
        .arg(&model_path)
        .arg("-o")
        .arg(temp_dir.path().join("report.csv"))
        .arg("--no-confirm")
        .assert()
        .failure()
        .stderr(predicate::str::contains("age"));
}

#[test]
fn test_binary_sample_subcommand() {
    let mut cleaned = common::create_appointments();
    let (temp_dir, csv_path) = common::create_temp_csv(&mut cleaned);
    let (_model_dir, model_path) = common::write_model(&common::lead_time_forest());
    let sample_path = temp_dir.path().join("sample.csv");

    Command::cargo_bin("noshow")
        .unwrap()
        .arg("sample")
        .arg(&csv_path)
        .arg(&sample_path)
        .arg("--rows")
        .arg("3")
        .arg("-m")
        .arg(&model_path)
        .assert()
        .success();

    let sample = noshow::pipeline::load_dataset(&sample_path, 100).unwrap();
    assert_eq!(sample.shape(), (3, 8));
}

#[test]
fn test_binary_sample_requires_model() {
    let mut cleaned = common::create_appointments();
    let (temp_dir, csv_path) = common::create_temp_csv(&mut cleaned);

    Command::cargo_bin("noshow")
        .unwrap()
        .arg("sample")
        .arg(&csv_path)
        .arg("-m")
        .arg(temp_dir.path().join("missing.json"))
        .assert()
        .failure();
}

//! Shared test utilities and fixture generators
#![allow(dead_code)]

use noshow::model::{Classifier, DecisionTree, PipelineArtifact, ScoringModel, StandardScaler, TreeNode};
use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// The eight features of the production no-show pipeline
pub const FEATURES: [&str; 8] = [
    "age",
    "lead_time_days",
    "appointment_dow",
    "sms_received",
    "total_conditions",
    "gender",
    "hypertension",
    "has_chronic_condition",
];

/// Appointment features in a different column order than the model expects
pub fn create_appointments() -> DataFrame {
    df! {
        "has_chronic_condition" => [0i32, 1, 0, 1, 0, 0],
        "hypertension" => [0i32, 1, 0, 1, 0, 0],
        "gender" => [1i32, 0, 0, 1, 1, 0],
        "total_conditions" => [0i32, 2, 0, 3, 1, 0],
        "sms_received" => [1i32, 0, 1, 0, 0, 1],
        "appointment_dow" => [0i32, 1, 2, 3, 4, 0],
        "lead_time_days" => [0i64, 3, 12, 25, 40, 60],
        "age" => [34i32, 71, 22, 58, 45, 19],
    }
    .unwrap()
}

/// A model that returns fixed probabilities in row order, for pinning exact scores
pub struct FixedScores {
    pub features: Vec<String>,
    pub scores: Vec<f64>,
}

impl FixedScores {
    pub fn new(scores: &[f64]) -> Self {
        Self {
            features: vec!["age".to_string()],
            scores: scores.to_vec(),
        }
    }
}

impl ScoringModel for FixedScores {
    fn feature_names(&self) -> &[String] {
        &self.features
    }

    fn predict_proba(&self, features: &DataFrame) -> anyhow::Result<Vec<f64>> {
        for name in &self.features {
            features.column(name)?;
        }
        Ok(self.scores.clone())
    }
}

/// Forest keyed on lead time: longer lead times mean higher no-show risk
pub fn lead_time_forest() -> PipelineArtifact {
    let lead_time = FEATURES.iter().position(|f| *f == "lead_time_days").unwrap();
    let sms = FEATURES.iter().position(|f| *f == "sms_received").unwrap();

    PipelineArtifact {
        feature_names: FEATURES.iter().map(|s| s.to_string()).collect(),
        scaler: None,
        classifier: Classifier::RandomForest {
            trees: vec![
                // lead_time <= 7 -> 0.1, <= 30 -> 0.4, else 0.9
                DecisionTree {
                    nodes: vec![
                        TreeNode::Split { feature: lead_time, threshold: 7.0, left: 1, right: 2 },
                        TreeNode::Leaf { probability: 0.1 },
                        TreeNode::Split { feature: lead_time, threshold: 30.0, left: 3, right: 4 },
                        TreeNode::Leaf { probability: 0.4 },
                        TreeNode::Leaf { probability: 0.9 },
                    ],
                },
                // no SMS reminder -> 0.5, reminder -> 0.3
                DecisionTree {
                    nodes: vec![
                        TreeNode::Split { feature: sms, threshold: 0.5, left: 1, right: 2 },
                        TreeNode::Leaf { probability: 0.5 },
                        TreeNode::Leaf { probability: 0.3 },
                    ],
                },
            ],
        },
    }
}

/// Standardized logistic regression on age only
pub fn age_logistic() -> PipelineArtifact {
    let mut coefficients = vec![0.0; FEATURES.len()];
    coefficients[0] = -1.5;

    PipelineArtifact {
        feature_names: FEATURES.iter().map(|s| s.to_string()).collect(),
        scaler: Some(StandardScaler {
            mean: vec![40.0, 10.0, 2.0, 0.5, 1.0, 0.5, 0.2, 0.3],
            scale: vec![15.0, 12.0, 1.4, 0.5, 1.2, 0.5, 0.4, 0.45],
        }),
        classifier: Classifier::Logistic {
            coefficients,
            intercept: -0.5,
        },
    }
}

/// Write an artifact into a fresh temp directory
pub fn write_model(artifact: &PipelineArtifact) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("final_model_pipeline.json");
    std::fs::write(&path, serde_json::to_string_pretty(artifact).unwrap()).unwrap();
    (temp_dir, path)
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("appointments.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Random appointment features for larger runs
pub fn create_random_appointments(rows: usize) -> DataFrame {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    let columns: Vec<Column> = FEATURES
        .iter()
        .map(|name| {
            let values: Vec<f64> = match *name {
                "age" => (0..rows).map(|_| rng.gen_range(0.0..100.0)).collect(),
                "lead_time_days" => (0..rows).map(|_| rng.gen_range(0.0..120.0)).collect(),
                "appointment_dow" => (0..rows).map(|_| rng.gen_range(0..6) as f64).collect(),
                "total_conditions" => (0..rows).map(|_| rng.gen_range(0..4) as f64).collect(),
                _ => (0..rows).map(|_| rng.gen_range(0..2) as f64).collect(),
            };
            Column::new((*name).into(), values)
        })
        .collect();

    DataFrame::new(columns).unwrap()
}

/// Float column as a plain Vec
pub fn f64_values(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

/// String column as a plain Vec
pub fn str_values(df: &DataFrame, name: &str) -> Vec<String> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_no_null_iter()
        .map(|s| s.to_string())
        .collect()
}

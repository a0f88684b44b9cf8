//! Serialized scoring pipeline
//!
//! The artifact is a JSON rendition of a fitted preprocessing + classifier
//! pipeline: an optional standard scaler followed by either a logistic
//! regression or a random forest of binary decision trees.

use std::collections::HashSet;

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::model::error::ModelError;
use crate::model::loader::ScoringModel;

/// Standardization step: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    fn transform(&self, row: &mut [f64]) {
        for ((value, mean), scale) in row.iter_mut().zip(&self.mean).zip(&self.scale) {
            // Zero-variance features are only centred
            let scale = if *scale == 0.0 { 1.0 } else { *scale };
            *value = (*value - mean) / scale;
        }
    }
}

/// A single node of a binary decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Go to `left` when `row[feature] <= threshold`, otherwise to `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Positive-class probability at this leaf.
    Leaf { probability: f64 },
}

/// Decision tree stored as a flat node array with the root at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Children always sit after their parent, so traversal terminates.
    fn validate(&self, tree_index: usize, n_features: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Invalid(format!("tree {} has no nodes", tree_index)));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(ModelError::Invalid(format!(
                            "tree {} node {} splits on feature {} but the pipeline has {} features",
                            tree_index, i, feature, n_features
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(ModelError::Invalid(format!(
                            "tree {} node {} has a NaN threshold",
                            tree_index, i
                        )));
                    }
                    for child in [left, right] {
                        if *child <= i || *child >= self.nodes.len() {
                            return Err(ModelError::Invalid(format!(
                                "tree {} node {} points to invalid child {}",
                                tree_index, i, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { probability } => {
                    if !(0.0..=1.0).contains(probability) {
                        return Err(ModelError::Invalid(format!(
                            "tree {} leaf {} has probability {} outside [0, 1]",
                            tree_index, i, probability
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// `None` when the walk leaves the node array or the row is too short.
    fn predict(&self, row: &[f64]) -> Option<f64> {
        let mut index = 0;
        loop {
            match self.nodes.get(index)? {
                TreeNode::Leaf { probability } => return Some(*probability),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if *row.get(*feature)? <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// Final estimator of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Classifier {
    Logistic { coefficients: Vec<f64>, intercept: f64 },
    RandomForest { trees: Vec<DecisionTree> },
}

impl Classifier {
    fn predict(&self, row: &[f64]) -> Option<f64> {
        match self {
            Classifier::Logistic {
                coefficients,
                intercept,
            } => {
                if coefficients.len() != row.len() {
                    return None;
                }
                let z: f64 = intercept
                    + coefficients
                        .iter()
                        .zip(row)
                        .map(|(c, x)| c * x)
                        .sum::<f64>();
                Some(sigmoid(z))
            }
            Classifier::RandomForest { trees } => {
                let mut total = 0.0;
                for tree in trees {
                    total += tree.predict(row)?;
                }
                Some(total / trees.len() as f64)
            }
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// A fitted no-show pipeline as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineArtifact {
    /// Input columns, in the order the scaler and classifier expect them
    pub feature_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<StandardScaler>,
    pub classifier: Classifier,
}

impl PipelineArtifact {
    /// Check that every part of the pipeline agrees on the feature count and
    /// that the trees are well formed.
    pub fn validate(&self) -> Result<(), ModelError> {
        let n_features = self.feature_names.len();
        if n_features == 0 {
            return Err(ModelError::Invalid("no feature names".to_string()));
        }

        let mut seen = HashSet::new();
        for name in &self.feature_names {
            if !seen.insert(name.as_str()) {
                return Err(ModelError::Invalid(format!(
                    "duplicate feature name '{}'",
                    name
                )));
            }
        }

        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != n_features || scaler.scale.len() != n_features {
                return Err(ModelError::Invalid(format!(
                    "scaler has {} means and {} scales for {} features",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    n_features
                )));
            }
        }

        match &self.classifier {
            Classifier::Logistic { coefficients, .. } => {
                if coefficients.len() != n_features {
                    return Err(ModelError::Invalid(format!(
                        "logistic model has {} coefficients for {} features",
                        coefficients.len(),
                        n_features
                    )));
                }
            }
            Classifier::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(ModelError::Invalid("random forest has no trees".to_string()));
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(i, n_features)?;
                }
            }
        }

        Ok(())
    }

    /// Score one row whose values follow `feature_names` order.
    ///
    /// Fails when the row length differs from the feature count or when the
    /// classifier references a feature or node that does not exist.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, ModelError> {
        if row.len() != self.feature_names.len() {
            return Err(ModelError::Invalid(format!(
                "row has {} values but the pipeline expects {} features",
                row.len(),
                self.feature_names.len()
            )));
        }

        let mut row = row.to_vec();
        if let Some(scaler) = &self.scaler {
            scaler.transform(&mut row);
        }
        self.classifier.predict(&row).ok_or_else(|| {
            ModelError::Invalid("classifier does not match the pipeline features".to_string())
        })
    }

    /// Pull the model's feature columns out of `df` by name, one `Vec` per
    /// feature.
    fn feature_columns(&self, df: &DataFrame) -> Result<Vec<Vec<f64>>> {
        let mut columns = Vec::with_capacity(self.feature_names.len());

        for name in &self.feature_names {
            let column = df
                .column(name)
                .with_context(|| format!("Feature column '{}' not found in input data", name))?;

            let float_col = column
                .cast(&DataType::Float64)
                .with_context(|| format!("Feature column '{}' must be numeric", name))?;
            let ca = float_col
                .f64()
                .with_context(|| format!("Failed to access feature column '{}' as Float64", name))?;

            if ca.null_count() > 0 {
                anyhow::bail!(
                    "Feature column '{}' contains {} null or non-numeric value(s)",
                    name,
                    ca.null_count()
                );
            }

            columns.push(ca.into_no_null_iter().collect());
        }

        Ok(columns)
    }
}

impl ScoringModel for PipelineArtifact {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Validates the artifact on every call: its fields are public and may
    /// have been edited after `try_load_model` checked them.
    fn predict_proba(&self, features: &DataFrame) -> Result<Vec<f64>> {
        self.validate()?;
        let columns = self.feature_columns(features)?;

        let mut row = vec![0.0; columns.len()];
        let mut probabilities = Vec::with_capacity(features.height());

        for i in 0..features.height() {
            for (slot, column) in row.iter_mut().zip(&columns) {
                *slot = column[i];
            }

            let probability = self.predict_row(&row)?;
            if !probability.is_finite() {
                anyhow::bail!("Model produced a non-finite probability for row {}", i);
            }
            probabilities.push(probability);
        }

        Ok(probabilities)
    }
}

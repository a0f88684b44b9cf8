//! Risk tiers and the fixed probability cutoffs that define them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Score at or above which an appointment is predicted to be a no-show
pub const OUTCOME_THRESHOLD: f64 = 0.5;

/// Score assigned to every row when no model is available
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Lower bounds of the Medium and High tiers. Each bound belongs to the higher tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskThresholds {
    pub medium: f64,
    pub high: f64,
}

/// Low below 0.25, Medium in [0.25, 0.60), High from 0.60
pub const RISK_THRESHOLDS: RiskThresholds = RiskThresholds {
    medium: 0.25,
    high: 0.60,
};

impl RiskThresholds {
    pub fn classify(&self, score: f64) -> RiskLevel {
        if score >= self.high {
            RiskLevel::High
        } else if score >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Categorical no-show risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    /// Tier for a probability using [`RISK_THRESHOLDS`]
    pub fn from_score(score: f64) -> Self {
        RISK_THRESHOLDS.classify(score)
    }

    /// Label stored in the `risk_level` column
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(RiskLevel::Low),
            "Medium" => Ok(RiskLevel::Medium),
            "High" => Ok(RiskLevel::High),
            other => Err(format!(
                "Unknown risk level '{}'. Expected one of: Low, Medium, High",
                other
            )),
        }
    }
}

/// The three values derived for every scored appointment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub predicted_outcome: i32,
}

impl Prediction {
    pub fn from_score(risk_score: f64) -> Self {
        Self {
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
            predicted_outcome: i32::from(risk_score >= OUTCOME_THRESHOLD),
        }
    }

    /// Degraded-mode prediction. The outcome is fixed at 0 even though the
    /// score sits on the outcome threshold.
    pub fn neutral() -> Self {
        Self {
            risk_score: NEUTRAL_SCORE,
            risk_level: RiskLevel::Medium,
            predicted_outcome: 0,
        }
    }
}

//! No-show: Appointment Risk Scoring Library
//!
//! Loads a trained no-show pipeline, scores batches of appointment features,
//! maps probabilities to Low/Medium/High risk tiers and derives summary
//! statistics and a high-risk report.

pub mod cli;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod utils;

//! Summary statistics over a scored appointment batch

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use polars::prelude::DataFrame;
use serde::Serialize;

use crate::pipeline::{extract_predictions, Prediction, RiskLevel};

/// Aggregate view of a scored batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub total_appointments: usize,
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub low_risk_count: usize,
    /// Mean of `predicted_outcome`, in [0, 1]
    pub predicted_noshow_rate: f64,
}

impl SummaryStatistics {
    /// Aggregate typed predictions. Returns `None` for an empty slice.
    pub fn from_predictions(predictions: &[Prediction]) -> Option<Self> {
        if predictions.is_empty() {
            return None;
        }

        let count = |level: RiskLevel| {
            predictions
                .iter()
                .filter(|p| p.risk_level == level)
                .count()
        };
        let outcome_sum: i64 = predictions
            .iter()
            .map(|p| i64::from(p.predicted_outcome))
            .sum();

        Some(Self {
            total_appointments: predictions.len(),
            high_risk_count: count(RiskLevel::High),
            medium_risk_count: count(RiskLevel::Medium),
            low_risk_count: count(RiskLevel::Low),
            predicted_noshow_rate: outcome_sum as f64 / predictions.len() as f64,
        })
    }

    pub fn count_for(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::Low => self.low_risk_count,
            RiskLevel::Medium => self.medium_risk_count,
            RiskLevel::High => self.high_risk_count,
        }
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("PREDICTION SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📅 Total Appointments"),
            Cell::new(self.total_appointments),
        ]);

        table.add_row(vec![
            Cell::new("🔴 High Risk"),
            Cell::new(self.high_risk_count).fg(if self.high_risk_count == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);

        table.add_row(vec![
            Cell::new("🟡 Medium Risk"),
            Cell::new(self.medium_risk_count).fg(Color::Yellow),
        ]);

        table.add_row(vec![
            Cell::new("🟢 Low Risk"),
            Cell::new(self.low_risk_count).fg(Color::Green),
        ]);

        let rate_pct = self.predicted_noshow_rate * 100.0;
        let color = if rate_pct > 30.0 {
            Color::Red
        } else if rate_pct > 15.0 {
            Color::Yellow
        } else {
            Color::Green
        };

        table.add_row(vec![
            Cell::new("📉 Predicted No-Show Rate"),
            Cell::new(format!("{:.1}%", rate_pct))
                .fg(color)
                .add_attribute(Attribute::Bold),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }
}

/// Summarize an augmented prediction table. An empty table has no statistics.
pub fn summarize(predictions: &DataFrame) -> Result<Option<SummaryStatistics>> {
    if predictions.height() == 0 {
        return Ok(None);
    }

    let typed = extract_predictions(predictions)?;
    Ok(SummaryStatistics::from_predictions(&typed))
}

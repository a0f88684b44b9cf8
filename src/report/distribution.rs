//! Risk score distribution as equal-width bins over [0, 1]

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Table};
use console::style;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::RISK_SCORE_COLUMN;

/// Default number of histogram bins
pub const DEFAULT_BINS: usize = 30;

/// One histogram bin: scores in `[lower, upper)`, the last bin also holds 1.0
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Histogram of `risk_score` with `bins` equal-width bins. An empty table
/// has no bins.
pub fn risk_distribution(predictions: &DataFrame, bins: usize) -> Result<Vec<ScoreBin>> {
    if bins == 0 {
        anyhow::bail!("Number of bins must be at least 1");
    }
    if predictions.height() == 0 {
        return Ok(Vec::new());
    }

    let scores_col = predictions.column(RISK_SCORE_COLUMN)?.cast(&DataType::Float64)?;
    let scores = scores_col.f64()?;
    if scores.null_count() > 0 {
        anyhow::bail!("Column '{}' contains missing scores", RISK_SCORE_COLUMN);
    }

    let width = 1.0 / bins as f64;
    let mut histogram: Vec<ScoreBin> = (0..bins)
        .map(|i| ScoreBin {
            lower: i as f64 * width,
            upper: (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for score in scores.into_no_null_iter() {
        if !(0.0..=1.0).contains(&score) {
            anyhow::bail!("risk_score {} is outside [0, 1]", score);
        }
        let index = ((score / width) as usize).min(bins - 1);
        histogram[index].count += 1;
    }

    Ok(histogram)
}

/// Print the non-empty bins with a proportional bar.
pub fn display_distribution(histogram: &[ScoreBin]) {
    println!();
    println!(
        "    {} {}",
        style("📊").cyan(),
        style("RISK SCORE DISTRIBUTION").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    let max_count = histogram.iter().map(|b| b.count).max().unwrap_or(0);
    if max_count == 0 {
        println!("      {}", style("No scores to display").dim());
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Score").add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
        Cell::new("").add_attribute(Attribute::Bold),
    ]);

    for bin in histogram.iter().filter(|b| b.count > 0) {
        let bar_len = (bin.count * 30).div_ceil(max_count);
        table.add_row(vec![
            Cell::new(format!("{:.2}-{:.2}", bin.lower, bin.upper)),
            Cell::new(bin.count),
            Cell::new("█".repeat(bar_len)),
        ]);
    }

    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bins_cover_unit_interval() {
        let df = df! { "risk_score" => [0.0f64, 0.1, 0.55, 0.99, 1.0] }.unwrap();

        let histogram = risk_distribution(&df, 10).unwrap();
        assert_eq!(histogram.len(), 10);
        assert_eq!(histogram[0].count, 1);
        assert_eq!(histogram[1].count, 1);
        assert_eq!(histogram[5].count, 1);
        assert_eq!(histogram[9].count, 2);
        assert_eq!(histogram.iter().map(|b| b.count).sum::<usize>(), 5);
    }

    #[test]
    fn test_empty_has_no_bins() {
        let df = df! { "risk_score" => Vec::<f64>::new() }.unwrap();
        assert!(risk_distribution(&df, 30).unwrap().is_empty());
    }

    #[test]
    fn test_zero_bins_rejected() {
        let df = df! { "risk_score" => [0.5f64] }.unwrap();
        assert!(risk_distribution(&df, 0).is_err());
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        let df = df! { "risk_score" => [1.5f64] }.unwrap();
        assert!(risk_distribution(&df, 5).is_err());
    }
}

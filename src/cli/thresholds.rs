//! `fairprep thresholds`: run the threshold search on pre-computed scores

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use crate::fairness::{scale_threshold, GroupMask, ThresholdPair, ThresholdSearch};
use crate::pipeline::{load_dataset, require_columns, FeatureMatrix};
use crate::report::{round4, OperatingPoint, RawThresholds, ScaledThresholds};
use crate::utils::{create_spinner, finish_with_success};

pub const SCORE_COLUMN: &str = "score";
pub const LABEL_COLUMN: &str = "label";
pub const GROUP_COLUMN: &str = "group";

/// Threshold pair as written by the subcommand
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdReport {
    pub rows: usize,
    pub thresholds: ScaledThresholds,
    pub threshold_scale: u64,
    pub raw_thresholds: RawThresholds,
    pub operating_point: OperatingPoint,
}

impl ThresholdReport {
    pub fn new(rows: usize, pair: &ThresholdPair, threshold_scale: u64) -> Self {
        Self {
            rows,
            thresholds: ScaledThresholds {
                group_a: scale_threshold(pair.group_a, threshold_scale),
                group_b: scale_threshold(pair.group_b, threshold_scale),
            },
            threshold_scale,
            raw_thresholds: RawThresholds {
                group_a: round4(pair.group_a),
                group_b: round4(pair.group_b),
            },
            operating_point: OperatingPoint {
                fpr: round4(pair.operating_fpr),
                tpr_group_a: round4(pair.tpr_group_a),
                tpr_group_b: round4(pair.tpr_group_b),
                tpr_gap: round4(pair.tpr_gap),
            },
        }
    }
}

/// Read `score`, `label` and `group` columns and derive the threshold pair
pub fn derive_from_scores_file(
    path: &Path,
    search: &ThresholdSearch,
) -> Result<(usize, ThresholdPair)> {
    let df = load_dataset(path, b',', 10_000)?;
    require_columns(&df, &[SCORE_COLUMN, LABEL_COLUMN, GROUP_COLUMN])?;

    let selected = df
        .select([SCORE_COLUMN, LABEL_COLUMN, GROUP_COLUMN])
        .context("Failed to select score columns")?;
    let matrix = FeatureMatrix::from_dataframe(&selected, &[])?;

    let scores = matrix.column(0);
    let labels = matrix
        .column(1)
        .iter()
        .enumerate()
        .map(|(row, &v)| match v {
            v if v == 0.0 => Ok(0u8),
            v if v == 1.0 => Ok(1u8),
            v => anyhow::bail!("Label at row {} must be 0 or 1, got {}", row, v),
        })
        .collect::<Result<Vec<u8>>>()?;

    let mask = GroupMask::from_values(&matrix.column(2)).context("Invalid group column")?;
    let (group_a, group_b) = mask.split(&scores, &labels)?;
    let pair = search
        .derive(&group_a, &group_b)
        .context("Failed to derive per-group thresholds")?;

    Ok((matrix.n_rows(), pair))
}

/// Entry point of the subcommand
pub fn run_thresholds(
    scores: &Path,
    output: Option<&Path>,
    grid_points: usize,
    threshold_scale: u64,
) -> Result<()> {
    println!(
        "\n {} Deriving per-group thresholds",
        style("◆").cyan().bold()
    );
    println!("   Scores: {}", style(scores.display()).dim());
    println!();

    let search = ThresholdSearch::new(grid_points)?;
    let spinner = create_spinner("Searching operating point...");
    let (rows, pair) = derive_from_scores_file(scores, &search)?;
    finish_with_success(&spinner, "Operating point found");

    let report = ThresholdReport::new(rows, &pair, threshold_scale);

    println!();
    println!("   Rows:          {}", style(rows).yellow());
    println!(
        "   Operating FPR: {} (TPR a={:.4}, b={:.4}, gap={:.4})",
        style(format!("{:.4}", pair.operating_fpr)).yellow(),
        pair.tpr_group_a,
        pair.tpr_group_b,
        pair.tpr_gap
    );
    println!(
        "   Group a:       {:.4} → {}",
        pair.group_a,
        style(report.thresholds.group_a).cyan()
    );
    println!(
        "   Group b:       {:.4} → {}",
        pair.group_b,
        style(report.thresholds.group_b).cyan()
    );

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize threshold report to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write threshold report to {}", path.display()))?;
        println!("   Written to:    {}", style(path.display()).dim());
    }

    println!();
    println!(" {} Thresholds derived", style("✓").green().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_derive_from_scores_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.csv");
        std::fs::write(
            &path,
            "score,label,group\n0.9,1,0\n0.6,0,0\n0.8,1,0\n0.2,0,0\n0.7,1,1\n0.5,1,1\n0.4,0,1\n0.1,0,1\n",
        )
        .unwrap();

        let (rows, pair) = derive_from_scores_file(&path, &ThresholdSearch::default()).unwrap();
        assert_eq!(rows, 8);
        assert!(pair.tpr_gap.abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_binary_label() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.csv");
        std::fs::write(&path, "score,label,group\n0.9,2,0\n0.1,0,1\n").unwrap();

        let err = derive_from_scores_file(&path, &ThresholdSearch::default()).unwrap_err();
        assert!(err.to_string().contains("must be 0 or 1"));
    }

    #[test]
    fn test_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.csv");
        std::fs::write(&path, "score,label\n0.9,1\n").unwrap();

        assert!(derive_from_scores_file(&path, &ThresholdSearch::default()).is_err());
    }
}

//! Fairness configuration record consumed by the proof toolchain

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::fairness::scale_threshold;
use crate::pipeline::FairnessEvaluation;

/// Metric name written to the record
pub const PRIMARY_METRIC: &str = "demographic_parity";

/// Round to four decimal places
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Per-group thresholds as non-negative fixed-point integers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledThresholds {
    pub group_a: u64,
    pub group_b: u64,
}

/// Per-group thresholds with their sign
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawThresholds {
    pub group_a: f64,
    pub group_b: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingPoint {
    pub fpr: f64,
    pub tpr_group_a: f64,
    pub tpr_group_b: f64,
    pub tpr_gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculatedMetrics {
    #[serde(rename = "demographicParity")]
    pub demographic_parity: f64,
    #[serde(rename = "equalizedOdds")]
    pub equalized_odds: f64,
    #[serde(rename = "group0PositiveRate")]
    pub group0_positive_rate: f64,
    #[serde(rename = "group1PositiveRate")]
    pub group1_positive_rate: f64,
    #[serde(rename = "group0TPR")]
    pub group0_tpr: f64,
    #[serde(rename = "group1TPR")]
    pub group1_tpr: f64,
    #[serde(rename = "group0FPR")]
    pub group0_fpr: f64,
    #[serde(rename = "group1FPR")]
    pub group1_fpr: f64,
}

/// Contents of `fairness_threshold.json`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FairnessConfig {
    pub metric: String,
    pub target_disparity: f64,
    pub protected_attribute: String,
    pub protected_attribute_index: usize,
    pub thresholds: ScaledThresholds,
    pub threshold_scale: u64,
    pub raw_thresholds: RawThresholds,
    pub operating_point: OperatingPoint,
    pub calculated_metrics: CalculatedMetrics,
}

impl FairnessConfig {
    /// Build the record from an evaluation; all rates are rounded to 4 decimals.
    pub fn from_evaluation(eval: &FairnessEvaluation, threshold_scale: u64) -> Self {
        let m = &eval.metrics;
        let t = &eval.thresholds;
        Self {
            metric: PRIMARY_METRIC.to_string(),
            target_disparity: round4(eval.target_disparity),
            protected_attribute: eval.protected_attribute.clone(),
            protected_attribute_index: eval.protected_attribute_index,
            thresholds: ScaledThresholds {
                group_a: scale_threshold(t.group_a, threshold_scale),
                group_b: scale_threshold(t.group_b, threshold_scale),
            },
            threshold_scale,
            raw_thresholds: RawThresholds {
                group_a: round4(t.group_a),
                group_b: round4(t.group_b),
            },
            operating_point: OperatingPoint {
                fpr: round4(t.operating_fpr),
                tpr_group_a: round4(t.tpr_group_a),
                tpr_group_b: round4(t.tpr_group_b),
                tpr_gap: round4(t.tpr_gap),
            },
            calculated_metrics: CalculatedMetrics {
                demographic_parity: round4(m.demographic_parity),
                equalized_odds: round4(m.equalized_odds),
                group0_positive_rate: round4(m.group_0.positive_rate),
                group1_positive_rate: round4(m.group_1.positive_rate),
                group0_tpr: round4(m.group_0.tpr),
                group1_tpr: round4(m.group_1.tpr),
                group0_fpr: round4(m.group_0.fpr),
                group1_fpr: round4(m.group_1.fpr),
            },
        }
    }
}

/// Write the record as pretty JSON
pub fn write_fairness_config(config: &FairnessConfig, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)
        .context("Failed to serialize fairness configuration to JSON")?;

    std::fs::write(output_path, json).with_context(|| {
        format!(
            "Failed to write fairness configuration to {}",
            output_path.display()
        )
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fairness::{FairnessMetrics, GroupRates, ThresholdPair};

    fn sample_evaluation() -> FairnessEvaluation {
        FairnessEvaluation {
            protected_attribute: "sex".into(),
            protected_attribute_index: 9,
            accuracy: 0.8,
            metrics: FairnessMetrics {
                demographic_parity: 0.123456,
                equalized_odds: 0.2,
                group_0: GroupRates {
                    size: 10,
                    positive_rate: 0.1,
                    tpr: 0.5,
                    fpr: 0.05,
                },
                group_1: GroupRates {
                    size: 12,
                    positive_rate: 0.223456,
                    tpr: 0.7,
                    fpr: 0.1,
                },
            },
            target_disparity: 0.0987648,
            thresholds: ThresholdPair {
                operating_fpr: 0.1002,
                tpr_group_a: 0.61,
                tpr_group_b: 0.6,
                tpr_gap: 0.01,
                group_a: -1.23456,
                group_b: 0.5,
            },
        }
    }

    #[test]
    fn test_record_keys_and_scaling() {
        let config = FairnessConfig::from_evaluation(&sample_evaluation(), 10_000);
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["metric"], "demographic_parity");
        assert_eq!(json["protectedAttribute"], "sex");
        assert_eq!(json["protectedAttributeIndex"], 9);
        assert_eq!(json["thresholds"]["group_a"], 12346);
        assert_eq!(json["thresholds"]["group_b"], 5000);
        assert_eq!(json["rawThresholds"]["group_a"], -1.2346);
        assert_eq!(json["targetDisparity"], 0.0988);
        assert_eq!(json["calculatedMetrics"]["demographicParity"], 0.1235);
        assert!(json["calculatedMetrics"]["group0TPR"].is_number());
        assert!(json["operatingPoint"]["tprGap"].is_number());
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round4(-0.00004), -0.0);
    }
}

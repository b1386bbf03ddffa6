//! Held-out evaluation: accuracy, fairness metrics and per-group thresholds

use anyhow::{Context, Result};

use crate::fairness::{target_disparity, FairnessMetrics, GroupMask, ThresholdPair, ThresholdSearch};

use super::matrix::FeatureMatrix;
use super::model::LogisticRegression;

/// Everything measured on the held-out split
#[derive(Debug, Clone)]
pub struct FairnessEvaluation {
    pub protected_attribute: String,
    pub protected_attribute_index: usize,
    pub accuracy: f64,
    pub metrics: FairnessMetrics,
    pub target_disparity: f64,
    pub thresholds: ThresholdPair,
}

/// Score the held-out rows and derive fairness metrics and thresholds.
///
/// `protected_attribute` must name a feature column whose values are all 0
/// or 1 with both values present.
pub fn evaluate_fairness(
    model: &LogisticRegression,
    x_test: &FeatureMatrix,
    y_test: &[u8],
    protected_attribute: &str,
    search: &ThresholdSearch,
    disparity_floor: f64,
) -> Result<FairnessEvaluation> {
    let protected_attribute_index = x_test.column_index(protected_attribute).ok_or_else(|| {
        anyhow::anyhow!(
            "Protected attribute '{}' is not a feature column. Available features: {:?}",
            protected_attribute,
            x_test.feature_names
        )
    })?;

    let mask = GroupMask::from_values(&x_test.column(protected_attribute_index))
        .with_context(|| format!("Invalid protected attribute '{}'", protected_attribute))?;

    let scores = model.decision_function(x_test);
    let predictions: Vec<u8> = scores.iter().map(|&s| u8::from(s > 0.0)).collect();
    let accuracy = model.accuracy(x_test, y_test);

    let metrics = FairnessMetrics::compute(&predictions, y_test, &mask)?;
    let (group_a, group_b) = mask.split(&scores, y_test)?;
    let thresholds = search
        .derive(&group_a, &group_b)
        .context("Failed to derive per-group thresholds")?;

    Ok(FairnessEvaluation {
        protected_attribute: protected_attribute.to_string(),
        protected_attribute_index,
        accuracy,
        metrics,
        target_disparity: target_disparity(metrics.demographic_parity, disparity_floor),
        thresholds,
    })
}

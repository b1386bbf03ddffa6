//! Group fairness metrics at the classifier's original decision threshold

use super::error::FairnessError;
use super::groups::GroupMask;

/// Share of measured demographic parity the target disparity is set to
pub const TARGET_DISPARITY_RATIO: f64 = 0.8;

/// Prediction rates for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupRates {
    pub size: usize,
    pub positive_rate: f64,
    pub tpr: f64,
    pub fpr: f64,
}

/// Disparity between group A (value 0) and group B (value 1).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FairnessMetrics {
    pub demographic_parity: f64,
    pub equalized_odds: f64,
    pub group_0: GroupRates,
    pub group_1: GroupRates,
}

impl FairnessMetrics {
    /// Compute the metrics from hard predictions, ground truth and group mask.
    ///
    /// TPR and FPR divide by `max(count, 1)`, so a group without positives
    /// (or negatives) reports a rate of 0.
    pub fn compute(predictions: &[u8], labels: &[u8], mask: &GroupMask) -> Result<Self, FairnessError> {
        mask.check_len("predictions", predictions.len())?;
        mask.check_len("labels", labels.len())?;
        if let Some((index, &value)) = labels.iter().enumerate().find(|(_, &l)| l > 1) {
            return Err(FairnessError::NonBinaryLabel { index, value });
        }

        let group_0 = group_rates(predictions, labels, mask.values(), 0);
        let group_1 = group_rates(predictions, labels, mask.values(), 1);

        let demographic_parity = (group_0.positive_rate - group_1.positive_rate).abs();
        let equalized_odds = (group_0.tpr - group_1.tpr)
            .abs()
            .max((group_0.fpr - group_1.fpr).abs());

        Ok(Self {
            demographic_parity,
            equalized_odds,
            group_0,
            group_1,
        })
    }
}

fn group_rates(predictions: &[u8], labels: &[u8], groups: &[u8], group: u8) -> GroupRates {
    let mut size = 0usize;
    let mut predicted = 0usize;
    let mut positives = 0usize;
    let mut negatives = 0usize;
    let mut true_pos = 0usize;
    let mut false_pos = 0usize;

    for ((&p, &l), &g) in predictions.iter().zip(labels).zip(groups) {
        if g != group {
            continue;
        }
        size += 1;
        let hit = p != 0;
        if hit {
            predicted += 1;
        }
        if l == 1 {
            positives += 1;
            if hit {
                true_pos += 1;
            }
        } else {
            negatives += 1;
            if hit {
                false_pos += 1;
            }
        }
    }

    GroupRates {
        size,
        positive_rate: predicted as f64 / size.max(1) as f64,
        tpr: true_pos as f64 / positives.max(1) as f64,
        fpr: false_pos as f64 / negatives.max(1) as f64,
    }
}

/// Disparity target handed to the proof circuit: never below `floor`.
pub fn target_disparity(demographic_parity: f64, floor: f64) -> f64 {
    floor.max(demographic_parity * TARGET_DISPARITY_RATIO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_known_values() {
        // group 0: preds [1,0,1,0], labels [1,1,0,0] -> pos rate 0.5, tpr 0.5, fpr 0.5
        // group 1: preds [1,1,1,0], labels [1,1,0,0] -> pos rate 0.75, tpr 1.0, fpr 0.5
        let mask = GroupMask::from_values(&[0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]).unwrap();
        let preds = [1, 0, 1, 0, 1, 1, 1, 0];
        let labels = [1, 1, 0, 0, 1, 1, 0, 0];

        let m = FairnessMetrics::compute(&preds, &labels, &mask).unwrap();
        assert!((m.group_0.positive_rate - 0.5).abs() < 1e-12);
        assert!((m.group_1.positive_rate - 0.75).abs() < 1e-12);
        assert!((m.demographic_parity - 0.25).abs() < 1e-12);
        assert!((m.equalized_odds - 0.5).abs() < 1e-12);
        assert_eq!(m.group_0.size, 4);
    }

    #[test]
    fn test_metrics_group_without_positives() {
        let mask = GroupMask::from_values(&[0.0, 0.0, 1.0, 1.0]).unwrap();
        let m = FairnessMetrics::compute(&[1, 0, 1, 0], &[0, 0, 1, 0], &mask).unwrap();

        assert_eq!(m.group_0.tpr, 0.0);
        assert_eq!(m.group_0.fpr, 0.5);
    }

    #[test]
    fn test_target_disparity_floor() {
        assert_eq!(target_disparity(0.01, 0.05), 0.05);
        assert!((target_disparity(0.2, 0.05) - 0.16).abs() < 1e-12);
    }
}

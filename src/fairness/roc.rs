//! Per-group ROC curves and piecewise-linear interpolation over them.

use super::error::FairnessError;

/// One group's ROC curve.
///
/// The three vectors are index-aligned. `fpr` is non-decreasing and the first
/// point is always `(0, 0)` with a threshold one above the highest score, so
/// that every operating point has a threshold to map back to.
#[derive(Debug, Clone, PartialEq)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    pub thresholds: Vec<f64>,
    pub positives: usize,
    pub negatives: usize,
}

impl RocCurve {
    /// Compute the ROC curve of one group from its decision scores and labels.
    ///
    /// Distinct scores are visited from highest to lowest; at each one the
    /// examples scoring at or above it are predicted positive. A group with no
    /// positives (or no negatives) divides by 1 instead of 0, which pins that
    /// rate at 0 for the whole curve.
    pub fn compute(scores: &[f64], labels: &[u8]) -> Result<Self, FairnessError> {
        validate_scored_labels(scores, labels)?;

        let mut pairs: Vec<(f64, u8)> = scores.iter().copied().zip(labels.iter().copied()).collect();
        pairs.sort_by(|a, b| b.0.total_cmp(&a.0));

        let positives = labels.iter().filter(|&&l| l == 1).count();
        let negatives = labels.len() - positives;
        let pos_denom = positives.max(1) as f64;
        let neg_denom = negatives.max(1) as f64;

        let mut fpr = vec![0.0];
        let mut tpr = vec![0.0];
        let mut thresholds = vec![pairs[0].0 + 1.0];

        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut i = 0;
        while i < pairs.len() {
            let current = pairs[i].0;
            while i < pairs.len() && pairs[i].0 == current {
                if pairs[i].1 == 1 {
                    tp += 1;
                } else {
                    fp += 1;
                }
                i += 1;
            }
            fpr.push(fp as f64 / neg_denom);
            tpr.push(tp as f64 / pos_denom);
            thresholds.push(current);
        }

        Ok(Self {
            fpr,
            tpr,
            thresholds,
            positives,
            negatives,
        })
    }

    pub fn len(&self) -> usize {
        self.fpr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fpr.is_empty()
    }

    /// True when the group lacks one of the two classes.
    pub fn is_degenerate(&self) -> bool {
        self.positives == 0 || self.negatives == 0
    }

    /// Interpolated true-positive rate at `fpr`, clamped to 0 below the curve
    /// and 1 beyond it.
    pub fn tpr_at(&self, fpr: f64) -> f64 {
        interp(fpr, &self.fpr, &self.tpr, 0.0, 1.0)
    }

    /// Interpolated decision threshold at `fpr`; out-of-range queries take the
    /// nearest end point.
    pub fn threshold_at(&self, fpr: f64) -> f64 {
        let first = self.thresholds.first().copied().unwrap_or(0.0);
        let last = self.thresholds.last().copied().unwrap_or(0.0);
        interp(fpr, &self.fpr, &self.thresholds, first, last)
    }

    /// Highest and lowest threshold on the curve.
    pub fn threshold_span(&self) -> (f64, f64) {
        let max = self.thresholds.first().copied().unwrap_or(0.0);
        let min = self.thresholds.last().copied().unwrap_or(0.0);
        (min, max)
    }
}

/// Piecewise-linear interpolation of `fp` over the non-decreasing knots `xp`.
///
/// Queries below `xp[0]` return `left`, above the last knot return `right`.
/// On repeated knots the right-most one is used, so a vertical run of the
/// curve resolves to its upper end.
pub fn interp(x: f64, xp: &[f64], fp: &[f64], left: f64, right: f64) -> f64 {
    let n = xp.len().min(fp.len());
    if n == 0 {
        return left;
    }
    if x < xp[0] {
        return left;
    }
    if x > xp[n - 1] {
        return right;
    }
    if x == xp[n - 1] {
        return fp[n - 1];
    }

    // Last knot with xp[j] <= x; j < n - 1 because x < xp[n - 1]
    let j = xp[..n].partition_point(|&v| v <= x) - 1;
    let (x0, x1) = (xp[j], xp[j + 1]);
    let (y0, y1) = (fp[j], fp[j + 1]);
    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}

fn validate_scored_labels(scores: &[f64], labels: &[u8]) -> Result<(), FairnessError> {
    if scores.len() != labels.len() {
        return Err(FairnessError::LengthMismatch {
            what: "labels",
            expected: scores.len(),
            actual: labels.len(),
        });
    }
    if scores.is_empty() {
        return Err(FairnessError::EmptyInput);
    }
    if let Some((index, &value)) = scores.iter().enumerate().find(|(_, s)| !s.is_finite()) {
        return Err(FairnessError::NonFiniteScore { index, value });
    }
    if let Some((index, &value)) = labels.iter().enumerate().find(|(_, &l)| l > 1) {
        return Err(FairnessError::NonBinaryLabel { index, value });
    }
    Ok(())
}

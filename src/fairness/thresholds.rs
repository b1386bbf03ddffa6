//! Per-group threshold derivation by ROC intersection
//!
//! Both groups' ROC curves are sampled on a shared false-positive-rate grid.
//! The grid point where their true-positive rates are closest becomes the
//! operating point, and each group's threshold is read off its own curve there.

use super::error::FairnessError;
use super::groups::GroupData;
use super::roc::RocCurve;

/// Default number of evenly spaced FPR values searched in [0, 1].
pub const DEFAULT_GRID_POINTS: usize = 500;

/// Result of the threshold search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPair {
    /// Shared false-positive rate both thresholds were read at
    pub operating_fpr: f64,
    /// Interpolated TPR of group A at the operating point
    pub tpr_group_a: f64,
    /// Interpolated TPR of group B at the operating point
    pub tpr_group_b: f64,
    /// |tpr_group_a - tpr_group_b|
    pub tpr_gap: f64,
    /// Decision threshold for group A (t_a)
    pub group_a: f64,
    /// Decision threshold for group B (t_b)
    pub group_b: f64,
}

/// Configuration of the operating-point search.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdSearch {
    pub grid_points: usize,
}

impl Default for ThresholdSearch {
    fn default() -> Self {
        Self {
            grid_points: DEFAULT_GRID_POINTS,
        }
    }
}

impl ThresholdSearch {
    pub fn new(grid_points: usize) -> Result<Self, FairnessError> {
        if grid_points < 2 {
            return Err(FairnessError::GridTooSmall(grid_points));
        }
        Ok(Self { grid_points })
    }

    /// Derive (t_a, t_b) from the two groups' scores and labels.
    pub fn derive(&self, group_a: &GroupData, group_b: &GroupData) -> Result<ThresholdPair, FairnessError> {
        if group_a.is_empty() {
            return Err(FairnessError::EmptyGroup { group: 'A' });
        }
        if group_b.is_empty() {
            return Err(FairnessError::EmptyGroup { group: 'B' });
        }

        let roc_a = RocCurve::compute(&group_a.scores, &group_a.labels)?;
        let roc_b = RocCurve::compute(&group_b.scores, &group_b.labels)?;
        self.derive_from_curves(&roc_a, &roc_b)
    }

    /// Same as [`ThresholdSearch::derive`], for curves computed by the caller.
    pub fn derive_from_curves(&self, roc_a: &RocCurve, roc_b: &RocCurve) -> Result<ThresholdPair, FairnessError> {
        if self.grid_points < 2 {
            return Err(FairnessError::GridTooSmall(self.grid_points));
        }

        let grid = fpr_grid(self.grid_points);
        let gaps = tpr_gaps(roc_a, roc_b, &grid);

        // Strict `<` keeps the first (lowest-FPR) minimum on ties
        let mut best_idx = 0;
        for (i, &gap) in gaps.iter().enumerate().skip(1) {
            if gap < gaps[best_idx] {
                best_idx = i;
            }
        }

        let operating_fpr = grid[best_idx];
        let tpr_group_a = roc_a.tpr_at(operating_fpr);
        let tpr_group_b = roc_b.tpr_at(operating_fpr);

        Ok(ThresholdPair {
            operating_fpr,
            tpr_group_a,
            tpr_group_b,
            tpr_gap: gaps[best_idx],
            group_a: roc_a.threshold_at(operating_fpr),
            group_b: roc_b.threshold_at(operating_fpr),
        })
    }
}

/// `points` evenly spaced values from 0 to 1 inclusive.
pub fn fpr_grid(points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let last = (points - 1) as f64;
            (0..points).map(|i| i as f64 / last).collect()
        }
    }
}

/// Absolute TPR difference between the two curves at every grid value.
pub fn tpr_gaps(roc_a: &RocCurve, roc_b: &RocCurve, grid: &[f64]) -> Vec<f64> {
    grid.iter()
        .map(|&fpr| (roc_a.tpr_at(fpr) - roc_b.tpr_at(fpr)).abs())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_end_points() {
        let grid = fpr_grid(DEFAULT_GRID_POINTS);
        assert_eq!(grid.len(), 500);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[499], 1.0);
        assert!(grid.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_grid_too_small() {
        assert_eq!(ThresholdSearch::new(1).unwrap_err(), FairnessError::GridTooSmall(1));
        assert!(ThresholdSearch::new(2).is_ok());
    }

    #[test]
    fn test_tie_prefers_lowest_fpr() {
        // Identical curves: every grid point has gap 0, so the first one wins
        let group = GroupData::new(vec![0.9, 0.4, 0.6, 0.1], vec![1, 0, 1, 0]);
        let pair = ThresholdSearch::default().derive(&group, &group).unwrap();

        assert_eq!(pair.operating_fpr, 0.0);
        assert_eq!(pair.tpr_gap, 0.0);
    }

    #[test]
    fn test_empty_group_rejected() {
        let group = GroupData::new(vec![0.5], vec![1]);
        let err = ThresholdSearch::default()
            .derive(&GroupData::default(), &group)
            .unwrap_err();
        assert_eq!(err, FairnessError::EmptyGroup { group: 'A' });

        let err = ThresholdSearch::default()
            .derive(&group, &GroupData::default())
            .unwrap_err();
        assert_eq!(err, FairnessError::EmptyGroup { group: 'B' });
    }
}

//! Protected-attribute group mask and per-group partitioning

use super::error::FairnessError;

/// Tolerance for floating point comparison when checking binary 0/1 values
const TOLERANCE: f64 = 1e-9;

/// Scores and labels of the examples belonging to one group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupData {
    pub scores: Vec<f64>,
    pub labels: Vec<u8>,
}

impl GroupData {
    pub fn new(scores: Vec<f64>, labels: Vec<u8>) -> Self {
        Self { scores, labels }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Membership of every held-out example in group A (value 0) or group B (value 1).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMask {
    values: Vec<u8>,
}

impl GroupMask {
    /// Build a mask from the raw protected-attribute column.
    ///
    /// Every value must be 0 or 1 and both groups must be non-empty; anything
    /// else is rejected here so the threshold search never sees it.
    pub fn from_values(values: &[f64]) -> Result<Self, FairnessError> {
        let mut mask = Vec::with_capacity(values.len());
        for (index, &value) in values.iter().enumerate() {
            if (value - 0.0).abs() < TOLERANCE {
                mask.push(0);
            } else if (value - 1.0).abs() < TOLERANCE {
                mask.push(1);
            } else {
                return Err(FairnessError::NonBinaryGroup { index, value });
            }
        }

        let this = Self { values: mask };
        if this.count(0) == 0 {
            return Err(FairnessError::EmptyGroup { group: 'A' });
        }
        if this.count(1) == 0 {
            return Err(FairnessError::EmptyGroup { group: 'B' });
        }
        Ok(this)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Number of examples whose group value is `group`.
    pub fn count(&self, group: u8) -> usize {
        self.values.iter().filter(|&&g| g == group).count()
    }

    /// Partition aligned scores and labels into (group A, group B).
    pub fn split(&self, scores: &[f64], labels: &[u8]) -> Result<(GroupData, GroupData), FairnessError> {
        self.check_len("scores", scores.len())?;
        self.check_len("labels", labels.len())?;

        let mut group_a = GroupData::default();
        let mut group_b = GroupData::default();
        for ((&g, &s), &l) in self.values.iter().zip(scores).zip(labels) {
            let target = if g == 0 { &mut group_a } else { &mut group_b };
            target.scores.push(s);
            target.labels.push(l);
        }
        Ok((group_a, group_b))
    }

    pub(crate) fn check_len(&self, what: &'static str, actual: usize) -> Result<(), FairnessError> {
        if actual != self.values.len() {
            return Err(FairnessError::LengthMismatch {
                what,
                expected: self.values.len(),
                actual,
            });
        }
        Ok(())
    }
}

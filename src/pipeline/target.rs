//! Target column mapping to binary labels
//!
//! Datasets describe the positive class differently: adult income uses a
//! string value (`>50K`), heart disease an already-binary column, student
//! performance a grade cut-off. `PositiveRule` covers all three.

use std::fmt;

use anyhow::{Context, Result};
use polars::prelude::*;

/// How a target value is turned into a 0/1 label
#[derive(Debug, Clone, PartialEq)]
pub enum PositiveRule {
    /// Label 1 when the value's text equals this string
    Equals(String),
    /// Label 1 when the numeric value is at least this large
    AtLeast(f64),
}

impl fmt::Display for PositiveRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositiveRule::Equals(v) => write!(f, "== {:?}", v),
            PositiveRule::AtLeast(v) => write!(f, ">= {}", v),
        }
    }
}

/// Build the label vector for `target` using `rule`.
///
/// Null target values abort the run; there is no sensible label for them.
pub fn build_labels(df: &DataFrame, target: &str, rule: &PositiveRule) -> Result<Vec<u8>> {
    let target_col = df
        .column(target)
        .with_context(|| format!("Target column '{}' not found", target))?;

    if target_col.len() == 0 {
        anyhow::bail!("Target column '{}' is empty", target);
    }

    let labels = match rule {
        PositiveRule::Equals(positive) => column_to_string_vec(target_col)?
            .into_iter()
            .enumerate()
            .map(|(row, v)| match v {
                Some(s) => Ok(u8::from(s.trim() == positive.as_str())),
                None => anyhow::bail!("Target column '{}' is null at row {}", target, row),
            })
            .collect::<Result<Vec<u8>>>()?,
        PositiveRule::AtLeast(threshold) => {
            let float_col = target_col.cast(&DataType::Float64).with_context(|| {
                format!("Target column '{}' must be numeric for a >= rule", target)
            })?;
            float_col
                .f64()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| match v {
                    Some(x) => Ok(u8::from(x >= *threshold)),
                    None => anyhow::bail!(
                        "Target column '{}' is null or non-numeric at row {}",
                        target,
                        row
                    ),
                })
                .collect::<Result<Vec<u8>>>()?
        }
    };

    Ok(labels)
}

/// Count (positives, negatives)
pub fn count_labels(labels: &[u8]) -> (usize, usize) {
    let positives = labels.iter().filter(|&&l| l == 1).count();
    (positives, labels.len() - positives)
}

/// Render each value as text, nulls as `None`.
///
/// Integral floats keep a trailing `.0` (`1.0`, not `1`), so encoder keys and
/// `==` rules on float columns read the way the source data scripts print them.
pub(crate) fn column_to_string_vec(col: &Column) -> Result<Vec<Option<String>>> {
    let dtype = col.dtype();
    if dtype.is_float() {
        let floats = col.cast(&DataType::Float64)?;
        return Ok(floats.f64()?.into_iter().map(|v| v.map(float_text)).collect());
    }
    if dtype.is_integer() {
        let ints = col.cast(&DataType::Int64)?;
        return Ok(ints.i64()?.into_iter().map(|v| v.map(|n| n.to_string())).collect());
    }
    if let DataType::Boolean = dtype {
        return Ok(col.bool()?.into_iter().map(|v| v.map(|b| b.to_string())).collect());
    }

    let text = col.cast(&DataType::String)?;
    Ok(text.str()?.into_iter().map(|v| v.map(str::to_string)).collect())
}

fn float_text(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e16 {
        format!("{:.1}", n)
    } else if n.is_nan() {
        "nan".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        n.to_string()
    }
}

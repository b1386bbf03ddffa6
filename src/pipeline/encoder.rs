//! Categorical label encoding
//!
//! Each encoded column maps its distinct values, sorted lexicographically, to
//! 0, 1, 2, ... The mappings are exported so the same codes can be reproduced
//! when hashing the dataset or building circuit inputs.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

use super::target::column_to_string_vec;

/// Class name used for null cells in an encoded column
pub const NULL_CLASS: &str = "null";

/// Encoder mappings: column name -> (class value -> integer code)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LabelEncoders {
    pub columns: BTreeMap<String, BTreeMap<String, i64>>,
}

impl LabelEncoders {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Code of `value` in `column`, if both are known
    pub fn code(&self, column: &str, value: &str) -> Option<i64> {
        self.columns.get(column)?.get(value).copied()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|k| k.as_str()).collect()
    }
}

/// Replace categorical columns in `df` by their integer codes.
///
/// With an explicit `columns` list only those are encoded; names not present
/// in the dataset are skipped with a warning. With an empty list every
/// string-typed column is encoded. Columns in `exclude` (the target) are
/// never touched.
pub fn encode_categoricals(
    df: &mut DataFrame,
    columns: &[String],
    exclude: &[&str],
) -> Result<LabelEncoders> {
    let selected: Vec<String> = if columns.is_empty() {
        df.get_columns()
            .iter()
            .filter(|c| c.dtype() == &DataType::String && !exclude.contains(&c.name().as_str()))
            .map(|c| c.name().to_string())
            .collect()
    } else {
        columns
            .iter()
            .filter(|name| {
                let present = df.get_column_index(name).is_some();
                if !present {
                    eprintln!(
                        "Warning: Categorical column '{}' not found in dataset, skipping",
                        name
                    );
                }
                present && !exclude.contains(&name.as_str())
            })
            .cloned()
            .collect()
    };

    let mut encoders = LabelEncoders::default();

    for name in selected {
        let column = df
            .column(&name)
            .with_context(|| format!("Categorical column '{}' not found", name))?;
        let values = column_to_string_vec(column)?;

        let classes: BTreeSet<&str> = values
            .iter()
            .map(|v| v.as_deref().unwrap_or(NULL_CLASS))
            .collect();
        let mapping: BTreeMap<String, i64> = classes
            .into_iter()
            .enumerate()
            .map(|(code, class)| (class.to_string(), code as i64))
            .collect();

        let codes: Vec<i64> = values
            .iter()
            .map(|v| mapping[v.as_deref().unwrap_or(NULL_CLASS)])
            .collect();

        df.with_column(Column::new(name.as_str().into(), codes))
            .with_context(|| format!("Failed to replace column '{}' with codes", name))?;
        encoders.columns.insert(name, mapping);
    }

    Ok(encoders)
}

/// Cast every column except `exclude` to Int64, truncating decimals.
///
/// Used for datasets whose circuit inputs must be integers.
pub fn cast_features_to_integer(df: &mut DataFrame, exclude: &[&str]) -> Result<()> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .filter(|s| !exclude.contains(&s.as_str()))
        .collect();

    for name in names {
        let column = df.column(&name)?;
        if !column.dtype().is_primitive_numeric() && column.dtype() != &DataType::Boolean {
            anyhow::bail!(
                "Column '{}' has type {} and cannot be cast to integer; encode it first",
                name,
                column.dtype()
            );
        }
        let cast = column
            .cast(&DataType::Int64)
            .with_context(|| format!("Failed to cast column '{}' to Int64", name))?;
        df.with_column(cast)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_columns_sorted_codes() {
        let mut df = df! {
            "sex" => ["Male", "Female", "Male"],
            "race" => ["White", "Black", "Asian"],
            "age" => [30i64, 40, 50],
        }
        .unwrap();

        let enc = encode_categoricals(&mut df, &["sex".into(), "race".into()], &[]).unwrap();

        assert_eq!(enc.code("sex", "Female"), Some(0));
        assert_eq!(enc.code("sex", "Male"), Some(1));
        assert_eq!(enc.code("race", "Asian"), Some(0));
        assert_eq!(enc.code("race", "White"), Some(2));

        let sex: Vec<Option<i64>> = df.column("sex").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(sex, vec![Some(1), Some(0), Some(1)]);
    }

    #[test]
    fn test_auto_detect_skips_target() {
        let mut df = df! {
            "school" => ["GP", "MS", "GP"],
            "G3" => ["pass", "fail", "pass"],
        }
        .unwrap();

        let enc = encode_categoricals(&mut df, &[], &["G3"]).unwrap();
        assert_eq!(enc.column_names(), vec!["school"]);
        assert_eq!(df.column("G3").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_missing_explicit_column_skipped() {
        let mut df = df! { "sex" => ["M", "F"] }.unwrap();
        let enc = encode_categoricals(&mut df, &["native.country".into(), "sex".into()], &[]).unwrap();
        assert_eq!(enc.len(), 1);
    }

    #[test]
    fn test_null_becomes_class() {
        let mut df = df! { "c" => [Some("b"), None, Some("a")] }.unwrap();
        let enc = encode_categoricals(&mut df, &["c".into()], &[]).unwrap();

        // "a" < "b" < "null"
        assert_eq!(enc.code("c", NULL_CLASS), Some(2));
    }

    #[test]
    fn test_encoders_serialize_flat() {
        let mut df = df! { "sex" => ["Male", "Female"] }.unwrap();
        let enc = encode_categoricals(&mut df, &["sex".into()], &[]).unwrap();
        let json = serde_json::to_value(&enc).unwrap();
        assert_eq!(json, serde_json::json!({ "sex": { "Female": 0, "Male": 1 } }));
    }

    #[test]
    fn test_cast_to_integer_truncates() {
        let mut df = df! {
            "oldpeak" => [1.7f64, 2.3, 0.9],
            "target" => ["a", "b", "c"],
        }
        .unwrap();

        cast_features_to_integer(&mut df, &["target"]).unwrap();
        let v: Vec<Option<i64>> = df.column("oldpeak").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(v, vec![Some(1), Some(2), Some(0)]);
    }

    #[test]
    fn test_cast_rejects_strings() {
        let mut df = df! { "name" => ["x", "y"] }.unwrap();
        assert!(cast_features_to_integer(&mut df, &[]).is_err());
    }
}

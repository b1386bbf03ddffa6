//! Dense row-major feature matrix extracted from an encoded DataFrame

use anyhow::{Context, Result};
use polars::prelude::*;

/// Numeric features, one row per example, columns in dataset order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    pub feature_names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Extract every column except `exclude` as f64.
    ///
    /// All remaining columns must be numeric (or boolean) and free of nulls;
    /// categorical columns therefore have to be encoded first.
    pub fn from_dataframe(df: &DataFrame, exclude: &[&str]) -> Result<Self> {
        let mut feature_names = Vec::new();
        let mut columns: Vec<Vec<f64>> = Vec::new();

        for column in df.get_columns() {
            let name = column.name().as_str();
            if exclude.contains(&name) {
                continue;
            }
            let dtype = column.dtype();
            if !dtype.is_primitive_numeric() && dtype != &DataType::Boolean {
                anyhow::bail!(
                    "Feature column '{}' has type {}; categorical columns must be encoded",
                    name,
                    dtype
                );
            }

            let float_col = column
                .cast(&DataType::Float64)
                .with_context(|| format!("Failed to cast feature '{}' to Float64", name))?;
            let values = float_col
                .f64()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| {
                    v.ok_or_else(|| anyhow::anyhow!("Feature '{}' is null at row {}", name, row))
                })
                .collect::<Result<Vec<f64>>>()?;

            feature_names.push(name.to_string());
            columns.push(values);
        }

        if feature_names.is_empty() {
            anyhow::bail!("Dataset has no feature columns");
        }

        let n_rows = df.height();
        let rows = (0..n_rows)
            .map(|i| columns.iter().map(|c| c[i]).collect())
            .collect();

        Ok(Self {
            feature_names,
            rows,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Position of a feature in each row
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.feature_names.iter().position(|n| n == name)
    }

    /// All values of one feature
    pub fn column(&self, index: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r[index]).collect()
    }

    /// New matrix with the given rows, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}

/// Select labels by row indices
pub fn select_labels(labels: &[u8], indices: &[usize]) -> Vec<u8> {
    indices.iter().map(|&i| labels[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dataframe_excludes_target() {
        let df = df! {
            "age" => [30i64, 40],
            "hours" => [40.5f64, 50.0],
            "income" => ["<=50K", ">50K"],
        }
        .unwrap();

        let m = FeatureMatrix::from_dataframe(&df, &["income"]).unwrap();
        assert_eq!(m.feature_names, vec!["age", "hours"]);
        assert_eq!(m.rows, vec![vec![30.0, 40.5], vec![40.0, 50.0]]);
        assert_eq!(m.column_index("hours"), Some(1));
        assert_eq!(m.column(0), vec![30.0, 40.0]);
    }

    #[test]
    fn test_unencoded_string_rejected() {
        let df = df! {
            "sex" => ["M", "F"],
            "target" => [0i32, 1],
        }
        .unwrap();

        let err = FeatureMatrix::from_dataframe(&df, &["target"]).unwrap_err();
        assert!(err.to_string().contains("must be encoded"));
    }

    #[test]
    fn test_null_feature_rejected() {
        let df = df! {
            "x" => [Some(1.0f64), None],
        }
        .unwrap();

        let err = FeatureMatrix::from_dataframe(&df, &[]).unwrap_err();
        assert!(err.to_string().contains("null at row 1"));
    }

    #[test]
    fn test_select_rows() {
        let m = FeatureMatrix {
            feature_names: vec!["a".into()],
            rows: vec![vec![1.0], vec![2.0], vec![3.0]],
        };
        let s = m.select_rows(&[2, 0]);
        assert_eq!(s.rows, vec![vec![3.0], vec![1.0]]);
        assert_eq!(select_labels(&[0, 1, 1], &[2, 0]), vec![1, 0]);
    }
}

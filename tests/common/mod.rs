//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// Census-like DataFrame shaped after the adult income dataset.
///
/// - `age`, `education.num`, `hours.per.week`: integer features
/// - `workclass`, `sex`: string categoricals (`sex` is Female/Male)
/// - `income`: "<=50K" / ">50K", driven by the numeric features plus noise
pub fn create_adult_like_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let workclasses = ["Private", "Self-emp", "Gov"];

    let mut age = Vec::with_capacity(rows);
    let mut education = Vec::with_capacity(rows);
    let mut hours = Vec::with_capacity(rows);
    let mut workclass = Vec::with_capacity(rows);
    let mut sex = Vec::with_capacity(rows);
    let mut income = Vec::with_capacity(rows);

    for i in 0..rows {
        let a: i64 = rng.gen_range(18..70);
        let e: i64 = rng.gen_range(5..16);
        let h: i64 = rng.gen_range(20..60);
        let male = i % 2 == 0;
        let score = 0.04 * (a - 40) as f64 + 0.3 * (e - 10) as f64 + 0.05 * (h - 40) as f64
            + if male { 0.5 } else { 0.0 }
            + rng.gen_range(-1.5..1.5);

        age.push(a);
        education.push(e);
        hours.push(h);
        workclass.push(workclasses[rng.gen_range(0..workclasses.len())]);
        sex.push(if male { "Male" } else { "Female" });
        income.push(if score > 0.0 { ">50K" } else { "<=50K" });
    }

    df! {
        "age" => age,
        "workclass" => workclass,
        "education.num" => education,
        "sex" => sex,
        "hours.per.week" => hours,
        "income" => income,
    }
    .unwrap()
}

/// Scores, labels and 0/1 group membership for the threshold engine
pub fn random_scored_groups(n: usize, seed: u64) -> (Vec<f64>, Vec<u8>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scores = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    let mut groups = Vec::with_capacity(n);

    for i in 0..n {
        let label: u8 = rng.gen_range(0..2);
        let group = (i % 2) as f64;
        let shift = if label == 1 { 0.8 } else { -0.8 } + group * 0.3;
        scores.push(shift + rng.gen_range(-1.0..1.0));
        labels.push(label);
        groups.push(group);
    }

    (scores, labels, groups)
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    create_temp_csv_with_separator(df, b',')
}

pub fn create_temp_csv_with_separator(df: &mut DataFrame, separator: u8) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file)
        .with_separator(separator)
        .finish(df)
        .unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

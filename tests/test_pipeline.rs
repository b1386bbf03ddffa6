//! Integration tests for the full training and artifact pipeline

use clap::Parser;
use fairprep::cli::{run_pipeline, Cli, RunConfig};
use fairprep::pipeline::*;
use fairprep::report::*;
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn run_config(input: &std::path::Path, output: &std::path::Path, extra: &[&str]) -> RunConfig {
    let mut args = vec![
        "fairprep".to_string(),
        "-i".to_string(),
        input.display().to_string(),
        "-o".to_string(),
        output.display().to_string(),
        "--no-confirm".to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    RunConfig::resolve(&Cli::parse_from(args)).unwrap()
}

#[test]
fn test_full_pipeline_writes_artifacts() {
    let mut df = create_adult_like_dataframe(300, 42);
    let (temp_dir, csv_path) = create_temp_csv(&mut df);
    let out = temp_dir.path().join("artifacts");

    let summary = run_pipeline(&run_config(&csv_path, &out, &[])).unwrap();

    let paths = ArtifactPaths::new(&out);
    for path in paths.all() {
        assert!(path.exists(), "missing artifact {}", path.display());
    }
    assert_eq!(summary.rows, 300);
    assert_eq!(summary.test_rows, 90);
    assert_eq!(summary.train_rows, 210);

    // 5 features + intercept as f32
    let weights = read_weights(&paths.weights).unwrap();
    assert_eq!(weights.len(), 6);
    assert!(weights.iter().all(|w| w.is_finite()));

    let fairness: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.fairness).unwrap()).unwrap();
    assert_eq!(fairness["metric"], "demographic_parity");
    assert_eq!(fairness["protectedAttribute"], "sex");
    assert_eq!(fairness["protectedAttributeIndex"], 3);
    assert_eq!(fairness["thresholdScale"], 10000);
    assert!(fairness["thresholds"]["group_a"].is_u64());
    assert!(fairness["thresholds"]["group_b"].is_u64());
    assert!(fairness["targetDisparity"].as_f64().unwrap() >= 0.05);
    for key in [
        "demographicParity",
        "equalizedOdds",
        "group0PositiveRate",
        "group1PositiveRate",
        "group0TPR",
        "group1TPR",
        "group0FPR",
        "group1FPR",
    ] {
        assert!(fairness["calculatedMetrics"][key].is_number(), "{}", key);
    }

    let card: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.model_card).unwrap()).unwrap();
    assert_eq!(card["name"], "Adult Income Prediction Model");
    assert_eq!(card["numFeatures"], 5);
    assert_eq!(card["inferenceUrl"], "https://zkfair-provider.fly.dev");
}

#[test]
fn test_encoded_datasets_are_integer_with_label_last() {
    let mut df = create_adult_like_dataframe(120, 3);
    let (temp_dir, csv_path) = create_temp_csv(&mut df);
    let out = temp_dir.path().join("artifacts");

    run_pipeline(&run_config(&csv_path, &out, &[])).unwrap();
    let paths = ArtifactPaths::new(&out);

    let encoded = load_dataset(&paths.encoded_dataset, b',', 0).unwrap();
    assert_eq!(encoded.height(), 120);
    let names = get_column_names(&encoded);
    assert_eq!(names.last().map(String::as_str), Some("income"));
    for column in encoded.get_columns() {
        assert_eq!(column.dtype(), &DataType::Int64, "{}", column.name());
    }

    let small = load_dataset(&paths.encoded_small, b',', 0).unwrap();
    assert_eq!(small.height(), 10);

    let calibration = load_dataset(&paths.calibration, b',', 0).unwrap();
    assert_eq!(calibration.height(), 36);
    assert_has_columns(&calibration, &["income", "sex", "workclass"]);

    let encoders: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.encoders).unwrap()).unwrap();
    assert_eq!(encoders["sex"]["Female"], 0);
    assert_eq!(encoders["sex"]["Male"], 1);
    assert_eq!(encoders["workclass"]["Gov"], 0);
}

#[test]
fn test_bundle_replaces_loose_files() {
    let mut df = create_adult_like_dataframe(100, 5);
    let (temp_dir, csv_path) = create_temp_csv(&mut df);
    let out = temp_dir.path().join("artifacts");

    run_pipeline(&run_config(&csv_path, &out, &["--bundle"])).unwrap();
    let paths = ArtifactPaths::new(&out);

    assert!(paths.bundle().exists());
    assert!(!paths.weights.exists());
    assert!(!paths.fairness.exists());
}

#[test]
fn test_student_profile_with_semicolon_and_numeric_target() {
    let mut df = df! {
        "sex" => ["F", "M", "F", "M", "F", "M", "F", "M", "F", "M",
                  "F", "M", "F", "M", "F", "M", "F", "M", "F", "M"],
        "school" => ["GP", "MS", "GP", "GP", "MS", "GP", "MS", "GP", "GP", "MS",
                     "GP", "MS", "GP", "GP", "MS", "GP", "MS", "GP", "GP", "MS"],
        "studytime" => [1i64, 2, 3, 4, 1, 2, 3, 4, 2, 3, 1, 4, 2, 3, 4, 1, 2, 3, 4, 1],
        "G3" => [5i64, 8, 12, 15, 6, 11, 14, 16, 9, 12, 4, 17, 10, 13, 18, 7, 8, 12, 15, 6],
    }
    .unwrap();
    let (temp_dir, csv_path) = create_temp_csv_with_separator(&mut df, b';');
    let out = temp_dir.path().join("artifacts");

    let config = run_config(
        &csv_path,
        &out,
        &["--profile", "student-performance", "--test-size", "0.5"],
    );
    let summary = run_pipeline(&config).unwrap();

    assert_eq!(summary.features, 3);
    let fairness: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(ArtifactPaths::new(&out).fairness).unwrap(),
    )
    .unwrap();
    assert!(fairness["targetDisparity"].as_f64().unwrap() >= 0.06);
    assert_eq!(fairness["protectedAttributeIndex"], 0);
}

#[test]
fn test_missing_target_fails() {
    let mut df = create_adult_like_dataframe(50, 1);
    let (temp_dir, csv_path) = create_temp_csv(&mut df);
    let out = temp_dir.path().join("artifacts");

    let config = run_config(&csv_path, &out, &["-t", "salary"]);
    let err = run_pipeline(&config).unwrap_err();
    assert!(err.to_string().contains("salary"));
}

#[test]
fn test_non_binary_protected_attribute_fails() {
    let mut df = create_adult_like_dataframe(80, 9);
    let (temp_dir, csv_path) = create_temp_csv(&mut df);
    let out = temp_dir.path().join("artifacts");

    let config = run_config(&csv_path, &out, &["-p", "age"]);
    let err = run_pipeline(&config).unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid protected attribute"));
}

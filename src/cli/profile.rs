//! Dataset profiles and the resolved run configuration

use std::path::PathBuf;

use anyhow::Result;

use super::args::{Cli, Profile};
use crate::pipeline::{PositiveRule, TrainConfig};

/// Defaults bundled for a known dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetProfile {
    pub name: &'static str,
    pub separator: u8,
    pub target: Option<&'static str>,
    pub positive_rule: Option<PositiveRule>,
    /// Empty means string columns are detected
    pub categorical: Vec<&'static str>,
    pub protected_attribute: &'static str,
    pub disparity_floor: f64,
    pub integer_features: bool,
    pub model_name: &'static str,
    pub model_description: &'static str,
    pub creator: &'static str,
    pub inference_url: Option<&'static str>,
}

impl DatasetProfile {
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::AdultIncome => Self {
                name: "adult-income",
                separator: b',',
                target: Some("income"),
                positive_rule: Some(PositiveRule::Equals(">50K".into())),
                categorical: vec![
                    "workclass",
                    "education",
                    "marital.status",
                    "occupation",
                    "relationship",
                    "race",
                    "sex",
                    "native.country",
                ],
                protected_attribute: "sex",
                disparity_floor: 0.05,
                integer_features: true,
                model_name: "Adult Income Prediction Model",
                model_description: "Logistic regression model predicting income >50K from census data",
                creator: "ZKFair Team",
                inference_url: Some("https://zkfair-provider.fly.dev"),
            },
            Profile::HeartDisease => Self {
                name: "heart-disease",
                separator: b',',
                target: Some("target"),
                positive_rule: Some(PositiveRule::Equals("1".into())),
                categorical: Vec::new(),
                protected_attribute: "sex",
                disparity_floor: 0.05,
                integer_features: false,
                model_name: "Heart Disease Prediction Model",
                model_description: "Logistic regression model predicting heart disease from clinical measurements",
                creator: "ZKFair Team",
                inference_url: None,
            },
            Profile::StudentPerformance => Self {
                name: "student-performance",
                separator: b';',
                target: Some("G3"),
                positive_rule: Some(PositiveRule::AtLeast(10.0)),
                categorical: Vec::new(),
                protected_attribute: "sex",
                disparity_floor: 0.06,
                integer_features: false,
                model_name: "Student Performance Prediction Model",
                model_description: "Logistic regression model predicting student pass/fail based on academic and social factors",
                creator: "ZKFair Team",
                inference_url: None,
            },
            Profile::Custom => Self {
                name: "custom",
                separator: b',',
                target: None,
                positive_rule: None,
                categorical: Vec::new(),
                protected_attribute: "sex",
                disparity_floor: 0.05,
                integer_features: false,
                model_name: "Logistic Regression Model",
                model_description: "Logistic regression model with fairness-aware group thresholds",
                creator: "fairprep",
                inference_url: None,
            },
        }
    }
}

/// Profile defaults with the command-line overrides applied
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub profile: DatasetProfile,
    pub separator: u8,
    pub target: String,
    pub positive_rule: PositiveRule,
    pub categorical: Vec<String>,
    pub protected_attribute: String,
    pub disparity_floor: f64,
    pub integer_features: bool,
    pub test_size: f64,
    pub seed: u64,
    pub train: TrainConfig,
    pub grid_points: usize,
    pub threshold_scale: u64,
    pub small_rows: usize,
    pub bundle: bool,
    pub no_confirm: bool,
    pub infer_schema_length: usize,
}

impl RunConfig {
    /// Layer the flags over the selected profile
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let input = cli.input.clone().ok_or_else(|| {
            anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
        })?;
        let output_dir = cli
            .output_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not derive the output directory"))?;
        let profile = DatasetProfile::for_profile(cli.profile);

        let target = cli
            .target
            .clone()
            .or_else(|| profile.target.map(str::to_string))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Profile '{}' has no target column. Use -t/--target to specify one.",
                    profile.name
                )
            })?;

        let positive_rule = match (&cli.positive_value, cli.positive_min) {
            (Some(value), _) => PositiveRule::Equals(value.clone()),
            (None, Some(min)) => PositiveRule::AtLeast(min),
            (None, None) => profile
                .positive_rule
                .clone()
                .unwrap_or_else(|| PositiveRule::Equals("1".into())),
        };

        let categorical = if cli.categorical.is_empty() {
            profile.categorical.iter().map(|s| s.to_string()).collect()
        } else {
            cli.categorical.clone()
        };

        Ok(Self {
            input,
            output_dir,
            separator: cli.separator.unwrap_or(profile.separator),
            target,
            positive_rule,
            categorical,
            protected_attribute: cli
                .protected_attribute
                .clone()
                .unwrap_or_else(|| profile.protected_attribute.to_string()),
            disparity_floor: cli.disparity_floor.unwrap_or(profile.disparity_floor),
            integer_features: cli.integer_features || profile.integer_features,
            test_size: cli.test_size,
            seed: cli.seed,
            train: TrainConfig {
                max_iter: cli.max_iter,
                c: cli.l2,
                ..TrainConfig::default()
            },
            grid_points: cli.grid_points,
            threshold_scale: cli.threshold_scale,
            small_rows: cli.small_rows,
            bundle: cli.bundle,
            no_confirm: cli.no_confirm,
            infer_schema_length: cli.infer_schema_length,
            profile,
        })
    }
}

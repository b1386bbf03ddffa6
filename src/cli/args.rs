//! Command-line argument definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// fairprep - Train a logistic model and derive fairness-aware thresholds
#[derive(Parser, Debug)]
#[command(name = "fairprep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input dataset path (CSV or Parquet)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory for the artifacts.
    /// Defaults to the input directory with an '_artifacts' suffix (e.g., adult.csv → adult_artifacts/).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Dataset profile providing defaults for every dataset-specific option
    #[arg(long, value_enum, default_value = "adult-income")]
    pub profile: Profile,

    /// Target column name (overrides the profile)
    #[arg(short, long)]
    pub target: Option<String>,

    /// Target value that marks the positive class (overrides the profile)
    #[arg(long, conflicts_with = "positive_min")]
    pub positive_value: Option<String>,

    /// Numeric target values at or above this are positive (overrides the profile)
    #[arg(long)]
    pub positive_min: Option<f64>,

    /// Binary feature column defining the two groups (overrides the profile)
    #[arg(short = 'p', long)]
    pub protected_attribute: Option<String>,

    /// Categorical columns to label-encode (comma-separated).
    /// When neither this nor the profile lists any, string columns are detected.
    #[arg(long, value_delimiter = ',')]
    pub categorical: Vec<String>,

    /// CSV field separator (single ASCII character)
    #[arg(long, value_parser = validate_separator)]
    pub separator: Option<u8>,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value = "0.3", value_parser = validate_test_size)]
    pub test_size: f64,

    /// Seed for the train/test shuffle
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Maximum Newton iterations for the logistic regression
    #[arg(long, default_value = "100")]
    pub max_iter: usize,

    /// Inverse L2 regularisation strength (C)
    #[arg(long = "l2", default_value = "1.0", value_parser = validate_positive)]
    pub l2: f64,

    /// Lower bound of the published target disparity (overrides the profile)
    #[arg(long, value_parser = validate_unit_interval)]
    pub disparity_floor: Option<f64>,

    /// Multiplier applied before rounding thresholds to integers
    #[arg(long, default_value = "10000")]
    pub threshold_scale: u64,

    /// Number of FPR grid points searched for the operating point
    #[arg(long, default_value = "500", value_parser = validate_grid_points)]
    pub grid_points: usize,

    /// Rows written to the small encoded dataset
    #[arg(long, default_value = "10")]
    pub small_rows: usize,

    /// Cast every feature column to integers before training
    #[arg(long, default_value = "false")]
    pub integer_features: bool,

    /// Package the artifacts into artifacts.zip and remove the loose files
    #[arg(long, default_value = "false")]
    pub bundle: bool,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Derive per-group thresholds from a CSV of pre-computed scores
    Thresholds {
        /// CSV with columns score, label (0/1) and group (0/1)
        #[arg(long)]
        scores: PathBuf,

        /// Optional JSON file for the threshold pair
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of FPR grid points searched for the operating point
        #[arg(long, default_value = "500", value_parser = validate_grid_points)]
        grid_points: usize,

        /// Multiplier applied before rounding thresholds to integers
        #[arg(long, default_value = "10000")]
        threshold_scale: u64,
    },
}

/// Bundled dataset defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    AdultIncome,
    HeartDisease,
    StudentPerformance,
    Custom,
}

impl Cli {
    /// Output directory, derived from the input when not given
    pub fn output_dir(&self) -> Option<PathBuf> {
        let input = self.input.as_ref()?;
        Some(
            self.output
                .clone()
                .unwrap_or_else(|| default_output_dir(input)),
        )
    }
}

/// `<input dir>/<input stem>_artifacts`
pub fn default_output_dir(input: &Path) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset");
    parent.join(format!("{}_artifacts", stem))
}

fn parse_f64(s: &str) -> Result<f64, String> {
    s.parse()
        .map_err(|_| format!("'{}' is not a valid number", s))
}

/// Validator for test_size parameter
fn validate_test_size(s: &str) -> Result<f64, String> {
    let value = parse_f64(s)?;
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!("test_size must be strictly between 0 and 1, got {}", value))
    }
}

fn validate_unit_interval(s: &str) -> Result<f64, String> {
    let value = parse_f64(s)?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("value must be between 0.0 and 1.0, got {}", value))
    }
}

fn validate_positive(s: &str) -> Result<f64, String> {
    let value = parse_f64(s)?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("value must be a positive number, got {}", value))
    }
}

fn validate_grid_points(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid integer", s))?;
    if value < 2 {
        Err(format!("grid_points must be at least 2, got {}", value))
    } else {
        Ok(value)
    }
}

fn validate_separator(s: &str) -> Result<u8, String> {
    let unescaped = if s == "\\t" { "\t" } else { s };
    match unescaped.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(format!("separator must be a single ASCII character, got '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_dir() {
        let dir = default_output_dir(Path::new("/data/adult.csv"));
        assert_eq!(dir, PathBuf::from("/data/adult_artifacts"));
    }

    #[test]
    fn test_validators() {
        assert!(validate_test_size("0.3").is_ok());
        assert!(validate_test_size("1.0").is_err());
        assert!(validate_test_size("0").is_err());
        assert_eq!(validate_grid_points("2"), Ok(2));
        assert!(validate_grid_points("1").is_err());
        assert_eq!(validate_separator(";"), Ok(b';'));
        assert_eq!(validate_separator("\\t"), Ok(b'\t'));
        assert!(validate_separator(";;").is_err());
        assert!(validate_positive("0").is_err());
    }
}

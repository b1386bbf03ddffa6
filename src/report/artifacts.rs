//! Artifact writer: weights, encoder mappings, model card, datasets and bundle

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::DataFrame;
use serde::Serialize;

use crate::pipeline::{save_csv, LabelEncoders, LogisticRegression};

pub const WEIGHTS_FILE: &str = "weights.bin";
pub const ENCODERS_FILE: &str = "label_encoders.json";
pub const FAIRNESS_FILE: &str = "fairness_threshold.json";
pub const MODEL_CARD_FILE: &str = "model.json";
pub const ENCODED_DATASET_FILE: &str = "dataset_encoded.csv";
pub const ENCODED_SMALL_FILE: &str = "dataset_encoded_small.csv";
pub const CALIBRATION_FILE: &str = "calibration_dataset.csv";
pub const BUNDLE_FILE: &str = "artifacts.zip";

/// Locations of every file a run produces inside the output directory
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub weights: PathBuf,
    pub encoders: PathBuf,
    pub fairness: PathBuf,
    pub model_card: PathBuf,
    pub encoded_dataset: PathBuf,
    pub encoded_small: PathBuf,
    pub calibration: PathBuf,
}

impl ArtifactPaths {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            weights: dir.join(WEIGHTS_FILE),
            encoders: dir.join(ENCODERS_FILE),
            fairness: dir.join(FAIRNESS_FILE),
            model_card: dir.join(MODEL_CARD_FILE),
            encoded_dataset: dir.join(ENCODED_DATASET_FILE),
            encoded_small: dir.join(ENCODED_SMALL_FILE),
            calibration: dir.join(CALIBRATION_FILE),
        }
    }

    /// All artifact files, in the order they are listed to the user
    pub fn all(&self) -> Vec<&Path> {
        vec![
            self.weights.as_path(),
            self.encoders.as_path(),
            self.fairness.as_path(),
            self.model_card.as_path(),
            self.encoded_dataset.as_path(),
            self.encoded_small.as_path(),
            self.calibration.as_path(),
        ]
    }

    pub fn bundle(&self) -> PathBuf {
        self.dir.join(BUNDLE_FILE)
    }
}

/// Create the output directory if needed
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))
}

/// True when `dir` exists and already contains files
pub fn dir_has_files(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Write coefficients followed by the intercept as little-endian f32
pub fn write_weights(model: &LogisticRegression, output_path: &Path) -> Result<()> {
    let bytes: Vec<u8> = model
        .weights_with_intercept()
        .iter()
        .flat_map(|w| w.to_le_bytes())
        .collect();

    std::fs::write(output_path, bytes)
        .with_context(|| format!("Failed to write weights to {}", output_path.display()))
}

/// Read a weights file back into f32 values
pub fn read_weights(path: &Path) -> Result<Vec<f32>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read weights from {}", path.display()))?;
    if bytes.len() % 4 != 0 {
        anyhow::bail!(
            "Weights file {} has {} bytes, not a multiple of 4",
            path.display(),
            bytes.len()
        );
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Write encoder mappings as pretty JSON
pub fn write_label_encoders(encoders: &LabelEncoders, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(encoders)
        .context("Failed to serialize label encoders to JSON")?;

    std::fs::write(output_path, json).with_context(|| {
        format!("Failed to write label encoders to {}", output_path.display())
    })
}

/// Model metadata published alongside the weights
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCard {
    pub name: String,
    pub description: String,
    pub creator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inference_url: Option<String>,
    /// Timestamp of the run (ISO 8601 format)
    pub generated_at: String,
    pub generator_version: String,
    pub num_features: usize,
    pub feature_names: Vec<String>,
    pub test_accuracy: f64,
}

/// Parameters for the model card
pub struct ModelCardParams<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub creator: &'a str,
    pub inference_url: Option<&'a str>,
    pub feature_names: &'a [String],
    pub test_accuracy: f64,
}

impl ModelCard {
    pub fn new(params: &ModelCardParams) -> Self {
        Self {
            name: params.name.to_string(),
            description: params.description.to_string(),
            creator: params.creator.to_string(),
            inference_url: params.inference_url.map(|s| s.to_string()),
            generated_at: Utc::now().to_rfc3339(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            num_features: params.feature_names.len(),
            feature_names: params.feature_names.to_vec(),
            test_accuracy: (params.test_accuracy * 10_000.0).round() / 10_000.0,
        }
    }
}

pub fn write_model_card(card: &ModelCard, output_path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(card).context("Failed to serialize model card to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write model card to {}", output_path.display()))
}

/// Write the encoded dataset and its first `small_rows` rows
pub fn write_encoded_datasets(
    encoded: &mut DataFrame,
    small_rows: usize,
    paths: &ArtifactPaths,
) -> Result<()> {
    save_csv(encoded, &paths.encoded_dataset)?;
    let mut small = encoded.head(Some(small_rows));
    save_csv(&mut small, &paths.encoded_small)?;
    Ok(())
}

/// Package the given files into a zip archive and remove the originals
pub fn package_artifacts(files: &[&Path], zip_path: &Path) -> Result<()> {
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let zip_file = std::fs::File::create(zip_path)
        .with_context(|| format!("Failed to create zip file: {}", zip_path.display()))?;

    let mut zip = ZipWriter::new(zip_file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for path in files {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid artifact path: {}", path.display()))?;
        zip.start_file(filename, options)
            .with_context(|| format!("Failed to add {} to zip", filename))?;
        let mut content = Vec::new();
        std::fs::File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?
            .read_to_end(&mut content)?;
        zip.write_all(&content)?;
    }

    zip.finish().context("Failed to finalize zip file")?;

    for path in files {
        std::fs::remove_file(path).ok();
    }

    Ok(())
}

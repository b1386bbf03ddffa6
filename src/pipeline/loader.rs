//! Dataset loader for CSV and Parquet files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

/// Load a dataset into memory (CSV or Parquet based on extension).
///
/// CSV files are read with a header row, the given field separator and `"`
/// as the quote character. `infer_schema_length` of 0 scans the whole file.
pub fn load_dataset(path: &Path, separator: u8, infer_schema_length: usize) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" | "txt" => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_separator(separator)
            .with_quote_char(Some(b'"'))
            .with_infer_schema_length(schema_length)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    let df = lf
        .collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;

    if df.height() == 0 {
        anyhow::bail!("Dataset {} contains no rows", path.display());
    }

    Ok(df)
}

/// Column names of a loaded dataset, in file order
pub fn get_column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Fail unless every name in `required` is a column of `df`
pub fn require_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    let columns = get_column_names(df);
    for name in required {
        if !columns.iter().any(|c| c == name) {
            anyhow::bail!(
                "Column '{}' not found in dataset. Available columns: {:?}",
                name,
                columns
            );
        }
    }
    Ok(())
}

/// Save a DataFrame as CSV (comma separated, header row)
pub fn save_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    Ok(())
}

//! Fairness module - group metrics and per-group threshold post-processing

pub mod error;
pub mod groups;
pub mod metrics;
pub mod roc;
pub mod thresholds;

pub use error::FairnessError;
pub use groups::*;
pub use metrics::*;
pub use roc::*;
pub use thresholds::*;

/// Fixed-point scale giving thresholds four decimal places
pub const DEFAULT_THRESHOLD_SCALE: u64 = 10_000;

/// Scale a threshold to the non-negative fixed-point integer the circuit expects.
///
/// The sign is dropped; callers that need it must persist the raw value too.
pub fn scale_threshold(threshold: f64, scale: u64) -> u64 {
    (threshold.abs() * scale as f64).round() as u64
}

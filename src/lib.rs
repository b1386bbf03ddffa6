//! fairprep: Fairness-aware Model Artifacts
//!
//! A library for training a logistic regression model on tabular data and
//! deriving per-group decision thresholds that equalize true positive rates
//! across a binary protected attribute.

pub mod cli;
pub mod fairness;
pub mod pipeline;
pub mod report;
pub mod utils;

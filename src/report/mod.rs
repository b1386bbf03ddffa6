//! Report module - artifact files and run summaries

pub mod artifacts;
pub mod fairness_config;
pub mod summary;

pub use artifacts::*;
pub use fairness_config::*;
pub use summary::*;

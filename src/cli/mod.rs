//! CLI module - argument parsing, dataset profiles and interactive prompts

mod args;
mod profile;
mod prompts;
mod run;
pub mod thresholds;

pub use args::{default_output_dir, Cli, Commands, Profile};
pub use profile::{DatasetProfile, RunConfig};
pub use prompts::*;
pub use run::run_pipeline;

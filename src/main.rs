//! fairprep: Fairness-aware Model Artifacts CLI
//!
//! Trains a logistic regression model on a tabular dataset and writes the
//! weights, encoders and per-group fairness thresholds.

use anyhow::Result;
use clap::Parser;

use fairprep::cli::{confirm_overwrite, run_pipeline, thresholds, Cli, Commands, RunConfig};
use fairprep::report::dir_has_files;
use fairprep::utils::{print_banner, print_completion, print_config, ConfigCard};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Thresholds {
                scores,
                output,
                grid_points,
                threshold_scale,
            } => thresholds::run_thresholds(scores, output.as_deref(), *grid_points, *threshold_scale),
        };
    }

    let config = RunConfig::resolve(&cli)?;

    if !config.no_confirm && dir_has_files(&config.output_dir) && !confirm_overwrite(&config.output_dir)? {
        println!("Cancelled by user.");
        return Ok(());
    }

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&ConfigCard {
        input: &config.input,
        target: &config.target,
        output: &config.output_dir,
        profile: config.profile.name,
        protected_attribute: &config.protected_attribute,
        test_size: config.test_size,
        disparity_floor: config.disparity_floor,
    });

    let summary = run_pipeline(&config)?;

    summary.display();
    print_completion(&config.output_dir);

    Ok(())
}

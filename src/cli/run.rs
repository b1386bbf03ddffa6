//! End-to-end run: load, encode, train, evaluate and write artifacts

use std::time::Instant;

use anyhow::{Context, Result};
use console::style;
use polars::prelude::*;

use super::profile::RunConfig;
use crate::fairness::ThresholdSearch;
use crate::pipeline::{
    build_labels, cast_features_to_integer, count_labels, encode_categoricals,
    evaluate_fairness, load_dataset, require_columns, save_csv, select_labels, take_rows,
    train_test_split, FeatureMatrix, LogisticRegression,
};
use crate::report::{
    package_artifacts, prepare_output_dir, write_encoded_datasets, write_fairness_config,
    write_label_encoders, write_model_card, write_weights, ArtifactPaths, FairnessConfig,
    ModelCard, ModelCardParams, RunSummary,
};
use crate::utils::{
    create_spinner, finish_with_success, print_info, print_step_header, print_step_time,
    print_success, print_warning,
};

/// Run every stage for `config`, writing artifacts into its output directory
pub fn run_pipeline(config: &RunConfig) -> Result<RunSummary> {
    let target = config.target.as_str();
    let search = ThresholdSearch::new(config.grid_points)?;

    // Step 1: Load
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading dataset...");
    let mut df = load_dataset(&config.input, config.separator, config.infer_schema_length)?;
    finish_with_success(&spinner, "Dataset loaded");
    require_columns(&df, &[target])?;

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", df.height());
    println!("      Columns: {}", df.width());

    let load_elapsed = step_start.elapsed();
    print_step_time(load_elapsed);

    // Step 2: Labels and encoding
    print_step_header(2, "Encode Dataset");
    let step_start = Instant::now();

    let labels = build_labels(&df, target, &config.positive_rule)?;
    let (positives, negatives) = count_labels(&labels);
    println!(
        "      Target {} {}: {} positive, {} negative",
        style(target).yellow(),
        style(&config.positive_rule).dim(),
        style(positives).green(),
        style(negatives).red()
    );

    df.drop_in_place(target)
        .with_context(|| format!("Failed to drop target column '{}'", target))?;
    let encoders = encode_categoricals(&mut df, &config.categorical, &[target])?;
    print_info(&format!(
        "Label-encoded {} column(s): {}",
        encoders.len(),
        encoders.column_names().join(", ")
    ));

    let label_codes: Vec<i64> = labels.iter().map(|&l| l as i64).collect();
    df.with_column(Column::new(target.into(), label_codes))
        .with_context(|| format!("Failed to append label column '{}'", target))?;

    if config.integer_features {
        cast_features_to_integer(&mut df, &[])?;
        print_info("Cast all columns to integers");
    }
    print_success("Dataset encoded");

    let encode_elapsed = step_start.elapsed();
    print_step_time(encode_elapsed);

    // Step 3: Split and train
    print_step_header(3, "Train Model");
    let step_start = Instant::now();

    let x = FeatureMatrix::from_dataframe(&df, &[target])?;
    let split = train_test_split(x.n_rows(), config.test_size, config.seed)?;
    let x_train = x.select_rows(&split.train);
    let y_train = select_labels(&labels, &split.train);
    let x_test = x.select_rows(&split.test);
    let y_test = select_labels(&labels, &split.test);
    println!(
        "      Train rows: {}, test rows: {}",
        style(split.train.len()).yellow(),
        style(split.test.len()).yellow()
    );

    let model = LogisticRegression::fit(&x_train, &y_train, &config.train)?;
    if model.converged {
        print_success(&format!("Converged after {} iteration(s)", model.iterations));
    } else {
        print_warning(&format!(
            "Logistic regression did not converge within {} iterations",
            config.train.max_iter
        ));
    }

    let train_elapsed = step_start.elapsed();
    print_step_time(train_elapsed);

    // Step 4: Fairness evaluation
    print_step_header(4, "Fairness Evaluation");
    let step_start = Instant::now();
    let spinner = create_spinner("Deriving per-group thresholds...");
    let evaluation = evaluate_fairness(
        &model,
        &x_test,
        &y_test,
        &config.protected_attribute,
        &search,
        config.disparity_floor,
    )?;
    finish_with_success(&spinner, "Thresholds derived");
    println!(
        "      Test accuracy: {}",
        style(format!("{:.4}", evaluation.accuracy)).green().bold()
    );
    let evaluate_elapsed = step_start.elapsed();
    print_step_time(evaluate_elapsed);

    // Step 5: Artifacts
    print_step_header(5, "Write Artifacts");
    let step_start = Instant::now();
    let paths = ArtifactPaths::new(&config.output_dir);
    prepare_output_dir(&paths.dir)?;

    let spinner = create_spinner("Writing artifacts...");
    write_weights(&model, &paths.weights)?;
    write_label_encoders(&encoders, &paths.encoders)?;
    write_fairness_config(
        &FairnessConfig::from_evaluation(&evaluation, config.threshold_scale),
        &paths.fairness,
    )?;

    let card = ModelCard::new(&ModelCardParams {
        name: config.profile.model_name,
        description: config.profile.model_description,
        creator: config.profile.creator,
        inference_url: config.profile.inference_url,
        feature_names: &x.feature_names,
        test_accuracy: evaluation.accuracy,
    });
    write_model_card(&card, &paths.model_card)?;

    write_encoded_datasets(&mut df, config.small_rows, &paths)?;
    let mut calibration = take_rows(&df, &split.test)?;
    save_csv(&mut calibration, &paths.calibration)?;
    finish_with_success(&spinner, "Artifacts written");

    if config.bundle {
        let bundle = paths.bundle();
        package_artifacts(&paths.all(), &bundle)?;
        print_success(&format!("Bundled into {}", bundle.display()));
    } else {
        for path in paths.all() {
            println!("      {} {}", style("•").dim(), path.display());
        }
    }

    let save_elapsed = step_start.elapsed();
    print_step_time(save_elapsed);

    let mut summary = RunSummary::new(x.n_rows(), x.n_features());
    summary.encoded_columns = encoders.len();
    summary.set_split(split.train.len(), split.test.len());
    summary.set_training(model.iterations, model.converged);
    summary.set_evaluation(evaluation, config.threshold_scale);
    summary.load_time = load_elapsed + encode_elapsed;
    summary.train_time = train_elapsed;
    summary.evaluate_time = evaluate_elapsed;
    summary.save_time = save_elapsed;

    Ok(summary)
}

//! Run summary report

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::fairness::scale_threshold;
use crate::pipeline::FairnessEvaluation;

/// Summary of one training and threshold-derivation run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub rows: usize,
    pub features: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub encoded_columns: usize,
    pub iterations: usize,
    pub converged: bool,
    pub evaluation: Option<FairnessEvaluation>,
    pub threshold_scale: u64,
    pub load_time: Duration,
    pub train_time: Duration,
    pub evaluate_time: Duration,
    pub save_time: Duration,
}

impl RunSummary {
    pub fn new(rows: usize, features: usize) -> Self {
        Self {
            rows,
            features,
            ..Default::default()
        }
    }

    pub fn set_split(&mut self, train_rows: usize, test_rows: usize) {
        self.train_rows = train_rows;
        self.test_rows = test_rows;
    }

    pub fn set_training(&mut self, iterations: usize, converged: bool) {
        self.iterations = iterations;
        self.converged = converged;
    }

    pub fn set_evaluation(&mut self, evaluation: FairnessEvaluation, threshold_scale: u64) {
        self.evaluation = Some(evaluation);
        self.threshold_scale = threshold_scale;
    }

    pub fn total_time(&self) -> Duration {
        self.load_time + self.train_time + self.evaluate_time + self.save_time
    }

    /// Summary rendered as a two-column table
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Rows"), Cell::new(self.rows)]);
        table.add_row(vec![Cell::new("🔢 Features"), Cell::new(self.features)]);
        table.add_row(vec![
            Cell::new("🏷️  Encoded Columns"),
            Cell::new(self.encoded_columns),
        ]);
        table.add_row(vec![
            Cell::new("✂️  Train / Test"),
            Cell::new(format!("{} / {}", self.train_rows, self.test_rows)),
        ]);
        table.add_row(vec![
            Cell::new("🔁 Newton Iterations"),
            Cell::new(self.iterations).fg(if self.converged {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);

        if let Some(eval) = &self.evaluation {
            let m = &eval.metrics;
            let t = &eval.thresholds;

            table.add_row(vec![
                Cell::new("✅ Test Accuracy"),
                Cell::new(format!("{:.4}", eval.accuracy))
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold),
            ]);

            let dp_color = if m.demographic_parity > eval.target_disparity {
                Color::Red
            } else {
                Color::Green
            };
            table.add_row(vec![
                Cell::new("⚖️  Demographic Parity"),
                Cell::new(format!("{:.4}", m.demographic_parity)).fg(dp_color),
            ]);
            table.add_row(vec![
                Cell::new("⚖️  Equalized Odds"),
                Cell::new(format!("{:.4}", m.equalized_odds)),
            ]);
            table.add_row(vec![
                Cell::new("🎯 Target Disparity"),
                Cell::new(format!("{:.4}", eval.target_disparity)),
            ]);
            table.add_row(vec![
                Cell::new("📈 Operating FPR"),
                Cell::new(format!("{:.4} (TPR gap {:.4})", t.operating_fpr, t.tpr_gap)),
            ]);
            table.add_row(vec![
                Cell::new("🅰️  Threshold t_a"),
                Cell::new(format!("{:.4}", t.group_a)).fg(Color::Cyan),
            ]);
            table.add_row(vec![
                Cell::new("🅱️  Threshold t_b"),
                Cell::new(format!("{:.4}", t.group_b)).fg(Color::Cyan),
            ]);
        }

        table.add_row(vec![
            Cell::new("⏱️  Total Time"),
            Cell::new(format!("{:.2}s", self.total_time().as_secs_f64())),
        ]);

        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        // Indent the table
        for line in self.to_table().to_string().lines() {
            println!("    {}", line);
        }

        if let Some(eval) = &self.evaluation {
            let m = &eval.metrics;
            println!();
            println!(
                "    {} {}",
                style("📝").cyan(),
                style("GROUP RATES").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());
            println!(
                "      Protected attribute: {} (column {})",
                style(&eval.protected_attribute).yellow(),
                eval.protected_attribute_index
            );
            for (name, rates) in [("Group 0 (a)", &m.group_0), ("Group 1 (b)", &m.group_1)] {
                println!(
                    "        {} {}: n={} positive rate={:.4} TPR={:.4} FPR={:.4}",
                    style("•").dim(),
                    name,
                    rates.size,
                    rates.positive_rate,
                    rates.tpr,
                    rates.fpr
                );
            }
            println!(
                "      Scaled thresholds (scale {}): group_a={}, group_b={}",
                self.threshold_scale,
                scale_threshold(eval.thresholds.group_a, self.threshold_scale),
                scale_threshold(eval.thresholds.group_b, self.threshold_scale)
            );
        }
    }
}

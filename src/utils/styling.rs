//! Terminal styling utilities for the fairprep console output

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static SCALES: Emoji<'_, '_> = Emoji("⚖️  ", "");
pub static SPLIT: Emoji<'_, '_> = Emoji("✂️  ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
    ███████╗ █████╗ ██╗██████╗ ██████╗ ██████╗ ███████╗██████╗
    ██╔════╝██╔══██╗██║██╔══██╗██╔══██╗██╔══██╗██╔════╝██╔══██╗
    █████╗  ███████║██║██████╔╝██████╔╝██████╔╝█████╗  ██████╔╝
    ██╔══╝  ██╔══██║██║██╔══██╗██╔═══╝ ██╔══██╗██╔══╝  ██╔═══╝
    ██║     ██║  ██║██║██║  ██║██║     ██║  ██║███████╗██║
    ╚═╝     ╚═╝  ╚═╝╚═╝╚═╝  ╚═╝╚═╝     ╚═╝  ╚═╝╚══════╝╚═╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("⚖").magenta().bold(),
        style("Fairness-aware model artifacts").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Values shown on the configuration card
pub struct ConfigCard<'a> {
    pub input: &'a Path,
    pub target: &'a str,
    pub output: &'a Path,
    pub profile: &'a str,
    pub protected_attribute: &'a str,
    pub test_size: f64,
    pub disparity_floor: f64,
}

/// Print configuration card
pub fn print_config(card: &ConfigCard) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Input:  {:<39}│",
        FOLDER,
        truncate_path(card.input, 38)
    );
    println!(
        "    │  {} Target: {:<39}│",
        TARGET,
        truncate_string(card.target, 38)
    );
    println!(
        "    │  {} Output: {:<39}│",
        SAVE,
        truncate_path(card.output, 38)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  Profile:              {:<29}│",
        style(truncate_string(card.profile, 28)).yellow()
    );
    println!(
        "    │  {} Protected:          {:<26}│",
        SCALES,
        style(truncate_string(card.protected_attribute, 25)).yellow()
    );
    println!(
        "    │  {} Test size:          {:<26}│",
        SPLIT,
        style(format!("{:.0}%", card.test_size * 100.0)).yellow()
    );
    println!(
        "    │  Disparity floor:      {:<29}│",
        style(format!("{:.2}", card.disparity_floor)).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning to stderr
pub fn print_warning(message: &str) {
    eprintln!("    {} {}", style("⚠").yellow().bold(), style(message).yellow());
}

/// Print the elapsed time of a step
pub fn print_step_time(elapsed: Duration) {
    println!(
        "      {}",
        style(format!("⏱ {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion(output_dir: &Path) {
    println!();
    println!(
        "    {} {} {}",
        ROCKET,
        style("Artifacts written to").green().bold(),
        style(output_dir.display()).cyan()
    );
    println!();
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    truncate_string(&path.display().to_string(), max_len)
}

/// Shorten `s` to `max_len` characters, keeping the tail
pub fn truncate_string(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(count - max_len + 3).collect();
        format!("...{}", tail)
    }
}

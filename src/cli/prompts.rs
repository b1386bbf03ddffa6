//! Interactive prompts using dialoguer

use std::path::Path;

use anyhow::Result;
use dialoguer::Confirm;

/// Ask before writing into a directory that already holds files
pub fn confirm_overwrite(dir: &Path) -> Result<bool> {
    let message = format!(
        "Output directory {} is not empty. Overwrite existing artifacts?",
        dir.display()
    );
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()?;
    Ok(confirmed)
}

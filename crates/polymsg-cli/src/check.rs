//! Check command implementation

use crate::config::Config;
use crate::generate::{Batch, Inputs};
use anyhow::Result;

/// Load and project every message without writing anything
pub fn run(config: &Config, inputs: &Inputs) -> Result<()> {
    let batch = Batch::prepare(config, inputs)?;
    let report = batch.generate();

    println!(
        "Checked {} messages with {} backends",
        batch.loaded.messages.len(),
        batch.backends.len()
    );
    let problems = batch.report_problems(&report);
    if problems > 0 {
        anyhow::bail!("{problems} problem(s) found");
    }

    println!("✓ {} files would be generated", report.files.len());
    Ok(())
}

//! Report command - dataset distributions as text or JSON

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::report;

pub fn run(config: &Config, format: &str, output: Option<&Path>) -> Result<()> {
    let data_path = Path::new(&config.data_path);
    let (mut dataset, _) = Dataset::load(data_path)
        .with_context(|| format!("Failed to load dataset from {}", data_path.display()))?;
    dataset.estimate_power_levels();

    let summary = report::build_report(&dataset, 10, 50);
    let rendered = match format {
        "json" => report::render_json(&summary)?,
        _ => report::render_text(&summary),
    };

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote report to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

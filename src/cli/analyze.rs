//! Analyze command - the full pipeline in one pass
//!
//! Loads and cleans the dataset, estimates power levels, trains both models
//! in memory (nothing is saved; use `train` for that), and prints the
//! dataset summary alongside the model reports.

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::features::TfidfVectorizer;
use crate::predictor::{PowerPredictor, PowerTrainConfig, RolePredictor, RoleTrainConfig};
use crate::report;

pub fn run(config: &Config) -> Result<()> {
    let path = Path::new(&config.data_path);
    let (mut dataset, clean) = Dataset::load(path)
        .with_context(|| format!("Failed to load dataset from {}", path.display()))?;
    dataset.estimate_power_levels();

    println!(
        "\n{} Loaded {} characters from {}",
        style("✓").green().bold(),
        style(dataset.len()).cyan(),
        path.display()
    );
    if clean.duplicates_removed > 0 {
        println!(
            "  {} duplicate name(s) dropped ({} rows in the raw file)",
            clean.duplicates_removed, clean.total_input
        );
    }

    let summary = report::build_report(&dataset, 5, 15);
    println!("\n{}", report::render_text(&summary));

    // Train both models in memory for the report; bundles are not written
    let power_config = PowerTrainConfig {
        seed: config.seed,
        ..PowerTrainConfig::default()
    };
    let (_, power_report) =
        PowerPredictor::train(&dataset, &power_config).context("Power model training failed")?;
    println!("{} Power regressor", style("✓").green().bold());
    println!("  rmse              {:.3}", power_report.rmse);
    println!("  r2                {:.3}", power_report.r2);
    println!("  5-fold cv rmse    {:.3}", power_report.cv_rmse);

    let documents: Vec<&str> = dataset
        .records()
        .iter()
        .map(|r| r.powers_text.as_str())
        .collect();
    let vectorizer = TfidfVectorizer::fit(&documents, config.tfidf.min_df);
    let features = vectorizer.transform_all(&documents);
    let labels: Vec<String> = dataset
        .records()
        .iter()
        .map(|r| r.role_label.clone())
        .collect();

    let role_config = RoleTrainConfig {
        seed: config.seed,
        ..RoleTrainConfig::default()
    };
    let (_, role_report) =
        RolePredictor::train(&features, &labels, vectorizer.feature_names(), &role_config)
            .context("Role model training failed")?;
    println!("\n{} Role classifier", style("✓").green().bold());
    println!("  accuracy          {:.3}", role_report.accuracy);
    println!(
        "  5-fold cv acc     {:.3} ± {:.3}",
        role_report.cv_accuracy_mean, role_report.cv_accuracy_std
    );

    Ok(())
}

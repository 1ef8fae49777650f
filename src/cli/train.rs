//! Train command - fit both models and save their bundles

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::features::TfidfVectorizer;
use crate::predictor::{PowerPredictor, PowerTrainConfig, RolePredictor, RoleTrainConfig};

pub const POWER_BUNDLE: &str = "power_predictor.json";
pub const ROLE_BUNDLE: &str = "role_predictor.json";

pub fn run(config: &Config, model_dir: Option<&Path>, seed: Option<u64>) -> Result<()> {
    let data_path = Path::new(&config.data_path);
    let (mut dataset, _) = Dataset::load(data_path)
        .with_context(|| format!("Failed to load dataset from {}", data_path.display()))?;
    dataset.estimate_power_levels();

    let model_dir = model_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Path::new(&config.model_dir).to_path_buf());
    let seed = seed.unwrap_or(config.seed);

    // --- Power regressor ---
    let power_config = PowerTrainConfig {
        seed,
        ..PowerTrainConfig::default()
    };
    let (power, power_report) = PowerPredictor::train(&dataset, &power_config)
        .context("Power model training failed")?;
    let power_path = model_dir.join(POWER_BUNDLE);
    power.save(&power_path)?;

    println!("\n{} Power regressor", style("✓").green().bold());
    println!("  train/test        {} / {}", power_report.train_size, power_report.test_size);
    println!("  rmse              {:.3}", power_report.rmse);
    println!("  r2                {:.3}", power_report.r2);
    println!("  5-fold cv rmse    {:.3}", power_report.cv_rmse);
    println!("  saved             {}", power_path.display());

    let mut importance: Vec<_> = power_report.feature_importance.iter().collect();
    importance.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
    println!("  top features:");
    for (name, weight) in importance.iter().take(5) {
        println!("    {name:<24} {weight:.3}");
    }

    // --- Role classifier ---
    let documents: Vec<&str> = dataset.records().iter().map(|r| r.powers_text.as_str()).collect();
    let vectorizer = TfidfVectorizer::fit(&documents, config.tfidf.min_df);
    let features = vectorizer.transform_all(&documents);
    let labels: Vec<String> = dataset.records().iter().map(|r| r.role_label.clone()).collect();

    let role_config = RoleTrainConfig {
        seed,
        ..RoleTrainConfig::default()
    };
    let (role, role_report) = RolePredictor::train(
        &features,
        &labels,
        vectorizer.feature_names(),
        &role_config,
    )
    .context("Role model training failed")?;
    let role_path = model_dir.join(ROLE_BUNDLE);
    role.save(vectorizer, &role_path)?;

    println!("\n{} Role classifier", style("✓").green().bold());
    println!("  train/test        {} / {}", role_report.train_size, role_report.test_size);
    println!("  accuracy          {:.3}", role_report.accuracy);
    println!(
        "  5-fold cv acc     {:.3} ± {:.3}",
        role_report.cv_accuracy_mean, role_report.cv_accuracy_std
    );
    println!("  saved             {}", role_path.display());

    println!("  per-class:");
    for (class, metrics) in &role_report.classification_report {
        println!(
            "    {class:<12} precision {:.2}  recall {:.2}  f1 {:.2}  (n={})",
            metrics.precision, metrics.recall, metrics.f1, metrics.support
        );
    }

    Ok(())
}

//! Predict commands - one-off power and role predictions from the terminal

use anyhow::{bail, Context, Result};
use console::style;
use std::path::Path;

use crate::config::Config;
use crate::models::{title_case, PowerLevel};
use crate::predictor::{weighted_power_score, PowerAttributes, PowerPredictor, RolePredictor};

use super::train::{POWER_BUNDLE, ROLE_BUNDLE};

pub struct PowerArgs {
    pub strength: Option<f64>,
    pub speed: Option<f64>,
    pub durability: Option<f64>,
    pub intelligence: Option<f64>,
    pub energy_projection: Option<f64>,
    pub fighting_skills: Option<f64>,
    pub role: Option<String>,
    pub estimated_level: Option<String>,
}

pub fn run_power(config: &Config, args: PowerArgs, model_dir: Option<&Path>) -> Result<()> {
    let score = match (&args.role, collect_attrs(&args)) {
        (None, Some(attrs)) => weighted_power_score(&attrs),
        (Some(role), None) => {
            let estimated = args
                .estimated_level
                .as_deref()
                .context("--estimated-level is required with --role")?;
            let bucket = parse_level(estimated)?;
            let bundle = resolve_model_dir(config, model_dir).join(POWER_BUNDLE);
            let predictor = PowerPredictor::load(&bundle)
                .context("No trained power model found. Run `powerverse train` first.")?;
            predictor.predict_power_level(&title_case(role), bucket)?
        }
        _ => bail!(
            "Provide all six attributes (--strength, --speed, --durability, --intelligence, \
             --energy-projection, --fighting-skills) or --role with --estimated-level"
        ),
    };

    println!(
        "\n{} Power level: {} ({})",
        style("⚡").bold(),
        style(format!("{:.2}", score)).cyan().bold(),
        PowerLevel::from_score(score)
    );
    Ok(())
}

pub fn run_role(config: &Config, text: &str, model_dir: Option<&Path>) -> Result<()> {
    let bundle = resolve_model_dir(config, model_dir).join(ROLE_BUNDLE);
    let (predictor, vectorizer) = RolePredictor::load(&bundle)
        .context("No trained role model found. Run `powerverse train` first.")?;

    let (label, proba) = predictor.predict_role_from_text(text, &vectorizer)?;

    println!("\n{} Predicted role: {}", style("✓").green().bold(), style(&label).cyan().bold());
    let mut ranked: Vec<_> = proba.iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
    for (class, p) in ranked {
        println!("  {class:<12} {:.1}%", p * 100.0);
    }
    Ok(())
}

fn collect_attrs(args: &PowerArgs) -> Option<PowerAttributes> {
    Some(PowerAttributes {
        strength: args.strength?,
        speed: args.speed?,
        durability: args.durability?,
        intelligence: args.intelligence?,
        energy_projection: args.energy_projection?,
        fighting_skills: args.fighting_skills?,
    })
}

fn resolve_model_dir(config: &Config, model_dir: Option<&Path>) -> std::path::PathBuf {
    model_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Path::new(&config.model_dir).to_path_buf())
}

/// Accept either a bucket label ("High", "Medium", "Low") or a numeric
/// 1-10 score for `--estimated-level`.
fn parse_level(value: &str) -> Result<PowerLevel> {
    if let Some(level) = PowerLevel::parse(value) {
        return Ok(level);
    }
    match value.parse::<f64>() {
        Ok(score) => Ok(PowerLevel::from_score(score)),
        Err(_) => bail!("--estimated-level must be High, Medium, Low, or a 1-10 score"),
    }
}

//! CLI command definitions and handlers

mod analyze;
mod network;
mod predict;
mod report;
mod serve;
mod train;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::{load_config, Config};

/// Powerverse - Marvel character analysis
#[derive(Parser, Debug)]
#[command(name = "powerverse")]
#[command(
    version,
    about = "Marvel character analysis — power prediction, role classification, and affiliation networks",
    after_help = "\
Examples:
  powerverse analyze                       Load, clean, and summarize the dataset
  powerverse train                         Train the power and role models
  powerverse predict-power --strength 9 --speed 7 --durability 8 \\
      --intelligence 6 --energy-projection 5 --fighting-skills 7
  powerverse predict-role --text \"telepathy and telekinesis\"
  powerverse network --character \"Iron Man\"
  powerverse network --export network.json
  powerverse report --format json
  powerverse serve --port 8000"
)]
pub struct Cli {
    /// Path to the character CSV (overrides powerverse.toml)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and clean the dataset, then print a summary
    Analyze,

    /// Train the power regressor and role classifier, saving model bundles
    #[command(after_help = "\
Examples:
  powerverse train                         Train with defaults (seed 42)
  powerverse train --seed 7                Different split/target seed
  powerverse train --model-dir /tmp/m      Save bundles elsewhere")]
    Train {
        /// Directory for saved model bundles (overrides powerverse.toml)
        #[arg(long)]
        model_dir: Option<PathBuf>,

        /// Random seed for splits and synthetic targets
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Predict a power level from six attributes, or from role + power bucket
    #[command(name = "predict-power", after_help = "\
Examples:
  powerverse predict-power --strength 9 --speed 7 --durability 8 \\
      --intelligence 6 --energy-projection 5 --fighting-skills 7
  powerverse predict-power --role hero --estimated-level High")]
    PredictPower {
        #[arg(long)]
        strength: Option<f64>,
        #[arg(long)]
        speed: Option<f64>,
        #[arg(long)]
        durability: Option<f64>,
        #[arg(long)]
        intelligence: Option<f64>,
        #[arg(long)]
        energy_projection: Option<f64>,
        #[arg(long)]
        fighting_skills: Option<f64>,

        /// Role label for the model-based form (e.g. hero, villain)
        #[arg(long, conflicts_with_all = ["strength", "speed", "durability", "intelligence", "energy_projection", "fighting_skills"])]
        role: Option<String>,

        /// Estimated power level for the model-based form: High, Medium,
        /// Low, or a 1-10 score
        #[arg(long, requires = "role")]
        estimated_level: Option<String>,

        /// Directory holding saved model bundles
        #[arg(long)]
        model_dir: Option<PathBuf>,
    },

    /// Classify a powers description as Hero, Villain, or Antihero
    #[command(name = "predict-role")]
    PredictRole {
        /// Free-text powers description
        #[arg(long)]
        text: String,

        /// Directory holding saved model bundles
        #[arg(long)]
        model_dir: Option<PathBuf>,
    },

    /// Build the affiliation network and query it
    Network {
        /// Show the connections of one character
        #[arg(long)]
        character: Option<String>,

        /// How many most-connected characters to list
        #[arg(long, default_value = "5")]
        top: usize,

        /// Write the network as JSON to this path
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Summarize the dataset (distributions, affiliations, word frequencies)
    Report {
        /// Output format
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Write output to this path instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Start the REST API server
    Serve {
        /// Bind host (overrides powerverse.toml)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides powerverse.toml)
        #[arg(long)]
        port: Option<u16>,

        /// Directory holding saved model bundles
        #[arg(long)]
        model_dir: Option<PathBuf>,
    },
}

/// Resolve config from powerverse.toml in the working directory, applying
/// the global `--data` override.
fn resolve_config(cli: &Cli) -> Config {
    let mut config = load_config(std::path::Path::new("."));
    if let Some(data) = &cli.data {
        config.data_path = data.display().to_string();
    }
    config
}

pub fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli);

    match cli.command {
        Commands::Analyze => analyze::run(&config),

        Commands::Train { model_dir, seed } => train::run(&config, model_dir.as_deref(), seed),

        Commands::PredictPower {
            strength,
            speed,
            durability,
            intelligence,
            energy_projection,
            fighting_skills,
            role,
            estimated_level,
            model_dir,
        } => predict::run_power(
            &config,
            predict::PowerArgs {
                strength,
                speed,
                durability,
                intelligence,
                energy_projection,
                fighting_skills,
                role,
                estimated_level,
            },
            model_dir.as_deref(),
        ),

        Commands::PredictRole { text, model_dir } => {
            predict::run_role(&config, &text, model_dir.as_deref())
        }

        Commands::Network {
            character,
            top,
            export,
        } => network::run(&config, character.as_deref(), top, export.as_deref()),

        Commands::Report { format, output } => report::run(&config, &format, output.as_deref()),

        Commands::Serve {
            host,
            port,
            model_dir,
        } => serve::run(&config, host, port, model_dir.as_deref()),
    }
}

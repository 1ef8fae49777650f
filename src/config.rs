//! Project configuration support
//!
//! Loads optional configuration from a `powerverse.toml` file in the working
//! directory. Every field has a default, so the file is never required; a
//! malformed file logs a warning and falls back to defaults rather than
//! aborting.
//!
//! # Configuration Format
//!
//! ```toml
//! # powerverse.toml
//!
//! data_path = "data/characters.csv"
//! model_dir = "models"
//! seed = 42
//!
//! [tfidf]
//! min_df = 2
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//! ```

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Default random seed used for splits, synthetic targets, and layout.
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path to the character CSV dataset
    pub data_path: String,
    /// Directory where model bundles are saved and loaded
    pub model_dir: String,
    /// Random seed for all seeded operations
    pub seed: u64,
    pub tfidf: TfidfConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TfidfConfig {
    /// Minimum document frequency for a term to be kept
    pub min_df: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: "data/characters.csv".to_string(),
            model_dir: "models".to_string(),
            seed: DEFAULT_SEED,
            tfidf: TfidfConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self { min_df: 2 }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Load configuration from `<dir>/powerverse.toml`, falling back to defaults
/// when the file is absent or malformed.
pub fn load_config(dir: &Path) -> Config {
    let path = dir.join("powerverse.toml");
    if !path.exists() {
        debug!("No powerverse.toml found, using defaults");
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str::<Config>(&contents) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Failed to parse {}: {e}. Using defaults.", path.display());
                Config::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {e}. Using defaults.", path.display());
            Config::default()
        }
    }
}

//! Serve command - run the REST API

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::api::{self, AppState};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::predictor::{PowerPredictor, PowerTrainConfig};

use super::train::POWER_BUNDLE;

/// Start the API server.
///
/// The power model is loaded from a saved bundle when one exists; otherwise
/// it is trained on the loaded dataset at startup so the server always has a
/// usable model.
pub fn run(
    config: &Config,
    host: Option<String>,
    port: Option<u16>,
    model_dir: Option<&Path>,
) -> Result<()> {
    let data_path = Path::new(&config.data_path);
    let (mut dataset, _) = Dataset::load(data_path)
        .with_context(|| format!("Failed to load dataset from {}", data_path.display()))?;
    dataset.estimate_power_levels();
    info!(characters = dataset.len(), "Dataset loaded");

    let model_dir = model_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Path::new(&config.model_dir).to_path_buf());
    let bundle_path = model_dir.join(POWER_BUNDLE);

    let predictor = if bundle_path.exists() {
        info!(path = %bundle_path.display(), "Loading power model bundle");
        PowerPredictor::load(&bundle_path)?
    } else {
        info!("No saved power model, training at startup");
        let train_config = PowerTrainConfig {
            seed: config.seed,
            ..PowerTrainConfig::default()
        };
        let (predictor, _) = PowerPredictor::train(&dataset, &train_config)?;
        predictor
    };

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid bind address {host}:{port}"))?;

    let state = AppState::new(dataset, predictor);

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    rt.block_on(api::serve(state, addr))?;
    Ok(())
}

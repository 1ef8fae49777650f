//! Network command - build and query the affiliation graph

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::network::AffiliationNetwork;

pub fn run(
    config: &Config,
    character: Option<&str>,
    top: usize,
    export: Option<&Path>,
) -> Result<()> {
    let data_path = Path::new(&config.data_path);
    let (mut dataset, _) = Dataset::load(data_path)
        .with_context(|| format!("Failed to load dataset from {}", data_path.display()))?;
    dataset.estimate_power_levels();

    let mut network = AffiliationNetwork::new(config.seed);
    network.build(&dataset);

    println!(
        "\n{} Network: {} characters, {} connections",
        style("✓").green().bold(),
        network.node_count(),
        network.edge_count()
    );

    if let Some(name) = character {
        let connections = network.connections(name)?;
        println!("\n{} connects to {} character(s):", style(name).cyan().bold(), connections.len());
        for other in connections {
            println!("  {other}");
        }
    } else {
        println!("\nMost connected:");
        for (name, degree) in network.most_connected(top)? {
            println!("  {name:<24} {degree}");
        }
    }

    if let Some(path) = export {
        network.export(path)?;
        println!("\nExported to {}", path.display());
    }

    Ok(())
}

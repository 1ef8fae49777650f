//! Affiliation graph construction and queries
//!
//! Nodes are characters, edges connect characters sharing a non-empty
//! affiliation value. Edges are formed pairwise within each affiliation
//! group — O(k²) per group of size k, fine at the hundreds-of-records scale
//! this dataset lives at; large affiliation groups would need a different
//! representation.

use std::collections::HashMap;
use std::path::Path;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use tracing::info;

use super::layout::spring_layout;
use crate::dataset::Dataset;
use crate::error::{PowerverseError, Result};

/// Node payload: the character attributes carried into the export
#[derive(Debug, Clone, Serialize)]
pub struct CharacterNode {
    pub name: String,
    pub role: String,
    pub affiliation: String,
    pub power_level: String,
}

#[derive(Debug, Serialize)]
pub struct NodeJson {
    pub id: String,
    pub role: String,
    pub affiliation: String,
    pub power_level: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Serialize)]
pub struct LinkJson {
    pub source: String,
    pub target: String,
    pub affiliation: String,
}

/// Export payload: `{nodes: [...], links: [...]}`
#[derive(Debug, Serialize)]
pub struct NetworkJson {
    pub nodes: Vec<NodeJson>,
    pub links: Vec<LinkJson>,
}

/// The character affiliation network
#[derive(Debug, Default)]
pub struct AffiliationNetwork {
    graph: UnGraph<CharacterNode, String>,
    index: HashMap<String, NodeIndex>,
    positions: Vec<(f64, f64)>,
    seed: u64,
}

impl AffiliationNetwork {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Rebuild the graph in full from the current record set.
    ///
    /// Any previous graph state is discarded; there is no incremental edge
    /// maintenance. A pair sharing several affiliations still gets a single
    /// edge, last write wins on the edge attribute. No self-loops can form
    /// because pairs are enumerated strictly i < j.
    pub fn build(&mut self, dataset: &Dataset) -> &mut Self {
        self.graph.clear();
        self.index.clear();

        for record in dataset.records() {
            let idx = self.graph.add_node(CharacterNode {
                name: record.name.clone(),
                role: record.role_label.clone(),
                affiliation: record.affiliation.clone(),
                power_level: record.power_level.to_string(),
            });
            self.index.insert(record.name.clone(), idx);
        }

        // Group members per affiliation, in record order
        let mut groups: Vec<(String, Vec<NodeIndex>)> = Vec::new();
        for record in dataset.records() {
            if record.affiliation.is_empty() {
                continue;
            }
            let idx = self.index[&record.name];
            match groups.iter_mut().find(|(a, _)| *a == record.affiliation) {
                Some((_, members)) => members.push(idx),
                None => groups.push((record.affiliation.clone(), vec![idx])),
            }
        }

        for (affiliation, members) in &groups {
            for i in 0..members.len() {
                for j in (i + 1)..members.len() {
                    self.graph
                        .update_edge(members[i], members[j], affiliation.clone());
                }
            }
        }

        let edges: Vec<(usize, usize)> = self
            .graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
            .collect();
        self.positions = spring_layout(self.graph.node_count(), &edges, self.seed);

        info!(
            "Built affiliation network: {} nodes, {} edges across {} affiliations",
            self.graph.node_count(),
            self.graph.edge_count(),
            groups.len()
        );
        self
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Characters directly connected to `name`.
    pub fn connections(&self, name: &str) -> Result<Vec<String>> {
        let &idx = self.index.get(name).ok_or_else(|| {
            PowerverseError::NotFound(format!("character '{name}' not found in the graph"))
        })?;
        Ok(self
            .graph
            .neighbors(idx)
            .map(|n| self.graph[n].name.clone())
            .collect())
    }

    /// Characters ranked by descending connection count. Ties keep the
    /// original insertion order.
    pub fn most_connected(&self, top_n: usize) -> Result<Vec<(String, usize)>> {
        if self.graph.node_count() == 0 {
            return Err(PowerverseError::EmptyGraph);
        }

        let mut degrees: Vec<(String, usize)> = self
            .graph
            .node_indices()
            .map(|idx| (self.graph[idx].name.clone(), self.graph.edges(idx).count()))
            .collect();
        degrees.sort_by(|a, b| b.1.cmp(&a.1)); // stable sort keeps insertion order on ties
        degrees.truncate(top_n);
        Ok(degrees)
    }

    /// Build the `{nodes, links}` export payload.
    pub fn to_json(&self) -> Result<NetworkJson> {
        if self.graph.node_count() == 0 {
            return Err(PowerverseError::EmptyGraph);
        }

        let nodes = self
            .graph
            .node_indices()
            .map(|idx| {
                let node = &self.graph[idx];
                let (x, y) = self.positions.get(idx.index()).copied().unwrap_or((0.5, 0.5));
                NodeJson {
                    id: node.name.clone(),
                    role: node.role.clone(),
                    affiliation: node.affiliation.clone(),
                    power_level: node.power_level.clone(),
                    x,
                    y,
                }
            })
            .collect();

        let links = self
            .graph
            .edge_references()
            .map(|e| LinkJson {
                source: self.graph[e.source()].name.clone(),
                target: self.graph[e.target()].name.clone(),
                affiliation: e.weight().clone(),
            })
            .collect();

        Ok(NetworkJson { nodes, links })
    }

    /// Serialize the export payload to a JSON file.
    pub fn export(&self, path: &Path) -> Result<()> {
        let payload = self.to_json()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(&payload)?)?;
        info!("Network data exported to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::test_fixtures::record;
    use crate::models::Role;

    fn build_sample() -> AffiliationNetwork {
        let dataset = Dataset::from_records(vec![
            record("Iron Man", Role::Hero, "Avengers", "Powered armor"),
            record("Thor", Role::Hero, "Avengers", "God of Thunder"),
            record("Wolverine", Role::Antihero, "X-Men", "Regeneration"),
            record("Blade", Role::Antihero, "", "Vampire hunter"),
        ]);
        let mut network = AffiliationNetwork::new(42);
        network.build(&dataset);
        network
    }

    #[test]
    fn test_shared_affiliation_forms_edge() {
        let network = build_sample();
        assert_eq!(network.node_count(), 4);
        assert_eq!(network.edge_count(), 1);
        assert_eq!(network.connections("Iron Man").unwrap(), vec!["Thor"]);
    }

    #[test]
    fn test_unaffiliated_and_solo_groups_have_no_edges() {
        let network = build_sample();
        // Empty affiliation never connects
        assert!(network.connections("Blade").unwrap().is_empty());
        // A one-member affiliation has no pair to connect
        assert!(network.connections("Wolverine").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_character_is_not_found() {
        let network = build_sample();
        let err = network.connections("Galactus").unwrap_err();
        assert!(matches!(err, PowerverseError::NotFound(_)));
    }

    #[test]
    fn test_edge_carries_affiliation() {
        let network = build_sample();
        let json = network.to_json().unwrap();
        assert_eq!(json.links.len(), 1);
        assert_eq!(json.links[0].affiliation, "Avengers");
        let pair = [json.links[0].source.as_str(), json.links[0].target.as_str()];
        assert!(pair.contains(&"Iron Man"));
        assert!(pair.contains(&"Thor"));
    }

    #[test]
    fn test_most_connected_ranking_and_ties() {
        // A-B share a team, C is alone: degrees 1, 1, 0.
        let dataset = Dataset::from_records(vec![
            record("A", Role::Hero, "Team 1", ""),
            record("B", Role::Hero, "Team 1", ""),
            record("C", Role::Hero, "Team 2", ""),
        ]);
        let mut network = AffiliationNetwork::new(42);
        network.build(&dataset);

        let top = network.most_connected(2).unwrap();
        assert_eq!(top.len(), 2);
        // A and B tie at degree 1; insertion order breaks the tie
        assert_eq!(top[0], ("A".to_string(), 1));
        assert_eq!(top[1], ("B".to_string(), 1));
    }

    #[test]
    fn test_triangle_degrees() {
        let dataset = Dataset::from_records(vec![
            record("A", Role::Hero, "Avengers", ""),
            record("B", Role::Hero, "Avengers", ""),
            record("C", Role::Hero, "Avengers", ""),
        ]);
        let mut network = AffiliationNetwork::new(42);
        network.build(&dataset);
        assert_eq!(network.edge_count(), 3);
        let top = network.most_connected(10).unwrap();
        assert!(top.iter().all(|(_, d)| *d == 2));
    }

    #[test]
    fn test_empty_graph_operations_fail() {
        let network = AffiliationNetwork::new(42);
        assert!(matches!(
            network.most_connected(5).unwrap_err(),
            PowerverseError::EmptyGraph
        ));
        assert!(matches!(
            network.to_json().unwrap_err(),
            PowerverseError::EmptyGraph
        ));
    }

    #[test]
    fn test_export_writes_nodes_for_every_record() {
        let network = build_sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network.json");
        network.export(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed["nodes"].as_array().unwrap().len(), 4);
        assert_eq!(parsed["links"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_rebuild_resets_state() {
        let mut network = build_sample();
        let smaller = Dataset::from_records(vec![record("Solo", Role::Hero, "", "")]);
        network.build(&smaller);
        assert_eq!(network.node_count(), 1);
        assert_eq!(network.edge_count(), 0);
        assert!(network.connections("Iron Man").is_err());
    }
}

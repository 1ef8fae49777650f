//! Character affiliation network
//!
//! An undirected petgraph graph connecting characters who share an
//! affiliation, with a seeded force-directed layout for rendering and a
//! `{nodes, links}` JSON export consumed by the front-end.

mod builder;
mod layout;

pub use builder::{AffiliationNetwork, NetworkJson};
pub use layout::spring_layout;

//! Powerverse - Marvel character analysis
//!
//! Cleans a character roster CSV, estimates coarse power levels from powers
//! free text, trains gradient-boosted models for power regression and role
//! classification, builds an affiliation network with a deterministic layout,
//! and serves the results over a small REST API.

pub mod api;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod models;
pub mod network;
pub mod predictor;
pub mod report;

pub use error::{PowerverseError, Result};

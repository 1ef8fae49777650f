//! Predictive models
//!
//! Two GBDT-backed models plus their shared plumbing:
//!
//! - [`PowerPredictor`]: regression from `{role, power level}` one-hots to a
//!   1-10 power score (synthetic target, see the module docs for the caveat)
//! - [`RolePredictor`]: one-vs-rest classification of Hero/Villain/Antihero
//!   from TF-IDF powers text
//!
//! Both persist as atomic bundles: model + scaler/vectorizer + feature-name
//! schema in a single file, verified on load.

pub mod bundle;
pub mod metrics;
mod power;
mod role;
mod split;

pub use metrics::ClassMetrics;
pub use power::{
    weighted_power_score, PowerAttributes, PowerPredictor, PowerTrainConfig, PowerTrainReport,
};
pub use role::{RolePredictor, RoleTrainConfig, RoleTrainReport};
pub use split::{k_fold, stratified_k_fold, stratified_split, train_test_split};

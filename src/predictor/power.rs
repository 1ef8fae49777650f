//! Power level regression
//!
//! Trains a GBDT regressor mapping one-hot `{role label, power level}`
//! features to a 1-10 power score.
//!
//! No ground-truth numeric score exists in the source data, so the training
//! target is synthesized from (role, power level) bucket membership with a
//! seeded uniform draw per bucket. The model therefore reproduces a heuristic
//! fabricated from its own input features — it cannot outperform that
//! heuristic, and its scores are illustrative rather than measured. This
//! circularity is inherited from the source system and kept on purpose.
//!
//! The six-attribute weighted average (`weighted_power_score`) is a separate,
//! stateless path used directly by the serving layer; it never touches the
//! trained model.

use std::collections::BTreeMap;
use std::path::Path;

use gbdt::config::Config as GbdtConfig;
use gbdt::decision_tree::Data;
use gbdt::gradient_boost::GBDT;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::bundle;
use super::metrics;
use super::split;
use crate::dataset::Dataset;
use crate::error::{PowerverseError, Result};
use crate::features::{CategoricalEncoder, StandardScaler};
use crate::models::{CharacterRecord, PowerLevel, Role};

// ---------------------------------------------------------------------------
// Six-attribute weighted average (stateless serving path)
// ---------------------------------------------------------------------------

/// Numeric character attributes, each nominally in [1, 10] (not validated).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerAttributes {
    pub strength: f64,
    pub speed: f64,
    pub durability: f64,
    pub intelligence: f64,
    pub energy_projection: f64,
    pub fighting_skills: f64,
}

/// Weighted average of the six attributes, clamped to [1, 10].
///
/// Weights: strength 1.2, speed 1.0, durability 1.1, intelligence 1.3,
/// energy projection 1.1, fighting skills 0.9. Stored in tenths so that
/// equal inputs produce an exact result (all-fives gives exactly 5.0).
pub fn weighted_power_score(attrs: &PowerAttributes) -> f64 {
    const WEIGHTS_X10: [f64; 6] = [12.0, 10.0, 11.0, 13.0, 11.0, 9.0];
    const TOTAL_X10: f64 = 66.0;

    let values = [
        attrs.strength,
        attrs.speed,
        attrs.durability,
        attrs.intelligence,
        attrs.energy_projection,
        attrs.fighting_skills,
    ];
    let weighted: f64 = values
        .iter()
        .zip(WEIGHTS_X10)
        .map(|(v, w)| v * w)
        .sum();

    (weighted / TOTAL_X10).clamp(1.0, 10.0)
}

// ---------------------------------------------------------------------------
// Training configuration and report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PowerTrainConfig {
    /// Held-out proportion for evaluation
    pub test_size: f64,
    pub seed: u64,
    /// Number of boosting iterations
    pub num_trees: usize,
    pub max_depth: u32,
    pub learning_rate: f64,
}

impl Default for PowerTrainConfig {
    fn default() -> Self {
        Self {
            test_size: 0.3,
            seed: crate::config::DEFAULT_SEED,
            num_trees: 100,
            max_depth: 4,
            learning_rate: 0.1,
        }
    }
}

/// Evaluation metrics from a training run
#[derive(Debug, Clone, Serialize)]
pub struct PowerTrainReport {
    pub mse: f64,
    pub rmse: f64,
    pub r2: f64,
    /// Root-MSE averaged over seeded 5-fold cross-validation
    pub cv_rmse: f64,
    /// Permutation importance per feature column, normalized to sum to 1
    pub feature_importance: BTreeMap<String, f64>,
    pub train_size: usize,
    pub test_size: usize,
}

// ---------------------------------------------------------------------------
// Predictor
// ---------------------------------------------------------------------------

/// Trained power regressor. Serializes as one bundle: model, fitted scaler,
/// fitted encoder, and the feature-name schema travel together.
#[derive(Serialize, Deserialize)]
pub struct PowerPredictor {
    schema_version: u32,
    feature_names: Vec<String>,
    encoder: CategoricalEncoder,
    scaler: StandardScaler,
    model: GBDT,
}

impl std::fmt::Debug for PowerPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerPredictor")
            .field("schema_version", &self.schema_version)
            .field("feature_names", &self.feature_names)
            .finish_non_exhaustive()
    }
}

impl PowerPredictor {
    /// Train on a cleaned dataset with estimated power levels.
    pub fn train(
        dataset: &Dataset,
        config: &PowerTrainConfig,
    ) -> Result<(Self, PowerTrainReport)> {
        let records = dataset.records();
        if records.len() < 4 {
            return Err(PowerverseError::Validation(format!(
                "need at least 4 records to train, got {}",
                records.len()
            )));
        }

        let encoder = CategoricalEncoder::fit(records);
        let feature_names = encoder.feature_names();
        let raw = encoder.transform_all(records);
        let targets = synthetic_targets(records, config.seed);

        let scaler = StandardScaler::fit(&raw);
        let scaled = scaler.transform_all(&raw);

        let (train_idx, test_idx) = split::train_test_split(records.len(), config.test_size, config.seed);
        let train_rows: Vec<Vec<f64>> = train_idx.iter().map(|&i| scaled[i].clone()).collect();
        let train_targets: Vec<f64> = train_idx.iter().map(|&i| targets[i]).collect();
        let test_rows: Vec<Vec<f64>> = test_idx.iter().map(|&i| scaled[i].clone()).collect();
        let test_targets: Vec<f64> = test_idx.iter().map(|&i| targets[i]).collect();

        let model = fit_regressor(&train_rows, &train_targets, config)?;

        let predicted = predict_rows(&model, &test_rows);
        let mse = metrics::mse(&test_targets, &predicted);
        let r2 = metrics::r2(&test_targets, &predicted);

        let cv_rmse = cross_validated_rmse(&scaled, &targets, config)?;
        let feature_importance = permutation_importance(
            &model,
            &test_rows,
            &test_targets,
            &feature_names,
            config.seed,
        );

        info!(
            "Power regressor trained: rmse={:.3} r2={:.3} cv_rmse={:.3} ({} train / {} test)",
            mse.sqrt(),
            r2,
            cv_rmse,
            train_rows.len(),
            test_rows.len()
        );

        let report = PowerTrainReport {
            mse,
            rmse: mse.sqrt(),
            r2,
            cv_rmse,
            feature_importance,
            train_size: train_rows.len(),
            test_size: test_rows.len(),
        };

        Ok((
            Self {
                schema_version: bundle::SCHEMA_VERSION,
                feature_names,
                encoder,
                scaler,
                model,
            },
            report,
        ))
    }

    /// Predict one score per record, in record order. Not clamped; the
    /// model's own output range applies.
    pub fn predict(&self, dataset: &Dataset) -> Result<Vec<f64>> {
        let raw = self.encoder.transform_all(dataset.records());
        self.check_width(&raw)?;
        let scaled = self.scaler.transform_all(&raw);
        Ok(predict_rows(&self.model, &scaled))
    }

    /// Single-record convenience path, clamped to [1, 10].
    pub fn predict_power_level(&self, role_label: &str, power_level: PowerLevel) -> Result<f64> {
        let raw = self.encoder.encode(role_label, &power_level.to_string());
        let scaled = self.scaler.transform(&raw);
        let data = vec![Data::new_test_data(to_f32(&scaled), None)];
        let score = self.model.predict(&data).first().copied().unwrap_or(0.0) as f64;
        Ok(score.clamp(1.0, 10.0))
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Persist the full bundle (model + scaler + encoder + feature schema).
    pub fn save(&self, path: &Path) -> Result<()> {
        bundle::save(self, path)
    }

    /// Load a bundle, verifying its schema version and that the stored
    /// feature list still matches the paired encoder.
    pub fn load(path: &Path) -> Result<Self> {
        let predictor: Self = bundle::load(path)?;
        bundle::check_version(predictor.schema_version)?;
        bundle::check_feature_names(&predictor.feature_names, &predictor.encoder.feature_names())?;
        Ok(predictor)
    }

    fn check_width(&self, rows: &[Vec<f64>]) -> Result<()> {
        if let Some(row) = rows.first() {
            if row.len() != self.feature_names.len() {
                return Err(PowerverseError::SchemaMismatch(format!(
                    "model expects {} feature columns, input has {}",
                    self.feature_names.len(),
                    row.len()
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Synthetic targets
// ---------------------------------------------------------------------------

/// Draw a synthetic power score per record from its (role, level) bucket.
fn synthetic_targets(records: &[CharacterRecord], seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    records
        .iter()
        .map(|r| {
            let (lo, hi) = match (r.role, r.power_level) {
                (Role::Hero, PowerLevel::High) => (8.0, 10.0),
                (Role::Hero, PowerLevel::Medium) => (6.0, 8.0),
                (Role::Hero, PowerLevel::Low) => (4.0, 6.0),
                (Role::Villain, PowerLevel::High) => (7.0, 9.0),
                (Role::Villain, PowerLevel::Medium) => (5.0, 7.0),
                (Role::Villain, PowerLevel::Low) => (3.0, 5.0),
                _ => (1.0, 4.0),
            };
            rng.random_range(lo..hi)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// GBDT plumbing
// ---------------------------------------------------------------------------

#[inline]
fn to_f32(row: &[f64]) -> Vec<f32> {
    row.iter().map(|&v| v as f32).collect()
}

fn fit_regressor(rows: &[Vec<f64>], targets: &[f64], config: &PowerTrainConfig) -> Result<GBDT> {
    if rows.is_empty() {
        return Err(PowerverseError::Model("no training rows".to_string()));
    }

    let mut cfg = GbdtConfig::new();
    cfg.set_feature_size(rows[0].len());
    cfg.set_max_depth(config.max_depth);
    cfg.set_iterations(config.num_trees);
    cfg.set_shrinkage(config.learning_rate as f32);
    cfg.set_loss("SquaredError");
    cfg.set_debug(false);
    cfg.set_training_optimization_level(2);
    cfg.set_min_leaf_size(1);

    let mut model = GBDT::new(&cfg);
    let mut training_data: Vec<Data> = rows
        .iter()
        .zip(targets)
        .map(|(row, &target)| Data::new_training_data(to_f32(row), 1.0, target as f32, None))
        .collect();
    model.fit(&mut training_data);
    Ok(model)
}

fn predict_rows(model: &GBDT, rows: &[Vec<f64>]) -> Vec<f64> {
    if rows.is_empty() {
        return Vec::new();
    }
    let data: Vec<Data> = rows
        .iter()
        .map(|row| Data::new_test_data(to_f32(row), None))
        .collect();
    model.predict(&data).into_iter().map(|p| p as f64).collect()
}

fn cross_validated_rmse(
    rows: &[Vec<f64>],
    targets: &[f64],
    config: &PowerTrainConfig,
) -> Result<f64> {
    let folds = split::k_fold(rows.len(), 5, config.seed);
    let mut fold_rmse = Vec::with_capacity(folds.len());

    for (train_idx, test_idx) in folds {
        if train_idx.is_empty() || test_idx.is_empty() {
            continue;
        }
        let train_rows: Vec<Vec<f64>> = train_idx.iter().map(|&i| rows[i].clone()).collect();
        let train_targets: Vec<f64> = train_idx.iter().map(|&i| targets[i]).collect();
        let test_rows: Vec<Vec<f64>> = test_idx.iter().map(|&i| rows[i].clone()).collect();
        let test_targets: Vec<f64> = test_idx.iter().map(|&i| targets[i]).collect();

        let model = fit_regressor(&train_rows, &train_targets, config)?;
        let predicted = predict_rows(&model, &test_rows);
        fold_rmse.push(metrics::mse(&test_targets, &predicted).sqrt());
    }

    let (mean, _) = metrics::mean_std(&fold_rmse);
    Ok(mean)
}

/// Permutation importance: how much the test MSE worsens when one feature
/// column is shuffled. Normalized to sum to 1 (all zeros if shuffling never
/// hurts).
fn permutation_importance(
    model: &GBDT,
    rows: &[Vec<f64>],
    targets: &[f64],
    feature_names: &[String],
    seed: u64,
) -> BTreeMap<String, f64> {
    let baseline = metrics::mse(targets, &predict_rows(model, rows));
    let mut raw = Vec::with_capacity(feature_names.len());

    for (col, name) in feature_names.iter().enumerate() {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(col as u64 + 1));
        let mut column: Vec<f64> = rows.iter().map(|r| r[col]).collect();
        column.shuffle(&mut rng);

        let permuted: Vec<Vec<f64>> = rows
            .iter()
            .zip(&column)
            .map(|(row, &v)| {
                let mut row = row.clone();
                row[col] = v;
                row
            })
            .collect();

        let degraded = metrics::mse(targets, &predict_rows(model, &permuted));
        raw.push((name.clone(), (degraded - baseline).max(0.0)));
    }

    let total: f64 = raw.iter().map(|(_, v)| v).sum();
    raw.into_iter()
        .map(|(name, v)| (name, if total > 0.0 { v / total } else { 0.0 }))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

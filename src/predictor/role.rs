//! Role classification from powers text
//!
//! Classifies characters as Hero / Villain / Antihero from their TF-IDF
//! vectorized powers description. The underlying `gbdt` crate trains binary
//! models only, so multi-class prediction is one-vs-rest: one
//! `LogLikelyhood` model per class, with per-class probabilities normalized
//! to sum to 1.

use std::collections::BTreeMap;
use std::path::Path;

use gbdt::config::Config as GbdtConfig;
use gbdt::decision_tree::Data;
use gbdt::gradient_boost::GBDT;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::bundle;
use super::metrics::{self, ClassMetrics};
use super::split;
use crate::error::{PowerverseError, Result};
use crate::features::TfidfVectorizer;

#[derive(Debug, Clone)]
pub struct RoleTrainConfig {
    pub test_size: f64,
    pub seed: u64,
    pub num_trees: usize,
    pub max_depth: u32,
    pub learning_rate: f64,
}

impl Default for RoleTrainConfig {
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

/// Evaluation metrics from a classification training run
#[derive(Debug, Clone, Serialize)]
pub struct RoleTrainReport {
    /// Per-class precision/recall/F1/support
    pub classification_report: BTreeMap<String, ClassMetrics>,
    /// Rows = actual, columns = predicted, ordered as `classes`
    pub confusion_matrix: Vec<Vec<usize>>,
    pub classes: Vec<String>,
    pub accuracy: f64,
    pub cv_accuracy_mean: f64,
    pub cv_accuracy_std: f64,
    pub train_size: usize,
    pub test_size: usize,
}

/// Trained one-vs-rest role classifier
#[derive(Serialize, Deserialize)]
pub struct RolePredictor {
    classes: Vec<String>,
    models: Vec<GBDT>,
    feature_names: Vec<String>,
}

/// Atomic persistence unit: classifier and its paired vectorizer are saved
/// and loaded together, never separately.
#[derive(Serialize, Deserialize)]
struct RoleBundle {
    schema_version: u32,
    predictor: RolePredictor,
    vectorizer: TfidfVectorizer,
}

impl std::fmt::Debug for RolePredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RolePredictor")
            .field("classes", &self.classes)
            .field("feature_names", &self.feature_names)
            .finish_non_exhaustive()
    }
}

impl RolePredictor {
    /// Train on vectorized powers text.
    ///
    /// `feature_names` is the vectorizer's fixed schema; it is stored with
    /// the model and verified again when a bundle is loaded. The split is
    /// stratified by label and fails when any class has fewer than 2 members.
    pub fn train(
        features: &[Vec<f64>],
        labels: &[String],
        feature_names: Vec<String>,
        config: &RoleTrainConfig,
    ) -> Result<(Self, RoleTrainReport)> {
        if features.len() != labels.len() {
            return Err(PowerverseError::Validation(format!(
                "feature count ({}) does not match label count ({})",
                features.len(),
                labels.len()
            )));
        }
        if features.is_empty() {
            return Err(PowerverseError::Validation(
                "no training samples provided".to_string(),
            ));
        }

        let classes: Vec<String> = labels
            .iter()
            .cloned()
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();

        let (train_idx, test_idx) = split::stratified_split(labels, config.test_size, config.seed)?;
        let train_rows: Vec<Vec<f64>> = train_idx.iter().map(|&i| features[i].clone()).collect();
        let train_labels: Vec<String> = train_idx.iter().map(|&i| labels[i].clone()).collect();
        let test_rows: Vec<Vec<f64>> = test_idx.iter().map(|&i| features[i].clone()).collect();
        let test_labels: Vec<String> = test_idx.iter().map(|&i| labels[i].clone()).collect();

        let models = fit_one_vs_rest(&train_rows, &train_labels, &classes, config)?;
        let predictor = Self {
            classes: classes.clone(),
            models,
            feature_names,
        };

        let predicted: Vec<String> = test_rows
            .iter()
            .map(|row| predictor.predict(row))
            .collect::<Result<_>>()?;

        let accuracy = metrics::accuracy(&test_labels, &predicted);
        let classification_report =
            metrics::classification_report(&test_labels, &predicted, &classes);
        let confusion_matrix = metrics::confusion_matrix(&test_labels, &predicted, &classes);

        let (cv_accuracy_mean, cv_accuracy_std) =
            cross_validated_accuracy(features, labels, &classes, config)?;

        info!(
            "Role classifier trained: accuracy={:.3} cv={:.3}±{:.3} over {} classes",
            accuracy,
            cv_accuracy_mean,
            cv_accuracy_std,
            classes.len()
        );

        let report = RoleTrainReport {
            classification_report,
            confusion_matrix,
            classes,
            accuracy,
            cv_accuracy_mean,
            cv_accuracy_std,
            train_size: train_rows.len(),
            test_size: test_rows.len(),
        };

        Ok((predictor, report))
    }

    /// Predict the most probable class for one feature row.
    pub fn predict(&self, features: &[f64]) -> Result<String> {
        let proba = self.predict_proba(features)?;
        // Ties resolve to the first class in sorted order
        let best = self
            .classes
            .iter()
            .max_by(|a, b| {
                proba[a.as_str()]
                    .partial_cmp(&proba[b.as_str()])
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .cloned()
            .ok_or_else(|| PowerverseError::Model("classifier has no classes".to_string()))?;
        Ok(best)
    }

    /// Per-class probabilities; keys are exactly the training classes and
    /// values sum to 1 within floating tolerance.
    pub fn predict_proba(&self, features: &[f64]) -> Result<BTreeMap<String, f64>> {
        if features.len() != self.feature_names.len() {
            return Err(PowerverseError::SchemaMismatch(format!(
                "model expects {} feature columns, input has {}",
                self.feature_names.len(),
                features.len()
            )));
        }

        let data = vec![Data::new_test_data(to_f32(features), None)];
        let mut scores: Vec<f64> = self
            .models
            .iter()
            .map(|model| model.predict(&data).first().copied().unwrap_or(0.5) as f64)
            .collect();

        let total: f64 = scores.iter().sum();
        if total > 0.0 {
            for s in &mut scores {
                *s /= total;
            }
        } else {
            // All-zero scores: fall back to uniform
            let uniform = 1.0 / scores.len().max(1) as f64;
            scores.fill(uniform);
        }

        Ok(self.classes.iter().cloned().zip(scores).collect())
    }

    /// Classify raw powers text through a fitted vectorizer.
    ///
    /// The vectorizer must be the one the model was trained with; passing a
    /// different fitted vectorizer silently produces garbage features, which
    /// is why persistence keeps the pair together.
    pub fn predict_role_from_text(
        &self,
        powers_text: &str,
        vectorizer: &TfidfVectorizer,
    ) -> Result<(String, BTreeMap<String, f64>)> {
        let features = vectorizer.transform(powers_text);
        let label = self.predict(&features)?;
        let proba = self.predict_proba(&features)?;
        Ok((label, proba))
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Persist model and vectorizer as one bundle.
    pub fn save(self, vectorizer: TfidfVectorizer, path: &Path) -> Result<()> {
        let bundle = RoleBundle {
            schema_version: bundle::SCHEMA_VERSION,
            predictor: self,
            vectorizer,
        };
        bundle::save(&bundle, path)
    }

    /// Load a bundle, returning the matched (model, vectorizer) pair after
    /// verifying the stored feature schema against the vectorizer's.
    pub fn load(path: &Path) -> Result<(Self, TfidfVectorizer)> {
        let loaded: RoleBundle = bundle::load(path)?;
        bundle::check_version(loaded.schema_version)?;
        bundle::check_feature_names(
            &loaded.predictor.feature_names,
            &loaded.vectorizer.feature_names(),
        )?;
        Ok((loaded.predictor, loaded.vectorizer))
    }
}

#[inline]
fn to_f32(row: &[f64]) -> Vec<f32> {
    row.iter().map(|&v| v as f32).collect()
}

/// Fit one binary GBDT per class (positive = member of the class).
fn fit_one_vs_rest(
    rows: &[Vec<f64>],
    labels: &[String],
    classes: &[String],
    config: &RoleTrainConfig,
) -> Result<Vec<GBDT>> {
    if rows.is_empty() {
        return Err(PowerverseError::Model("no training rows".to_string()));
    }

    let mut cfg = GbdtConfig::new();
    cfg.set_feature_size(rows[0].len());
    cfg.set_max_depth(config.max_depth);
    cfg.set_iterations(config.num_trees);
    cfg.set_shrinkage(config.learning_rate as f32);
    cfg.set_loss("LogLikelyhood");
    cfg.set_debug(false);
    cfg.set_training_optimization_level(2);
    cfg.set_min_leaf_size(1);

    let mut models = Vec::with_capacity(classes.len());
    for class in classes {
        let mut training_data: Vec<Data> = rows
            .iter()
            .zip(labels)
            .map(|(row, label)| {
                let target = if label == class { 1.0 } else { -1.0 };
                Data::new_training_data(to_f32(row), 1.0, target, None)
            })
            .collect();
        let mut model = GBDT::new(&cfg);
        model.fit(&mut training_data);
        models.push(model);
    }
    Ok(models)
}

fn cross_validated_accuracy(
    features: &[Vec<f64>],
    labels: &[String],
    classes: &[String],
    config: &RoleTrainConfig,
) -> Result<(f64, f64)> {
    // Folds are stratified so no training side loses an entire class.
    let folds = split::stratified_k_fold(labels, 5, config.seed);
    let mut scores = Vec::with_capacity(folds.len());

    for (train_idx, test_idx) in folds {
        if train_idx.is_empty() || test_idx.is_empty() {
            continue;
        }
        let train_rows: Vec<Vec<f64>> = train_idx.iter().map(|&i| features[i].clone()).collect();
        let train_labels: Vec<String> = train_idx.iter().map(|&i| labels[i].clone()).collect();
        let test_labels: Vec<String> = test_idx.iter().map(|&i| labels[i].clone()).collect();

        let models = fit_one_vs_rest(&train_rows, &train_labels, classes, config)?;
        let fold_predictor = RolePredictor {
            classes: classes.to_vec(),
            models,
            feature_names: vec![String::new(); features[0].len()],
        };

        let predicted: Vec<String> = test_idx
            .iter()
            .map(|&i| fold_predictor.predict(&features[i]))
            .collect::<Result<_>>()?;
        scores.push(metrics::accuracy(&test_labels, &predicted));
    }

    Ok(metrics::mean_std(&scores))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> RoleTrainConfig {
        RoleTrainConfig {
            num_trees: 10,
            max_depth: 3,
            ..Default::default()
        }
    }

    /// Separable 2-feature data: heroes on one axis, villains on the other.
    fn training_data() -> (Vec<Vec<f64>>, Vec<String>) {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..12 {
            let jitter = i as f64 * 0.01;
            features.push(vec![1.0 + jitter, 0.0]);
            labels.push("Hero".to_string());
            features.push(vec![0.0, 1.0 + jitter]);
            labels.push("Villain".to_string());
        }
        (features, labels)
    }

    fn feature_names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("term_{i}")).collect()
    }

    #[test]
    fn test_train_and_predict_separable_classes() {
        let (features, labels) = training_data();
        let (predictor, report) =
            RolePredictor::train(&features, &labels, feature_names(2), &small_config())
                .expect("training");

        assert_eq!(report.classes, vec!["Hero", "Villain"]);
        assert_eq!(report.confusion_matrix.len(), 2);
        assert!(report.accuracy > 0.5, "separable data, got {}", report.accuracy);

        let hero = predictor.predict(&[2.0, 0.0]).unwrap();
        assert_eq!(hero, "Hero");
        let villain = predictor.predict(&[0.0, 2.0]).unwrap();
        assert_eq!(villain, "Villain");
    }

    #[test]
    fn test_proba_keys_and_sum() {
        let (features, labels) = training_data();
        let (predictor, _) =
            RolePredictor::train(&features, &labels, feature_names(2), &small_config())
                .expect("training");

        let proba = predictor.predict_proba(&[1.0, 0.0]).unwrap();
        let keys: Vec<&String> = proba.keys().collect();
        assert_eq!(keys, vec!["Hero", "Villain"]);
        let sum: f64 = proba.values().sum();
        assert!((sum - 1.0).abs() < 1e-9, "probabilities should sum to 1, got {sum}");
    }

    #[test]
    fn test_schema_mismatch_on_wrong_width() {
        let (features, labels) = training_data();
        let (predictor, _) =
            RolePredictor::train(&features, &labels, feature_names(2), &small_config())
                .expect("training");

        let err = predictor.predict(&[1.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, PowerverseError::SchemaMismatch(_)));
    }

    #[test]
    fn test_singleton_class_fails_stratification() {
        let mut features = vec![vec![1.0, 0.0]; 5];
        let mut labels = vec!["Hero".to_string(); 5];
        features.push(vec![0.0, 1.0]);
        labels.push("Antihero".to_string());

        let err = RolePredictor::train(&features, &labels, feature_names(2), &small_config())
            .unwrap_err();
        assert!(err.to_string().contains("Antihero"));
    }

    #[test]
    fn test_cross_validation_survives_rare_class() {
        // 12-vs-2 imbalance: an unstratified fold can strip the small
        // class from the training side and skew the one-vs-rest fits.
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..12 {
            features.push(vec![1.0 + i as f64 * 0.01, 0.0]);
            labels.push("Hero".to_string());
        }
        for i in 0..2 {
            features.push(vec![0.0, 1.0 + i as f64 * 0.01]);
            labels.push("Antihero".to_string());
        }

        let (_, report) =
            RolePredictor::train(&features, &labels, feature_names(2), &small_config())
                .expect("training with a rare class");
        assert!(report.cv_accuracy_mean.is_finite());
        assert!(report.cv_accuracy_mean > 0.0);
    }

    #[test]
    fn test_predict_role_from_text_uses_vectorizer() {
        let docs = [
            "super strength smashing punching strength",
            "super strength smashing strength punching",
            "dark magic scheming cursing magic",
            "dark magic cursing scheming magic",
            "strength smashing punching heroics",
            "magic cursing dark rituals",
        ];
        let labels: Vec<String> = ["Hero", "Hero", "Villain", "Villain", "Hero", "Villain"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let vectorizer = TfidfVectorizer::fit(&docs, 1);
        let features = vectorizer.transform_all(&docs);
        let (predictor, _) = RolePredictor::train(
            &features,
            &labels,
            vectorizer.feature_names(),
            &small_config(),
        )
        .expect("training");

        let (label, proba) = predictor
            .predict_role_from_text("super strength punching", &vectorizer)
            .expect("predict from text");
        assert!(proba.contains_key(&label));
        assert_eq!(proba.len(), 2);
    }

    #[test]
    fn test_bundle_roundtrip_keeps_pair_matched() {
        let docs = [
            "flight lasers armor flying",
            "flight armor lasers flying",
            "poison daggers stealth knives",
            "poison stealth daggers knives",
        ];
        let labels: Vec<String> = ["Hero", "Hero", "Villain", "Villain"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let vectorizer = TfidfVectorizer::fit(&docs, 1);
        let features = vectorizer.transform_all(&docs);
        let (predictor, _) = RolePredictor::train(
            &features,
            &labels,
            vectorizer.feature_names(),
            &small_config(),
        )
        .expect("training");

        let before = predictor
            .predict_role_from_text("flight armor", &vectorizer)
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("role_model.json");
        predictor.save(vectorizer, &path).expect("save");

        let (loaded, loaded_vectorizer) = RolePredictor::load(&path).expect("load");
        let after = loaded
            .predict_role_from_text("flight armor", &loaded_vectorizer)
            .unwrap();

        assert_eq!(before.0, after.0);
        for (class, p) in &before.1 {
            assert!((p - after.1[class]).abs() < 1e-9);
        }
    }
}

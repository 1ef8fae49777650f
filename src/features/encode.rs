//! One-hot encoding and feature scaling for the power regressor
//!
//! Mirrors dummy-variable encoding over `{role label, power level}`: one
//! `role_<Label>` column per distinct role label and one `power_<Level>`
//! column per power level, both in sorted label order. The column set is
//! fixed at fit time; categories unseen at fit time contribute zero to every
//! column at transform time.

use serde::{Deserialize, Serialize};

use crate::models::CharacterRecord;

/// Fitted categorical one-hot encoder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalEncoder {
    role_labels: Vec<String>,
    level_labels: Vec<String>,
}

impl CategoricalEncoder {
    /// Fit the column schema from the distinct role labels and power levels
    /// present in the records.
    pub fn fit(records: &[CharacterRecord]) -> Self {
        let mut role_labels: Vec<String> = records
            .iter()
            .map(|r| r.role_label.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        role_labels.sort();

        let mut level_labels: Vec<String> = records
            .iter()
            .map(|r| r.power_level.to_string())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        level_labels.sort();

        Self {
            role_labels,
            level_labels,
        }
    }

    /// Ordered column names: roles first, then power levels.
    pub fn feature_names(&self) -> Vec<String> {
        self.role_labels
            .iter()
            .map(|l| format!("role_{l}"))
            .chain(self.level_labels.iter().map(|l| format!("power_{l}")))
            .collect()
    }

    pub fn width(&self) -> usize {
        self.role_labels.len() + self.level_labels.len()
    }

    /// Encode one record against the fitted schema.
    pub fn transform(&self, record: &CharacterRecord) -> Vec<f64> {
        self.encode(&record.role_label, &record.power_level.to_string())
    }

    /// Encode a raw (role label, power level label) pair.
    pub fn encode(&self, role_label: &str, level_label: &str) -> Vec<f64> {
        let mut row = vec![0.0; self.width()];
        if let Some(i) = self.role_labels.iter().position(|l| l == role_label) {
            row[i] = 1.0;
        }
        if let Some(i) = self.level_labels.iter().position(|l| l == level_label) {
            row[self.role_labels.len() + i] = 1.0;
        }
        row
    }

    pub fn transform_all(&self, records: &[CharacterRecord]) -> Vec<Vec<f64>> {
        records.iter().map(|r| self.transform(r)).collect()
    }
}

/// Per-column standardization: `(x - mean) / std`.
///
/// Uses the population standard deviation. A zero-variance column passes
/// through centered only, so constant features do not produce NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let width = rows.first().map_or(0, |r| r.len());
        let n = rows.len() as f64;

        let mut mean = vec![0.0; width];
        for row in rows {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut mean {
            *m /= n.max(1.0);
        }

        let mut var = vec![0.0; width];
        for row in rows {
            for ((s, v), m) in var.iter_mut().zip(row).zip(&mean) {
                let d = v - m;
                *s += d * d;
            }
        }
        let std = var
            .into_iter()
            .map(|s| (s / n.max(1.0)).sqrt())
            .collect();

        Self { mean, std }
    }

    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.mean.iter().zip(&self.std))
            .map(|(v, (m, s))| {
                let centered = v - m;
                if *s > 0.0 {
                    centered / s
                } else {
                    centered
                }
            })
            .collect()
    }

    pub fn transform_all(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|r| self.transform(r)).collect()
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }
}

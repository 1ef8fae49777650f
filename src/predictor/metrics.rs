//! Evaluation metrics for the regression and classification models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mean squared error
pub fn mse(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64
}

/// Coefficient of determination (1 - SS_res / SS_tot).
///
/// Degenerate case: constant actuals give an R² of 0 unless the predictions
/// are exact.
pub fn r2(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

pub fn accuracy(actual: &[String], predicted: &[String]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let correct = actual.iter().zip(predicted).filter(|(a, p)| a == p).count();
    correct as f64 / actual.len() as f64
}

/// Per-class precision/recall/F1 plus support
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Classification report keyed by class label
pub fn classification_report(
    actual: &[String],
    predicted: &[String],
    classes: &[String],
) -> BTreeMap<String, ClassMetrics> {
    let mut report = BTreeMap::new();
    for class in classes {
        let tp = actual
            .iter()
            .zip(predicted)
            .filter(|(a, p)| *a == class && *p == class)
            .count() as f64;
        let predicted_positive = predicted.iter().filter(|p| *p == class).count() as f64;
        let actual_positive = actual.iter().filter(|a| *a == class).count() as f64;

        let precision = if predicted_positive > 0.0 { tp / predicted_positive } else { 0.0 };
        let recall = if actual_positive > 0.0 { tp / actual_positive } else { 0.0 };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        report.insert(
            class.clone(),
            ClassMetrics {
                precision,
                recall,
                f1,
                support: actual_positive as usize,
            },
        );
    }
    report
}

/// Confusion matrix with rows = actual, columns = predicted, in the order of
/// `classes`. Labels outside `classes` are ignored.
pub fn confusion_matrix(
    actual: &[String],
    predicted: &[String],
    classes: &[String],
) -> Vec<Vec<usize>> {
    let index: BTreeMap<&str, usize> = classes
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let mut matrix = vec![vec![0usize; classes.len()]; classes.len()];
    for (a, p) in actual.iter().zip(predicted) {
        if let (Some(&row), Some(&col)) = (index.get(a.as_str()), index.get(p.as_str())) {
            matrix[row][col] += 1;
        }
    }
    matrix
}

/// Mean and population standard deviation of a sample.
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    (mean, var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mse_and_r2() {
        let actual = [1.0, 2.0, 3.0];
        let predicted = [1.0, 2.0, 3.0];
        assert_eq!(mse(&actual, &predicted), 0.0);
        assert_eq!(r2(&actual, &predicted), 1.0);

        let off = [2.0, 3.0, 4.0];
        assert_eq!(mse(&actual, &off), 1.0);
        assert!(r2(&actual, &off) < 1.0);
    }

    #[test]
    fn test_accuracy() {
        let actual = labels(&["Hero", "Villain", "Hero"]);
        let predicted = labels(&["Hero", "Hero", "Hero"]);
        assert!((accuracy(&actual, &predicted) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_classification_report() {
        let actual = labels(&["Hero", "Hero", "Villain", "Villain"]);
        let predicted = labels(&["Hero", "Villain", "Villain", "Villain"]);
        let classes = labels(&["Hero", "Villain"]);
        let report = classification_report(&actual, &predicted, &classes);

        let hero = &report["Hero"];
        assert_eq!(hero.precision, 1.0);
        assert_eq!(hero.recall, 0.5);
        assert_eq!(hero.support, 2);

        let villain = &report["Villain"];
        assert!((villain.precision - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(villain.recall, 1.0);
    }

    #[test]
    fn test_confusion_matrix_layout() {
        let actual = labels(&["Hero", "Hero", "Villain"]);
        let predicted = labels(&["Hero", "Villain", "Villain"]);
        let classes = labels(&["Hero", "Villain"]);
        let m = confusion_matrix(&actual, &predicted, &classes);
        assert_eq!(m, vec![vec![1, 1], vec![0, 1]]);
    }

    #[test]
    fn test_mean_std() {
        let (mean, std) = mean_std(&[2.0, 4.0]);
        assert_eq!(mean, 3.0);
        assert_eq!(std, 1.0);
    }
}

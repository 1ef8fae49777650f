//! Seeded train/test splitting
//!
//! All splits are driven by a `ChaCha8Rng` seeded from the caller, so every
//! training run with the same seed produces the same partition.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{PowerverseError, Result};

/// Shuffle `0..n` and split into (train, test) index sets.
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);

    let n_test = ((n as f64 * test_size).round() as usize).clamp(1, n.saturating_sub(1).max(1));
    let (test, train) = indices.split_at(n_test);
    (train.to_vec(), test.to_vec())
}

/// Split stratified by label: each class contributes proportionally to both
/// sides, and every class lands in the training set at least once.
///
/// Fails when any class has fewer than 2 members, since such a class cannot
/// appear on both sides of the split.
pub fn stratified_split(
    labels: &[String],
    test_size: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let mut by_class: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(i);
    }

    for (class, members) in &by_class {
        if members.len() < 2 {
            return Err(PowerverseError::Validation(format!(
                "class '{class}' has only {} member(s); at least 2 are needed to stratify",
                members.len()
            )));
        }
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for members in by_class.values() {
        let mut indices = members.clone();
        indices.shuffle(&mut rng);
        // At least one member on each side of the split
        let n_test = ((indices.len() as f64 * test_size).round() as usize)
            .clamp(1, indices.len() - 1);
        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }

    Ok((train, test))
}

/// Generate `k` cross-validation folds as (train, test) index pairs.
pub fn k_fold(n: usize, k: usize, seed: u64) -> Vec<(Vec<usize>, Vec<usize>)> {
    let k = k.min(n).max(2);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);

    let mut folds = Vec::with_capacity(k);
    let fold_size = n / k;
    let remainder = n % k;

    let mut start = 0;
    for fold in 0..k {
        let size = fold_size + usize::from(fold < remainder);
        let test: Vec<usize> = indices[start..start + size].to_vec();
        let train: Vec<usize> = indices[..start]
            .iter()
            .chain(&indices[start + size..])
            .copied()
            .collect();
        folds.push((train, test));
        start += size;
    }
    folds
}

/// Generate `k` folds stratified by label: each class's members are
/// shuffled and dealt round-robin across the fold test sets, so every fold
/// sees roughly the full class mix on both sides.
pub fn stratified_k_fold(labels: &[String], k: usize, seed: u64) -> Vec<(Vec<usize>, Vec<usize>)> {
    let n = labels.len();
    let k = k.min(n).max(2);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut by_class: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(i);
    }

    let mut fold_tests: Vec<Vec<usize>> = vec![Vec::new(); k];
    for members in by_class.values() {
        let mut indices = members.clone();
        indices.shuffle(&mut rng);
        for (offset, idx) in indices.into_iter().enumerate() {
            fold_tests[offset % k].push(idx);
        }
    }

    fold_tests
        .into_iter()
        .map(|test| {
            let mut in_test = vec![false; n];
            for &i in &test {
                in_test[i] = true;
            }
            let train: Vec<usize> = (0..n).filter(|&i| !in_test[i]).collect();
            (train, test)
        })
        .collect()
}

//! Offline visualization data
//!
//! The data behind the project's charts — word-cloud term frequencies, role
//! and power-level distributions, top affiliations, and the power-by-role
//! crosstab — computed from a dataset and rendered as JSON for front-ends or
//! as plain text for the terminal. Rendering pixels is out of scope; this
//! module produces the numbers the pictures are drawn from.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::features::{is_stop_word, tokenize};

/// Distribution and term-frequency summary of a dataset
#[derive(Debug, Serialize)]
pub struct DatasetReport {
    pub character_count: usize,
    pub role_distribution: BTreeMap<String, usize>,
    pub power_level_distribution: BTreeMap<String, usize>,
    /// Top affiliations by member count, descending
    pub top_affiliations: Vec<(String, usize)>,
    /// Power-level counts per role label
    pub power_by_role: BTreeMap<String, BTreeMap<String, usize>>,
    /// Most frequent powers-text terms, descending — word-cloud input
    pub word_frequencies: Vec<(String, usize)>,
}

/// Stop-word-filtered term counts over all powers text, most frequent first.
/// Ties break alphabetically so the ordering is stable.
pub fn word_frequencies(dataset: &Dataset, max_words: usize) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in dataset.records() {
        for token in tokenize(&record.powers_text) {
            if is_stop_word(&token) {
                continue;
            }
            *counts.entry(token).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(max_words);
    ranked
}

/// Build the full report for a dataset.
pub fn build_report(dataset: &Dataset, top_affiliations: usize, max_words: usize) -> DatasetReport {
    let mut role_distribution: BTreeMap<String, usize> = BTreeMap::new();
    let mut power_level_distribution: BTreeMap<String, usize> = BTreeMap::new();
    let mut affiliation_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut power_by_role: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();

    for record in dataset.records() {
        *role_distribution.entry(record.role_label.clone()).or_insert(0) += 1;
        let level = record.power_level.to_string();
        *power_level_distribution.entry(level.clone()).or_insert(0) += 1;
        if !record.affiliation.is_empty() {
            *affiliation_counts.entry(record.affiliation.clone()).or_insert(0) += 1;
        }
        *power_by_role
            .entry(record.role_label.clone())
            .or_default()
            .entry(level)
            .or_insert(0) += 1;
    }

    let mut ranked_affiliations: Vec<(String, usize)> = affiliation_counts.into_iter().collect();
    ranked_affiliations.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked_affiliations.truncate(top_affiliations);

    DatasetReport {
        character_count: dataset.len(),
        role_distribution,
        power_level_distribution,
        top_affiliations: ranked_affiliations,
        power_by_role,
        word_frequencies: word_frequencies(dataset, max_words),
    }
}

/// Render a report as pretty-printed JSON.
pub fn render_json(report: &DatasetReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render a report as terminal text.
pub fn render_text(report: &DatasetReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Characters: {}", report.character_count);

    let _ = writeln!(out, "\nRoles:");
    for (role, count) in &report.role_distribution {
        let _ = writeln!(out, "  {role:<12} {count}");
    }

    let _ = writeln!(out, "\nPower levels:");
    for (level, count) in &report.power_level_distribution {
        let _ = writeln!(out, "  {level:<12} {count}");
    }

    if !report.top_affiliations.is_empty() {
        let _ = writeln!(out, "\nTop affiliations:");
        for (affiliation, count) in &report.top_affiliations {
            let _ = writeln!(out, "  {affiliation:<24} {count}");
        }
    }

    if !report.word_frequencies.is_empty() {
        let _ = writeln!(out, "\nMost common power terms:");
        for (term, count) in report.word_frequencies.iter().take(15) {
            let _ = writeln!(out, "  {term:<20} {count}");
        }
    }

    out
}

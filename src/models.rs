//! Core data models for Powerverse
//!
//! These models are used throughout the codebase for representing
//! character records and derived labels.

use serde::{Deserialize, Serialize};

/// Character alignment parsed from the `Role` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    Hero,
    Villain,
    Antihero,
    #[default]
    Other,
}

impl Role {
    /// Parse a cleaned (title-cased) role label. Unknown labels map to `Other`.
    pub fn parse(label: &str) -> Self {
        match label {
            "Hero" => Role::Hero,
            "Villain" => Role::Villain,
            "Antihero" => Role::Antihero,
            _ => Role::Other,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Hero => write!(f, "Hero"),
            Role::Villain => write!(f, "Villain"),
            Role::Antihero => write!(f, "Antihero"),
            Role::Other => write!(f, "Other"),
        }
    }
}

/// Coarse power bucket derived from the powers free text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum PowerLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl PowerLevel {
    /// Bucket a continuous 1-10 score: High ≥ 8, Medium ≥ 5, else Low.
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            PowerLevel::High
        } else if score >= 5.0 {
            PowerLevel::Medium
        } else {
            PowerLevel::Low
        }
    }

    /// Parse a bucket label, case-insensitively. Unknown labels are `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match title_case(label).as_str() {
            "High" => Some(PowerLevel::High),
            "Medium" => Some(PowerLevel::Medium),
            "Low" => Some(PowerLevel::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for PowerLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerLevel::Low => write!(f, "Low"),
            PowerLevel::Medium => write!(f, "Medium"),
            PowerLevel::High => write!(f, "High"),
        }
    }
}

/// A raw CSV row, before cleaning. `Character` and `Role` are required
/// columns; everything else may be missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Character")]
    pub character: String,
    #[serde(rename = "Role")]
    pub role: String,
    #[serde(rename = "Affiliation", default)]
    pub affiliation: Option<String>,
    #[serde(rename = "Powers", default)]
    pub powers: Option<String>,
}

/// A cleaned character record. Identity key: `name` (title-cased).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub name: String,
    pub role: Role,
    /// Title-cased original role label. Feature encoding uses this rather
    /// than the parsed enum so unusual labels still get their own column,
    /// matching the one-hot behavior of the source data.
    pub role_label: String,
    #[serde(default)]
    pub affiliation: String,
    #[serde(default)]
    pub powers_text: String,
    #[serde(default)]
    pub power_level: PowerLevel,
}

/// Title-case a free-text field: every letter that follows a non-letter
/// (start of word, hyphen, apostrophe, digit) is uppercased, the rest
/// lowercased. Surrounding and repeated whitespace is collapsed.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut out = String::with_capacity(word.len());
            let mut boundary = true;
            for c in word.chars() {
                if c.is_alphabetic() {
                    if boundary {
                        out.extend(c.to_uppercase());
                    } else {
                        out.extend(c.to_lowercase());
                    }
                    boundary = false;
                } else {
                    out.push(c);
                    boundary = true;
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join(" ")
}

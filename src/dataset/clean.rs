//! Record cleaning
//!
//! Standardizes character names and role labels to title case and removes
//! duplicate names. Cleaning is idempotent: running it over an already-clean
//! record set is a no-op.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{PowerverseError, Result};
use crate::models::{title_case, CharacterRecord, Role};

/// Summary of a cleaning pass
#[derive(Debug, Clone, Default)]
pub struct CleanReport {
    pub total_input: usize,
    pub duplicates_removed: usize,
}

/// Clean raw rows into character records.
///
/// - names and role labels are title-cased
/// - duplicate names are dropped, first occurrence wins
/// - an empty `Character` or `Role` value fails validation (the column being
///   entirely absent is caught earlier, at CSV load)
pub fn clean_records(raw: &[crate::models::RawRecord]) -> Result<(Vec<CharacterRecord>, CleanReport)> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::with_capacity(raw.len());
    let mut duplicates = 0usize;

    for (i, row) in raw.iter().enumerate() {
        if row.character.trim().is_empty() {
            return Err(PowerverseError::Validation(format!(
                "row {} has an empty Character field",
                i + 1
            )));
        }
        if row.role.trim().is_empty() {
            return Err(PowerverseError::Validation(format!(
                "row {} has an empty Role field",
                i + 1
            )));
        }

        let name = title_case(&row.character);
        if !seen.insert(name.clone()) {
            duplicates += 1;
            continue;
        }

        let role_label = title_case(&row.role);
        records.push(CharacterRecord {
            role: Role::parse(&role_label),
            role_label,
            name,
            affiliation: row.affiliation.clone().unwrap_or_default(),
            powers_text: row.powers.clone().unwrap_or_default(),
            power_level: Default::default(),
        });
    }

    if duplicates > 0 {
        debug!("Removed {duplicates} duplicate characters");
    }

    Ok((
        records,
        CleanReport {
            total_input: raw.len(),
            duplicates_removed: duplicates,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRecord;

    fn raw(character: &str, role: &str) -> RawRecord {
        RawRecord {
            character: character.to_string(),
            role: role.to_string(),
            affiliation: None,
            powers: None,
        }
    }

    #[test]
    fn test_title_casing_and_role_parse() {
        let (records, _) = clean_records(&[raw("doctor strange", "hero")]).unwrap();
        assert_eq!(records[0].name, "Doctor Strange");
        assert_eq!(records[0].role_label, "Hero");
        assert_eq!(records[0].role, Role::Hero);
    }

    #[test]
    fn test_duplicates_first_wins() {
        let mut first = raw("Loki", "villain");
        first.affiliation = Some("Asgard".to_string());
        let second = raw("LOKI", "antihero");

        let (records, report) = clean_records(&[first, second]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(report.duplicates_removed, 1);
        // First occurrence wins
        assert_eq!(records[0].role, Role::Villain);
        assert_eq!(records[0].affiliation, "Asgard");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let rows = vec![raw("storm", "HERO"), raw("magneto", "Villain")];
        let (once, _) = clean_records(&rows).unwrap();

        // Re-run cleaning over the cleaned output
        let again: Vec<RawRecord> = once
            .iter()
            .map(|r| RawRecord {
                character: r.name.clone(),
                role: r.role_label.clone(),
                affiliation: Some(r.affiliation.clone()),
                powers: Some(r.powers_text.clone()),
            })
            .collect();
        let (twice, report) = clean_records(&again).unwrap();

        assert_eq!(report.duplicates_removed, 0);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.role_label, b.role_label);
        }
    }

    #[test]
    fn test_empty_required_field_fails() {
        let err = clean_records(&[raw("", "Hero")]).unwrap_err();
        assert!(err.to_string().contains("Character"));

        let err = clean_records(&[raw("Blade", " ")]).unwrap_err();
        assert!(err.to_string().contains("Role"));
    }
}

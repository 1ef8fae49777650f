//! Dataset loading and preprocessing
//!
//! Owns the character record set for the lifetime of a run. The `Dataset`
//! handle is constructed once (from CSV or from in-memory records) and passed
//! by reference into the predictors, the network builder, and the API layer —
//! there is no global mutable state.

mod clean;
mod power_level;

pub use clean::{clean_records, CleanReport};
pub use power_level::estimate_power_level;

use std::path::Path;

use tracing::info;

use crate::error::{PowerverseError, Result};
use crate::models::{CharacterRecord, RawRecord};

/// Required CSV columns. Their absence is a validation error, not a parse error.
const REQUIRED_COLUMNS: [&str; 2] = ["Character", "Role"];

/// In-memory character dataset
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<CharacterRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<CharacterRecord>) -> Self {
        Self { records }
    }

    /// Load raw rows from a CSV file and clean them in one pass.
    ///
    /// Cleaning title-cases names and role labels and drops duplicate names
    /// (first occurrence wins). The report carries the duplicate count.
    pub fn load(path: &Path) -> Result<(Self, CleanReport)> {
        if !path.exists() {
            return Err(PowerverseError::NotFound(format!(
                "dataset file '{}' does not exist",
                path.display()
            )));
        }

        let mut reader = csv::Reader::from_path(path)?;

        let headers = reader.headers()?.clone();
        for required in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == required) {
                return Err(PowerverseError::Validation(format!(
                    "required column '{required}' is missing from {}",
                    path.display()
                )));
            }
        }

        let mut raw = Vec::new();
        for row in reader.deserialize::<RawRecord>() {
            raw.push(row?);
        }

        let (records, report) = clean_records(&raw)?;
        info!(
            "Loaded {} characters from {} ({} duplicates removed)",
            records.len(),
            path.display(),
            report.duplicates_removed
        );

        Ok((Self { records }, report))
    }

    pub fn records(&self) -> &[CharacterRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Apply the keyword heuristic to every record's powers text.
    pub fn estimate_power_levels(&mut self) {
        for record in &mut self.records {
            record.power_level = estimate_power_level(&record.powers_text);
        }
    }

    /// Look up a character by (cleaned) name.
    pub fn get(&self, name: &str) -> Option<&CharacterRecord> {
        self.records.iter().find(|r| r.name == name)
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use crate::models::{CharacterRecord, PowerLevel, Role};

    pub fn record(name: &str, role: Role, affiliation: &str, powers: &str) -> CharacterRecord {
        CharacterRecord {
            name: name.to_string(),
            role,
            role_label: role.to_string(),
            affiliation: affiliation.to_string(),
            powers_text: powers.to_string(),
            power_level: PowerLevel::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn test_load_and_clean() {
        let file = write_csv(
            "Character,Role,Affiliation,Powers\n\
             iron man,hero,Avengers,Powered armor\n\
             IRON MAN,hero,Avengers,Powered armor\n\
             thanos,villain,Black Order,Cosmic power\n",
        );
        let (dataset, report) = Dataset::load(file.path()).expect("load");
        assert_eq!(dataset.len(), 2);
        assert_eq!(report.duplicates_removed, 1);
        assert!(dataset.get("Iron Man").is_some());
        assert!(dataset.get("Thanos").is_some());
    }

    #[test]
    fn test_missing_required_column() {
        let file = write_csv("Name,Role\nIron Man,Hero\n");
        let err = Dataset::load(file.path()).unwrap_err();
        assert!(matches!(err, PowerverseError::Validation(_)));
        assert!(err.to_string().contains("Character"));
    }

    #[test]
    fn test_missing_file() {
        let err = Dataset::load(Path::new("/nonexistent/characters.csv")).unwrap_err();
        assert!(matches!(err, PowerverseError::NotFound(_)));
    }

    #[test]
    fn test_estimate_power_levels_applied() {
        let file = write_csv(
            "Character,Role,Affiliation,Powers\n\
             Scarlet Witch,Hero,Avengers,Reality warping and magic\n\
             Hawkeye,Hero,Avengers,Expert marksman\n",
        );
        let (mut dataset, _) = Dataset::load(file.path()).expect("load");
        dataset.estimate_power_levels();
        assert_eq!(
            dataset.get("Scarlet Witch").unwrap().power_level,
            crate::models::PowerLevel::High
        );
        assert_eq!(
            dataset.get("Hawkeye").unwrap().power_level,
            crate::models::PowerLevel::Low
        );
    }
}

//! Model bundle persistence
//!
//! A bundle is the atomic unit of persisted model state: the fitted model
//! plus its paired scaler or vectorizer plus the exact feature-name list,
//! serialized as one JSON document. Loading a model without its paired
//! transform state is therefore impossible by construction.
//!
//! Writes go to a temp file in the target directory followed by a rename, so
//! a crash mid-save never leaves a truncated bundle behind.

use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::error::{PowerverseError, Result};

/// Bundle format version, checked on load.
pub const SCHEMA_VERSION: u32 = 1;

/// Serialize a bundle to `path`, creating parent directories as needed.
pub fn save<T: Serialize>(bundle: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_vec(bundle)?;

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, &json)?;
    std::fs::rename(&tmp, path)?;

    info!("Model bundle saved to {}", path.display());
    Ok(())
}

/// Deserialize a bundle from `path`.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(PowerverseError::NotFound(format!(
            "model bundle '{}' does not exist",
            path.display()
        )));
    }
    let contents = std::fs::read(path)?;
    Ok(serde_json::from_slice(&contents)?)
}

/// Verify a loaded bundle's schema version.
pub fn check_version(found: u32) -> Result<()> {
    if found != SCHEMA_VERSION {
        return Err(PowerverseError::SchemaMismatch(format!(
            "bundle schema version {found} does not match supported version {SCHEMA_VERSION}"
        )));
    }
    Ok(())
}

/// Verify that the feature-name list stored in a bundle matches the one the
/// caller is about to use for transforms.
pub fn check_feature_names(stored: &[String], current: &[String]) -> Result<()> {
    if stored != current {
        return Err(PowerverseError::SchemaMismatch(format!(
            "stored feature list ({} columns) disagrees with the paired transform ({} columns)",
            stored.len(),
            current.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Dummy {
        schema_version: u32,
        feature_names: Vec<String>,
        weight: f64,
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("model.json");

        let bundle = Dummy {
            schema_version: SCHEMA_VERSION,
            feature_names: vec!["role_Hero".to_string()],
            weight: 1.5,
        };
        save(&bundle, &path).unwrap();

        let loaded: Dummy = load(&path).unwrap();
        assert_eq!(loaded, bundle);
        // No stray temp file left behind
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load::<Dummy>(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PowerverseError::NotFound(_)));
    }

    #[test]
    fn test_version_check() {
        assert!(check_version(SCHEMA_VERSION).is_ok());
        assert!(matches!(
            check_version(99).unwrap_err(),
            PowerverseError::SchemaMismatch(_)
        ));
    }

    #[test]
    fn test_feature_name_check() {
        let a = vec!["x".to_string(), "y".to_string()];
        let b = vec!["x".to_string()];
        assert!(check_feature_names(&a, &a).is_ok());
        assert!(check_feature_names(&a, &b).is_err());
    }
}

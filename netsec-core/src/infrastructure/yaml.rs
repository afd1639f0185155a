// netsec-core/src/infrastructure/yaml.rs
//
// Generic YAML helpers: "parse a file into T" and "dump T, optionally
// replacing whatever was there".

use std::fs;
use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

pub fn read_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<T, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

/// With `replace`, an existing file is removed before the new one is written.
/// Without it the write still overwrites, but a failed serialization leaves
/// the old file in place.
pub fn write_yaml_file<T: Serialize>(
    path: &Path,
    content: &T,
    replace: bool,
) -> Result<(), InfrastructureError> {
    if replace && path.exists() {
        debug!(path = ?path, "Removing previous YAML file");
        fs::remove_file(path)?;
    }
    let body = serde_yaml::to_string(content)?;
    atomic_write(path, body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested/report.yaml");
        let data = BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 2)]);

        write_yaml_file(&path, &data, false)?;
        let back: BTreeMap<String, i32> = read_yaml_file(&path)?;
        assert_eq!(back, data);
        Ok(())
    }

    #[test]
    fn test_replace_discards_previous_content() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("report.yaml");
        write_yaml_file(&path, &BTreeMap::from([("old", 1)]), false)?;
        write_yaml_file(&path, &BTreeMap::from([("new", 2)]), true)?;

        let back: BTreeMap<String, i32> = read_yaml_file(&path)?;
        assert_eq!(back.len(), 1);
        assert_eq!(back.get("new"), Some(&2));
        Ok(())
    }

    #[test]
    fn test_invalid_yaml_is_reported() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "a: [unclosed")?;
        let res: Result<BTreeMap<String, i32>, _> = read_yaml_file(&path);
        assert!(matches!(res, Err(InfrastructureError::YamlError(_))));
        Ok(())
    }
}

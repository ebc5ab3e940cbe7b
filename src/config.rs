use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Default cap on the number of hits a search prints
pub const DEFAULT_MAX_RESULTS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UmlStoreConfig {
    pub database: Option<String>,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("umlstore.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".umlstore").join("model.db")
}

/// Load the config at `path` (or `umlstore.toml`); `None` if there is none
pub fn load_config(path: Option<&Path>) -> Result<Option<UmlStoreConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: UmlStoreConfig = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &UmlStoreConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    let contents = toml::to_string_pretty(config).map_err(|e| Error::Config(e.to_string()))?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("umlstore.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("umlstore.toml");
        let config = UmlStoreConfig {
            database: Some("model.db".to_string()),
            search: SearchConfig { max_results: 7 },
        };

        write_config(&path, &config, false).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), Some(config.clone()));

        assert!(matches!(write_config(&path, &config, false), Err(Error::Config(_))));
        write_config(&path, &config, true).unwrap();
    }

    #[test]
    fn test_search_table_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("umlstore.toml");
        std::fs::write(&path, "database = \"x.db\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.database.as_deref(), Some("x.db"));
        assert_eq!(config.search.max_results, DEFAULT_MAX_RESULTS);
    }

    #[test]
    fn test_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("umlstore.toml");
        std::fs::write(&path, "database = [").unwrap();
        assert!(matches!(load_config(Some(&path)), Err(Error::Config(_))));
    }

    #[test]
    fn test_ensure_db_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db = default_database_path_in(dir.path());
        ensure_db_dir(&db).unwrap();
        assert!(dir.path().join(".umlstore").is_dir());
    }
}

//! Configuration for the study database and CLI
//!
//! Read from `config.toml` in the data directory. Every field is optional;
//! a missing file means all defaults. `STUDY_DATABASE` in the environment
//! overrides the database location.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable that overrides the database path
pub const DATABASE_ENV: &str = "STUDY_DATABASE";

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "study.db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Default CLI output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Plain,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Database file; relative paths are resolved against the data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    #[serde(default)]
    pub default_output: OutputMode,
}

impl StudyConfig {
    /// Default data directory (e.g., ~/.local/share/study-aid)
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("study-aid"))
            .ok_or(ConfigError::DataDirNotFound)
    }

    /// Load `config.toml` from `data_dir`, or defaults if it does not exist
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Database location, in order of precedence: `env_override`,
    /// the configured path, then `study.db` in the data directory.
    pub fn database_path(&self, data_dir: &Path, env_override: Option<String>) -> PathBuf {
        let configured = env_override
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or_else(|| self.database_path.clone());

        match configured {
            Some(path) if path.is_absolute() => path,
            Some(path) => data_dir.join(path),
            None => data_dir.join(DATABASE_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = StudyConfig::load(temp.path()).unwrap();
        assert_eq!(config, StudyConfig::default());
        assert_eq!(
            config.database_path(temp.path(), None),
            temp.path().join("study.db")
        );
    }

    #[test]
    fn test_load_from_toml() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("config.toml"),
            "database_path = \"lectures.db\"\ndefault_output = \"json\"\n",
        )
        .unwrap();

        let config = StudyConfig::load(temp.path()).unwrap();
        assert_eq!(config.default_output, OutputMode::Json);
        assert_eq!(
            config.database_path(temp.path(), None),
            temp.path().join("lectures.db")
        );
    }

    #[test]
    fn test_env_override_wins() {
        let temp = TempDir::new().unwrap();
        let config = StudyConfig {
            database_path: Some(PathBuf::from("configured.db")),
            ..Default::default()
        };
        let override_path = temp.path().join("override.db");

        assert_eq!(
            config.database_path(
                temp.path(),
                Some(override_path.to_string_lossy().to_string())
            ),
            override_path
        );
        assert_eq!(
            config.database_path(temp.path(), Some("  ".to_string())),
            temp.path().join("configured.db")
        );
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.toml"), "default_output = [").unwrap();
        assert!(matches!(
            StudyConfig::load(temp.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}

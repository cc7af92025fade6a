//! Configuration loading for Replyflow components
//!
//! All Replyflow processes share one config directory
//! (~/.config/replyflow/) holding small JSON files. This crate resolves
//! paths inside that directory and reads/writes the files.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Resolve the Replyflow config directory (~/.config/replyflow/).
///
/// Fails on platforms where no user config directory can be determined.
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join("replyflow"))
        .context("Could not determine user config directory")
}

/// Resolve the path of a file inside the Replyflow config directory.
pub fn config_path(filename: &str) -> Result<PathBuf> {
    Ok(config_dir()?.join(filename))
}

/// Check whether a config file exists in the Replyflow config directory.
pub fn config_exists(filename: &str) -> bool {
    config_path(filename).is_ok_and(|p| p.exists())
}

/// Create the Replyflow config directory if it does not exist yet.
///
/// Call once at process startup before saving any config file.
pub fn ensure_config_dir() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    Ok(dir)
}

/// Load and parse a JSON config file from the Replyflow config directory.
pub fn load_json<T: DeserializeOwned>(filename: &str) -> Result<T> {
    load_json_file(&config_path(filename)?)
}

/// Load and parse a JSON file from an arbitrary path.
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Serialize a value as pretty JSON into the Replyflow config directory.
pub fn save_json<T: Serialize>(filename: &str, value: &T) -> Result<()> {
    let path = ensure_config_dir()?.join(filename);
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_config_dir_ends_with_replyflow() {
        let dir = config_dir().unwrap();
        assert!(dir.ends_with("replyflow"));
    }

    #[test]
    fn test_config_path_joins_filename() {
        let path = config_path("assistant.json").unwrap();
        assert!(path.ends_with("replyflow/assistant.json"));
    }

    #[test]
    fn test_load_json_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.json");
        let value = Sample {
            name: "replyflow".to_string(),
            count: 3,
        };
        std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

        let loaded: Sample = load_json_file(&path).unwrap();
        assert_eq!(loaded, value);
    }

    #[test]
    fn test_load_json_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<Sample> = load_json_file(&dir.path().join("absent.json"));
        assert!(result.is_err());
    }
}

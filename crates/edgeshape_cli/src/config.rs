//! edgeshape configuration file handling
//!
//! Settings live in `edgeshape.toml`:
//!
//! ```toml
//! [output]
//! pretty = true
//!
//! [convert]
//! mask = false
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the configuration file looked up in a directory
pub const CONFIG_FILE: &str = "edgeshape.toml";

/// Top-level configuration
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct EdgeshapeConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub convert: ConvertConfig,
}

/// JSON output settings
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct OutputConfig {
    /// Pretty-print JSON
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Conversion settings
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ConvertConfig {
    /// Treat every input as a mask
    #[serde(default)]
    pub mask: bool,
}

fn default_true() -> bool {
    true
}

impl EdgeshapeConfig {
    /// Load an explicit configuration file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Load `edgeshape.toml` from a directory, or defaults if there is none
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_file(&config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("edgeshape-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_defaults() {
        let config: EdgeshapeConfig = toml::from_str("").unwrap();
        assert_eq!(config, EdgeshapeConfig::default());
        assert!(config.output.pretty);
        assert!(!config.convert.mask);
    }

    #[test]
    fn test_partial_sections() {
        let config: EdgeshapeConfig = toml::from_str("[convert]\nmask = true\n").unwrap();
        assert!(config.convert.mask);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_round_trip() {
        let mut config = EdgeshapeConfig::default();
        config.output.pretty = false;
        let text = toml::to_string_pretty(&config).unwrap();
        let reread: EdgeshapeConfig = toml::from_str(&text).unwrap();
        assert_eq!(reread, config);
    }

    #[test]
    fn test_missing_file_in_dir_gives_defaults() {
        let dir = scratch_dir("empty");
        let config = EdgeshapeConfig::load_from_dir(&dir).unwrap();
        assert_eq!(config, EdgeshapeConfig::default());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = scratch_dir("present");
        fs::write(dir.join(CONFIG_FILE), "[output]\npretty = false\n").unwrap();
        let config = EdgeshapeConfig::load_from_dir(&dir).unwrap();
        assert!(!config.output.pretty);
        fs::remove_file(dir.join(CONFIG_FILE)).unwrap();
    }

    #[test]
    fn test_bad_file_reports_path() {
        let dir = scratch_dir("bad");
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, "[output\n").unwrap();
        let err = EdgeshapeConfig::load_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
        fs::remove_file(&path).unwrap();
    }
}

//! Project configuration (mapstyle.yaml) parsing.
//!
//! All settings are optional; command-line flags override them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MapstyleError, Result};

/// Standard configuration filename.
pub const CONFIG_FILENAME: &str = "mapstyle.yaml";

/// Configuration loaded from mapstyle.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Symbolset used when the Mapfile declares none.
    pub symbols_path: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Translate every layer instead of requiring exactly one.
    pub multi: bool,

    /// Patterns skipped by `mapstyle check` when walking directories.
    pub excludes: Vec<String>,
}

fn default_pretty() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols_path: None,
            pretty: default_pretty(),
            multi: false,
            excludes: vec![],
        }
    }
}

impl Config {
    /// Load configuration from a mapstyle.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| MapstyleError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        let mut config = Self::parse(&content)?;

        // relative symbol paths are relative to the config file
        if let (Some(symbols), Some(dir)) = (&config.symbols_path, path.parent()) {
            if symbols.is_relative() {
                config.symbols_path = Some(dir.join(symbols));
            }
        }

        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| MapstyleError::Config {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })
    }

    /// Load `mapstyle.yaml` from `dir` if present, else the defaults.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILENAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check if a path should be excluded based on exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.excludes
            .iter()
            .any(|pattern| Self::matches_pattern(&path_str, pattern))
    }

    /// Simple glob matching: `*.ext`, `dir/*`, `**/dir/*`, or a substring.
    fn matches_pattern(path: &str, pattern: &str) -> bool {
        if let Some(suffix) = pattern.strip_prefix("**/") {
            if let Some(dir) = suffix.strip_suffix("/*") {
                return path.contains(&format!("/{}/", dir)) || path.starts_with(&format!("{}/", dir));
            }
            return path.contains(suffix);
        }

        if let Some(suffix) = pattern.strip_prefix('*') {
            if !pattern.contains('/') {
                return path.ends_with(suffix);
            }
        }

        if let Some(prefix) = pattern.strip_suffix("/*") {
            return path.starts_with(&format!("{}/", prefix)) || path.contains(&format!("/{}/", prefix));
        }

        path.contains(pattern)
    }
}

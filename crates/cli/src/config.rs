use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub output: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            log_filter: "warn".to_string(),
            output: OutputFormat::Text,
        }
    }
}

impl Settings {
    pub fn from_toml(toml_content: &str) -> Result<Self> {
        toml::from_str(toml_content).context("Failed to parse settings TOML")
    }

    /// Defaults when no path is given; a given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read settings file {}", path.display()))?;
                Self::from_toml(&content)
            }
            None => Ok(Settings::default()),
        }
    }
}

//! Configuration handling for the composer CLI

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User configuration for the composer
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ComposerConfig {
    /// Form type used when a script does not name one
    pub form_type: Option<String>,
    /// Hide the title/description/pages/button inputs by default
    pub hide_optional_fields: Option<bool>,
    /// Pretty-print emitted JSON
    pub pretty_output: Option<bool>,
}

impl ComposerConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "form-composer", "form-composer")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: ComposerConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    pub fn form_type_or_default(&self) -> &str {
        self.form_type.as_deref().unwrap_or("")
    }

    pub fn hide_optional_fields_or_default(&self) -> bool {
        self.hide_optional_fields.unwrap_or(false)
    }

    pub fn pretty_output_or_default(&self) -> bool {
        self.pretty_output.unwrap_or(false)
    }
}

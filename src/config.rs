//! Configuration file management
//!
//! Handles reading extbuild's TOML tool settings from project and user
//! locations. These only pick the toolchain; what to build lives in the
//! project manifest.

use crate::extensions::ToolchainOverrides;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Tool settings loaded from TOML files
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Build generator program
    #[serde(default)]
    pub generator: Option<String>,

    /// Interpreter to build against
    #[serde(default)]
    pub interpreter: Option<PathBuf>,
}

impl Config {
    /// Load configuration with default options.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn load(project_root: &Path) -> Result<Self> {
        Self::load_with_options(project_root, None, false)
    }

    /// Load configuration with custom options.
    /// Priority: custom path -> `<project>/.extbuild/config.toml` -> user config.
    ///
    /// # Arguments
    /// * `project_root` - Directory holding the project manifest
    /// * `custom_path` - Optional custom path to config file (overrides defaults)
    /// * `skip_rc` - If true, skip loading config files (return default config)
    ///
    /// # Errors
    ///
    /// Returns an error if config file reading or parsing fails.
    pub fn load_with_options(
        project_root: &Path,
        custom_path: Option<&Path>,
        skip_rc: bool,
    ) -> Result<Self> {
        if skip_rc {
            return Ok(Self::default());
        }

        if let Some(path) = custom_path {
            return Self::load_from(path);
        }

        let local = project_root.join(".extbuild").join("config.toml");
        if local.is_file() {
            return Self::load_from(&local);
        }

        if let Some(config_dir) = Self::user_config_dir() {
            let config_path = config_dir.join("config.toml");
            if config_path.is_file() {
                return Self::load_from(&config_path);
            }
        }

        Ok(Self::default())
    }

    fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        crate::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    fn user_config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join("extbuild"));
        }

        dirs::home_dir().map(|home| home.join(".config").join("extbuild"))
    }

    /// Toolchain choices this config contributes
    pub fn overrides(&self) -> ToolchainOverrides {
        ToolchainOverrides {
            generator: self.generator.clone(),
            interpreter: self.interpreter.clone(),
        }
    }
}

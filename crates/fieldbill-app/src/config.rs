//! Configuration management for fieldbill
//!
//! Config stored at: ~/.config/fieldbill/config.json

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use fieldbill_domain::service::LastRowPolicy;
use fieldbill_types::{ConfigError, OutputFormat, Result};

const APP_DIR: &str = "fieldbill";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// What removing the last consumable row does
    #[serde(default)]
    pub last_row_policy: LastRowPolicy,

    /// Pricing plan applied to new invoices
    #[serde(default)]
    pub pricing_plan: Option<PathBuf>,

    /// Data directory override (app state, outbox)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Table,
            last_row_policy: LastRowPolicy::KeepRow,
            pricing_plan: None,
            data_dir: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NotFound)?.join(APP_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir().ok_or(ConfigError::NotFound)?.join(APP_DIR);
        Ok(data_dir)
    }

    pub fn outbox_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("outbox"))
    }

    /// Load config from the default location, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Fieldbill Configuration")?;
        writeln!(f, "=======================")?;
        writeln!(f)?;
        writeln!(f, "Output format:  {}", self.output_format)?;
        writeln!(f, "Last row:       {}", self.last_row_policy)?;
        writeln!(
            f,
            "Pricing plan:   {}",
            self.pricing_plan
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".to_string())
        )?;
        writeln!(
            f,
            "Data dir:       {}",
            self.data_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}

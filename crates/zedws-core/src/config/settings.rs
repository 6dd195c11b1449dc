use crate::Result;
use crate::location::NormalizeOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use zedws_types::{LaunchCommand, LaunchTarget};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub launch: LaunchConfig,
}

impl Config {
    /// Load config from file. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        super::validation::warn_unknown_fields(&content, "config.json");
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Normalizer options derived from the search section
    #[must_use]
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            unix_paths_as_wsl: self.search.unix_paths_as_wsl,
        }
    }
}

/// Where and how to read Zed's database
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Explicit path to `db.sqlite`; discovered when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,

    /// Preferred release channel directory (`0-stable`, `0-preview`, ...)
    #[serde(default = "default_channel")]
    pub channel: String,

    /// How long to wait on a database locked by Zed
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

fn default_channel() -> String {
    "stable".to_string()
}
fn default_busy_timeout() -> u64 {
    5000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            channel: default_channel(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    /// Maximum items handed to the host (0 = unlimited)
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Treat bare Linux paths as WSL workspaces in the default distro
    #[serde(default = "default_unix_paths_as_wsl")]
    pub unix_paths_as_wsl: bool,
}

fn default_max_results() -> usize {
    50
}
fn default_unix_paths_as_wsl() -> bool {
    NormalizeOptions::default().unix_paths_as_wsl
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            unix_paths_as_wsl: default_unix_paths_as_wsl(),
        }
    }
}

/// Programs used to reopen a workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConfig {
    #[serde(default = "default_zed_command")]
    pub zed_command: String,

    #[serde(default = "default_wsl_command")]
    pub wsl_command: String,
}

fn default_zed_command() -> String {
    "zed".to_string()
}
fn default_wsl_command() -> String {
    "wsl".to_string()
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            zed_command: default_zed_command(),
            wsl_command: default_wsl_command(),
        }
    }
}

impl LaunchConfig {
    /// Resolve a launch payload into a program invocation
    #[must_use]
    pub fn command_for(&self, target: &LaunchTarget) -> LaunchCommand {
        target.command(&self.zed_command, &self.wsl_command)
    }
}

//! Launcher configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Resolve the global data directory (`~/.sqlkit/`).
pub fn global_data_dir() -> PathBuf {
    dirs::home_dir().expect("no home directory").join(".sqlkit")
}

/// Describes how to resolve one provider's native server binary.
///
/// Constructed by defensively cloning a caller-supplied base config and
/// substituting the provider's executable names; immutable afterwards.
/// Field names match the download service's JSON configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Directory the binary is installed into.
    pub install_directory: PathBuf,
    /// Acceptable binary names, in preference order (platform variants).
    #[serde(default)]
    pub executable_files: Vec<String>,
    /// Pass-through settings for the download service. Opaque to the
    /// launcher.
    #[serde(default)]
    pub download: Map<String, Value>,
}

impl ProviderConfig {
    /// Clone `base` with this provider's executable names substituted.
    pub fn for_executables(base: &ProviderConfig, executable_files: &[&str]) -> Self {
        let mut config = base.clone();
        config.executable_files = executable_files.iter().map(|f| (*f).to_owned()).collect();
        config
    }
}

/// Host-wide settings consumed at launch time only (not live-reloaded).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    /// Tracing level forwarded to the server, when set.
    #[serde(default)]
    pub tracing_level: Option<String>,
    /// Log directory override. Defaults to `~/.sqlkit/logs`.
    #[serde(default)]
    pub log_directory: Option<PathBuf>,
}

impl HostConfig {
    /// Parse a TOML string into a `HostConfig`.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config = toml::from_str(toml_str).context("failed to parse host configuration")?;
        Ok(config)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// The effective log directory.
    pub fn log_directory(&self) -> PathBuf {
        self.log_directory
            .clone()
            .unwrap_or_else(|| global_data_dir().join("logs"))
    }
}

//! TaskMaster configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::persistence::STORAGE_KEY;

/// Default prompt sent to the breakdown service
pub const DEFAULT_PROMPT: &str = "Break the following task into 3-5 short, actionable subtasks: \"{{title}}\"";

/// Project-local config file, looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = ".taskmaster.yml";

/// Main TaskMaster configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where state is persisted
    pub storage: StorageConfig,

    /// AI breakdown provider
    pub breakdown: BreakdownConfig,

    /// File this config was read from, None for built-in defaults
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must load. Otherwise the first readable file from
    /// [`Config::search_paths`] wins; unreadable ones are skipped with a
    /// warning, and defaults apply when none is found.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for path in Self::search_paths().into_iter().filter(|p| p.exists()) {
            match Self::load_from_file(&path) {
                Ok(config) => return Ok(config),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Config::load: skipping config"),
            }
        }

        tracing::info!("Config::load: no config file found, using defaults");
        Ok(Self::default())
    }

    /// Implicit config locations, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("taskmaster").join("taskmaster.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let mut config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.source = Some(path.to_path_buf());

        tracing::debug!(path = %path.display(), "load_from_file: loaded");
        Ok(config)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the slot files (`~/` is expanded)
    #[serde(rename = "data-dir")]
    pub data_dir: String,

    /// Key the state document is stored under
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // XDG data directory (~/.local/share/taskmaster on Linux)
        let data_dir = dirs::data_dir()
            .map(|d| d.join("taskmaster"))
            .unwrap_or_else(|| PathBuf::from(".taskmaster"))
            .to_string_lossy()
            .into_owned();

        Self {
            data_dir,
            key: STORAGE_KEY.to_string(),
        }
    }
}

impl StorageConfig {
    /// Data directory with a leading `~/` resolved
    pub fn expanded_data_dir(&self) -> PathBuf {
        match self.data_dir.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(&self.data_dir)),
            None => PathBuf::from(&self.data_dir),
        }
    }
}

/// Breakdown provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakdownConfig {
    /// Provider name (currently only "gemini" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds; no timeout when unset
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: Option<u64>,

    /// Handlebars prompt template, rendered with `title`
    pub prompt: String,
}

impl Default for BreakdownConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_ms: None,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl BreakdownConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| eyre::eyre!("API key not found. Set the {} environment variable.", self.api_key_env))
    }
}

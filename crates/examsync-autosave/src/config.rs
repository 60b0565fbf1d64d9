//! examsync configuration and transport factory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::http::{HttpTransport, DEFAULT_TIMEOUT_SECS};
use crate::transport::SaveTransport;

/// Where and how autosaves are sent.
///
/// Note: Custom Debug impl masks the API token.
#[derive(Clone, Serialize, Deserialize)]
pub struct AutosaveConfig {
    /// Base URL of the exam backend. Saves go to `{base_url}/attempts/{id}/autosave`.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_quiet_period_ms")]
    pub quiet_period_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for AutosaveConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutosaveConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("quiet_period_ms", &self.quiet_period_ms)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AutosaveConfig {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_token: None,
            quiet_period_ms: default_quiet_period_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Key prefix for persisted attempts.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Root directory holding one subdirectory per session.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            storage_dir: default_storage_dir(),
        }
    }
}

/// Top-level examsync configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamsyncConfig {
    #[serde(default)]
    pub autosave: AutosaveConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

fn default_quiet_period_ms() -> u64 {
    2000
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_namespace() -> String {
    "examsync.attempt".to_string()
}
fn default_storage_dir() -> PathBuf {
    std::env::temp_dir().join("examsync-sessions")
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `examsync.toml` in the current directory
/// 2. `~/.config/examsync/config.toml`
///
/// Environment variable overrides: `EXAMSYNC_API_TOKEN`, `EXAMSYNC_BASE_URL`.
pub fn load_config() -> Result<ExamsyncConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamsyncConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("examsync.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => parse_config_file(&path)?,
        None => ExamsyncConfig::default(),
    };

    if let Ok(token) = std::env::var("EXAMSYNC_API_TOKEN") {
        config.autosave.api_token = Some(token);
    }
    if let Ok(url) = std::env::var("EXAMSYNC_BASE_URL") {
        config.autosave.base_url = Some(url);
    }

    config.autosave.api_token = config
        .autosave
        .api_token
        .as_deref()
        .map(resolve_env_vars)
        .filter(|t| !t.is_empty());
    config.autosave.base_url = config.autosave.base_url.as_deref().map(resolve_env_vars);

    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<ExamsyncConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<ExamsyncConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examsync"))
}

/// Create the HTTP transport described by `config`.
pub fn create_transport(config: &AutosaveConfig) -> Result<Box<dyn SaveTransport>> {
    let base_url = config
        .base_url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .context("autosave.base_url is not configured (set it in examsync.toml or EXAMSYNC_BASE_URL)")?;
    let transport = HttpTransport::new(base_url, config.api_token.clone(), config.timeout_secs)?;
    Ok(Box::new(transport))
}

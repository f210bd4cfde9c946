//! Configuration file management for comeback.
//!
//! Provides a TOML-based config file at `~/.config/comeback/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use comeback_core::GenerationError;
use comeback_core::provider::{API_KEY_ENV_VARS, ProviderConfig, api_key_from_env};

pub const MODEL_ENV_VAR: &str = "COMEBACK_MODEL";
pub const PROVIDER_URL_ENV_VAR: &str = "COMEBACK_PROVIDER_URL";

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8787;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub provider: ProviderSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProviderSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the comeback config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/comeback` or `~/.config/comeback`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("comeback");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("comeback")
}

/// Return the path to the comeback config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load the config file, or `None` when there is none.
///
/// A file that exists but does not parse is an error.
pub fn load_config() -> Result<Option<ConfigFile>> {
    let path = config_path();
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(Some(config))
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    // The file holds the provider key.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(path)
}

// -----------------------------------------------------------------------
// Resolution
// -----------------------------------------------------------------------

fn env_value(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve provider settings.
///
/// - API key: `COMEBACK_OPENAI_API_KEY` / `OPENAI_API_KEY` env > `provider.api_key` > error
/// - Model: `cli_model` > `COMEBACK_MODEL` > `provider.model` > default
/// - Base URL: `COMEBACK_PROVIDER_URL` > `provider.base_url` > default
/// - Timeout: `provider.timeout_secs` > default
pub fn resolve_provider(
    file: Option<&ConfigFile>,
    cli_model: Option<&str>,
) -> Result<ProviderConfig, GenerationError> {
    let section = file.map(|f| &f.provider);

    let api_key = api_key_from_env()
        .or_else(|| section.and_then(|s| s.api_key.clone()))
        .ok_or_else(|| {
            GenerationError::Configuration(format!(
                "provider API key not found; set {} or run `comeback init --api-key <KEY>`",
                API_KEY_ENV_VARS.join(" or ")
            ))
        })?;
    let mut config = ProviderConfig::new(api_key)?;

    let model = cli_model
        .map(str::to_string)
        .or_else(|| env_value(MODEL_ENV_VAR))
        .or_else(|| section.and_then(|s| s.model.clone()));
    if let Some(model) = model {
        config = config.with_model(model);
    }

    let base_url = env_value(PROVIDER_URL_ENV_VAR).or_else(|| section.and_then(|s| s.base_url.clone()));
    if let Some(url) = base_url {
        config = config.with_base_url(url);
    }

    if let Some(secs) = section.and_then(|s| s.timeout_secs) {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    Ok(config)
}

/// Resolve the listen address: CLI flag > `server` section > default.
pub fn resolve_listen(file: Option<&ConfigFile>, cli_bind: Option<&str>, cli_port: Option<u16>) -> (String, u16) {
    let section = file.map(|f| &f.server);
    let bind = cli_bind
        .map(str::to_string)
        .or_else(|| section.and_then(|s| s.bind.clone()))
        .unwrap_or_else(|| DEFAULT_BIND.to_string());
    let port = cli_port
        .or_else(|| section.and_then(|s| s.port))
        .unwrap_or(DEFAULT_PORT);
    (bind, port)
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

//! Configuration file handling for the CLI.
//!
//! Settings load in three layers: built-in defaults, the TOML file under
//! `~/.lectern/`, then environment variables for secrets.

use std::path::{Path, PathBuf};

use lectern::AppConfig;
use tracing::{debug, info};

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Get the default config directory path.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lectern")
}

/// Get the default config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Load configuration from a specific path, falling back to defaults when
/// the file does not exist.
pub async fn load_config_from(path: &Path) -> ConfigResult<AppConfig> {
    if !path.exists() {
        info!(path = %path.display(), "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config: AppConfig = toml::from_str(&content)?;
    debug!(path = %path.display(), "loaded config file");

    Ok(config)
}

/// Save configuration to a specific path, creating parent directories.
pub async fn save_config_to(config: &AppConfig, path: &Path) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let content = toml::to_string_pretty(config)?;
    tokio::fs::write(path, content).await?;
    info!(path = %path.display(), "saved config file");

    Ok(())
}

/// Overlay secrets from the environment onto a loaded configuration.
///
/// Reads `DEEPSEEK_API_KEY`, `BAIDU_TTS_API_KEY` and `BAIDU_TTS_SECRET_KEY`;
/// set variables win over file values.
pub fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(key) = std::env::var("DEEPSEEK_API_KEY") {
        config.chat.api_key = key;
    }
    if let Ok(key) = std::env::var("BAIDU_TTS_API_KEY") {
        config.speech.api_key = key;
    }
    if let Ok(key) = std::env::var("BAIDU_TTS_SECRET_KEY") {
        config.speech.secret_key = key;
    }
}

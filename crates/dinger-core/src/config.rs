// Configuration loading and parsing (config/board.toml).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::classify::TierScheme;
use crate::client::DataSource;

/// Default board.toml, written to `config/` on first run.
pub const DEFAULT_CONFIG: &str = include_str!("../defaults/board.toml");

/// Environment variable that overrides `backend.base_url`.
pub const BASE_URL_ENV: &str = "DINGER_BASE_URL";

const CONFIG_FILE: &str = "board.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to write default config: {message}")]
    DefaultsWriteError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Scheme, host and port of the projections backend.
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub tier_scheme: TierScheme,
    /// Dataset requested at startup; toggled at runtime with `t`.
    #[serde(default)]
    pub data_source: DataSource,
}

fn default_timeout_secs() -> u64 {
    15
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/board.toml` relative to `base_dir`.
///
/// Does not write defaults and ignores the environment; prefer
/// `load_config()` for the full startup behavior.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Write the default board.toml into `base_dir/config/` if none exists.
/// Returns the path when a file was created. Existing files are never
/// overwritten.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let config_dir = base_dir.join("config");
    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsWriteError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let target = config_dir.join(CONFIG_FILE);
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut dest) => {
            std::io::Write::write_all(&mut dest, DEFAULT_CONFIG.as_bytes()).map_err(|e| {
                ConfigError::DefaultsWriteError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            Ok(Some(target))
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(ConfigError::DefaultsWriteError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

/// Replace `backend.base_url` with an override value, re-validating it.
pub fn apply_base_url_override(
    mut config: Config,
    base_url: Option<String>,
) -> Result<Config, ConfigError> {
    if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
        config.backend.base_url = url.trim().to_string();
        validate(&config)?;
    }
    Ok(config)
}

/// Convenience wrapper: loads config relative to the current working
/// directory, writing the default file first if needed, then applies the
/// `DINGER_BASE_URL` override.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    let config = load_config_from(&cwd)?;
    apply_base_url_override(config, std::env::var(BASE_URL_ENV).ok())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let url = &config.backend.base_url;
    match reqwest::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(parsed) => {
            return Err(ConfigError::ValidationError {
                field: "backend.base_url".into(),
                message: format!("unsupported scheme `{}`", parsed.scheme()),
            });
        }
        Err(e) => {
            return Err(ConfigError::ValidationError {
                field: "backend.base_url".into(),
                message: format!("not a valid URL ({e}): {url}"),
            });
        }
    }

    if config.backend.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "backend.timeout_secs".into(),
            message: "must be > 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

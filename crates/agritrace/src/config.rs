//! JSON configuration: where the database lives, where media files are
//! kept, and how the token sealing key is resolved.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::db;
use crate::error::ConfigError;

/// Config file format version this build understands.
const SUPPORTED_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_media_directory")]
    pub media_directory: String,
    #[serde(default)]
    pub token: TokenKeyConfig,
}

fn default_database_url() -> String {
    db::default_database_url().unwrap_or_else(|| "sqlite://agritrace.db?mode=rwc".to_string())
}

fn default_media_directory() -> String {
    dirs::home_dir()
        .map(|home| {
            home.join(".agritrace")
                .join("media")
                .to_string_lossy()
                .into_owned()
        })
        .unwrap_or_else(|| "media".to_string())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: SUPPORTED_VERSION.to_string(),
            database_url: default_database_url(),
            media_directory: default_media_directory(),
            token: TokenKeyConfig::default(),
        }
    }
}

impl Config {
    /// Media directory with `~` expanded, ready to hand to the store.
    pub fn media_root(&self) -> PathBuf {
        PathBuf::from(expand_tilde(&self.media_directory))
    }
}

/// Where the token sealing key comes from; sources are tried in order:
/// direct value, key file, environment variable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenKeyConfig {
    /// Hex key inline. Handy for local testing, not for deployments.
    #[serde(default)]
    pub key: Option<String>,
    /// Path to a file holding the hex key (Docker secrets pattern).
    #[serde(default)]
    pub key_file: Option<String>,
    /// Name of an environment variable holding the hex key.
    #[serde(default)]
    pub key_env_var: Option<String>,
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != SUPPORTED_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    let url = &config.database_url;
    if !(url.starts_with("sqlite:")
        || url.starts_with("postgres://")
        || url.starts_with("postgresql://"))
    {
        return Err(ConfigError::Validation {
            message: format!("Unsupported database URL scheme: {}", url),
        });
    }

    if config.media_directory.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "media_directory must not be empty".to_string(),
        });
    }

    Ok(())
}

/// Expands `~` to the user's home directory.
///
/// Works cross-platform: checks HOME (Unix) then USERPROFILE (Windows).
/// Handles both `~/path` and standalone `~`; `~user/path` syntax is not
/// supported.
pub(crate) fn expand_tilde(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
            if path == "~" {
                return home.to_string_lossy().into_owned();
            }
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

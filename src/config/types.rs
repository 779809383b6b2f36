//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::{
    default_max_line_len, default_nick, default_port, default_queue_size, default_quit_message,
    default_realname, default_username,
};

/// Smallest line limit that still fits a standard 512-byte IRC line.
const MIN_LINE_LEN: usize = 512;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Registration identity used for every new connection.
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Connection and transport settings.
    #[serde(default)]
    pub connection: ConnectionConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    ///
    /// Used for the implicit config location only; an explicitly named file
    /// that is missing goes through [`Config::load`] and fails.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let nick = &self.identity.nick;
        if nick.is_empty() || nick.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "identity.nick must be a single word, got {nick:?}"
            )));
        }
        if self.identity.username.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "identity.username must not be empty".into(),
            ));
        }
        if self.connection.default_port == 0 {
            return Err(ConfigError::Invalid(
                "connection.default_port must be non-zero".into(),
            ));
        }
        if self.connection.max_line_len < MIN_LINE_LEN {
            return Err(ConfigError::Invalid(format!(
                "connection.max_line_len must be at least {MIN_LINE_LEN}"
            )));
        }
        Ok(())
    }
}

/// Registration identity (NICK / USER).
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Initial nickname.
    #[serde(default = "default_nick")]
    pub nick: String,
    /// Username (ident).
    #[serde(default = "default_username")]
    pub username: String,
    /// Real name.
    #[serde(default = "default_realname")]
    pub realname: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            nick: default_nick(),
            username: default_username(),
            realname: default_realname(),
        }
    }
}

/// Connection settings shared by every server.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    /// Port used when `server <host>` omits one (default: 6667).
    #[serde(default = "default_port")]
    pub default_port: u16,
    /// Maximum inbound line length in bytes (default: 4096).
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
    /// Depth of each server's event queue (default: 256).
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,
    /// Message sent with QUIT when `quit` has no argument.
    #[serde(default = "default_quit_message")]
    pub quit_message: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            default_port: default_port(),
            max_line_len: default_max_line_len(),
            queue_size: default_queue_size(),
            quit_message: default_quit_message(),
        }
    }
}

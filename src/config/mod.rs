//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions (Config, IdentityConfig, ConnectionConfig)
//! - [`defaults`]: serde default value functions
//!
//! Configuration is read-only: the client never writes it back.

mod defaults;
mod types;

pub use types::{Config, ConfigError, ConnectionConfig, IdentityConfig};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SLIRC_CONFIG";

/// Config file looked up in the working directory when none is named.
pub const DEFAULT_CONFIG_PATH: &str = "slirc.toml";

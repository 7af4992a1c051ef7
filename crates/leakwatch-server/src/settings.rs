//! Server configuration, read from a TOML file and `LEAKWATCH_*` environment
//! variables.
//!
//! Nested keys use `__` in the environment, e.g. `LEAKWATCH_PUSH__MODE=fcm`
//! or `LEAKWATCH_DISPATCH__CALL_TIMEOUT_SECS=5`.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use leakwatch_dispatch::DispatchConfig;
use leakwatch_fcm::FcmConfig;
use serde::Deserialize;

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("leakwatch.sqlite3") }

/// Runtime server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  /// SQLite file holding hub and user records. A leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default)]
  pub dispatch:   DispatchConfig,
  #[serde(default)]
  pub push:       PushSettings,
}

/// Which push sender to use.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PushSettings {
  /// Log messages without delivering them.
  #[default]
  Log,
  Fcm(FcmConfig),
}

/// Load configuration from `path` (optional) overlaid with the environment.
pub fn load(path: &Path) -> Result<ServerConfig, ConfigError> {
  Config::builder()
    .add_source(File::from(path).required(false))
    .add_source(env_source())
    .build()?
    .try_deserialize()
}

fn env_source() -> Environment {
  Environment::with_prefix("LEAKWATCH")
    .prefix_separator("_")
    .separator("__")
    .try_parsing(true)
}

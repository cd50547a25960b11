//! # Opener Configuration
//!
//! Layered configuration: built-in defaults, then an optional TOML file, then
//! `OPENER_*` environment variables.
//!
//! ```toml
//! # config/opener.toml
//! log_level = "info"
//! event_channel_capacity = 512
//! dedupe_handlers = true
//! ```
//!
//! `OPENER_ENV` selects the environment name; every other field maps to
//! `OPENER_<FIELD>` (for example `OPENER_EVENT_CHANNEL_CAPACITY=64`).

use crate::error::{OpenerError, OpenerResult};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "config/opener.toml";

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenerConfig {
    pub environment: String,
    pub log_level: String,
    /// Buffer size of the async event streams behind each emitter.
    pub event_channel_capacity: usize,
    /// Rank a handler instance once even if it is both contributed and added.
    pub dedupe_handlers: bool,
}

impl Default for OpenerConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "debug".to_string(),
            event_channel_capacity: 256,
            dedupe_handlers: true,
        }
    }
}

impl OpenerConfig {
    /// Load defaults, then `path` (or [`DEFAULT_CONFIG_PATH`]) if it exists,
    /// then the environment.
    pub fn load(path: Option<&Path>) -> OpenerResult<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        debug!(path = %path.display(), "Loading opener configuration");

        let file = File::from(path).format(FileFormat::Toml).required(false);
        Self::assemble(Some(file))
    }

    /// Defaults plus environment variables only.
    pub fn from_env() -> OpenerResult<Self> {
        Self::assemble(None)
    }

    /// Parse a TOML document on top of the defaults, ignoring the environment.
    pub fn from_toml_str(source: &str) -> OpenerResult<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn assemble(file: Option<File<config::FileSourceFile, FileFormat>>) -> OpenerResult<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);
        if let Some(file) = file {
            builder = builder.add_source(file);
        }
        let config: Self = builder
            .add_source(Environment::with_prefix("OPENER").try_parsing(true))
            .set_override_option("environment", std::env::var("OPENER_ENV").ok())?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> OpenerResult<()> {
        if self.event_channel_capacity == 0 {
            return Err(OpenerError::Configuration(
                "event_channel_capacity must be greater than zero".to_string(),
            ));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(OpenerError::Configuration(format!(
                "Invalid log_level '{}', expected one of {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}

//! Error types for opener resolution.

use thiserror::Error;

/// Error type returned by open handler implementations.
///
/// Handlers own their failure vocabulary; the registry only forwards it.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum OpenerError {
    /// Every candidate scored zero or below, or no handler is registered.
    #[error("There is no opener for {uri}.")]
    NoOpener { uri: String },
    /// The winning handler failed while opening. Forwarded unchanged.
    #[error(transparent)]
    HandlerOpen(BoxError),
    #[error("Contribution type mismatch: capability '{capability}' was bound with a different type")]
    ContributionTypeMismatch { capability: String },
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl OpenerError {
    /// Build the error reported when no handler accepts `uri`.
    pub fn no_opener(uri: impl std::fmt::Display) -> Self {
        OpenerError::NoOpener {
            uri: uri.to_string(),
        }
    }

    /// True when the failure came from resolution rather than from a handler.
    pub fn is_no_opener(&self) -> bool {
        matches!(self, OpenerError::NoOpener { .. })
    }
}

impl From<config::ConfigError> for OpenerError {
    fn from(error: config::ConfigError) -> Self {
        OpenerError::Configuration(error.to_string())
    }
}

pub type OpenerResult<T> = std::result::Result<T, OpenerError>;

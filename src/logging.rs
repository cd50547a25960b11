//! # Structured Logging Module
//!
//! Environment-aware structured logging for hosts embedding the opener
//! service. Library code only emits `tracing` events; installing a subscriber
//! is left to the host, which can call [`init_structured_logging`] or bring
//! its own.

use crate::config::OpenerConfig;
use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize logging from the environment (`OPENER_ENV`, `RUST_LOG`).
pub fn init_structured_logging() {
    let environment = get_environment();
    let log_level = get_log_level(&environment).to_string();
    init_with_level(&environment, log_level);
}

/// Initialize logging using the level from a loaded configuration.
pub fn init_from_config(config: &OpenerConfig) {
    init_with_level(&config.environment, config.log_level.clone());
}

fn init_with_level(environment: &str, log_level: String) {
    LOGGER_INITIALIZED.get_or_init(|| {
        // RUST_LOG wins over the configured level
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));
        let json = use_json_format();

        let console = if json {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        // Tolerate a subscriber installed by the host application
        if tracing_subscriber::registry().with(console).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            environment = %environment,
            log_level = %log_level,
            json,
            "Structured logging initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("OPENER_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

fn use_json_format() -> bool {
    std::env::var("OPENER_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Log structured data for opener operations
pub fn log_opener_operation(
    operation: &str,
    uri: &str,
    handler: Option<&str>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        uri = %uri,
        handler = handler,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "OPENER_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}

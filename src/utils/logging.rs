//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the PG Admin application.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::config::LoggingConfig;
use crate::utils::errors::{PgAdminError, Result};

/// Initialize logging based on configuration.
///
/// Console output goes to stderr so it never interleaves with shell output.
/// When a log directory is configured a daily rolling file is added; the
/// returned guard must be held for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| PgAdminError::Config(format!("Invalid log filter: {}", e)))?;

    let console = if config.json {
        tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stderr).boxed()
    };

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, &config.file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| PgAdminError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a remote API call outcome
pub fn log_api_call(method: &str, path: &str, status: Option<u16>, duration_ms: u64, success: bool) {
    if success {
        debug!(
            method = method,
            path = path,
            status = status,
            duration_ms = duration_ms,
            "API call completed"
        );
    } else {
        warn!(
            method = method,
            path = path,
            status = status,
            duration_ms = duration_ms,
            "API call failed"
        );
    }
}

/// Log a login attempt result
pub fn log_login_attempt(email: &str, success: bool, attempt_count: u32) {
    if success {
        info!(email = email, "Login succeeded");
    } else {
        warn!(email = email, attempt_count = attempt_count, "Login attempt failed");
    }
}

/// Log the start of a lockout episode
pub fn log_lockout(attempt_count: u32, lockout_seconds: u64, next_multiplier: u32) {
    warn!(
        attempt_count = attempt_count,
        lockout_seconds = lockout_seconds,
        next_multiplier = next_multiplier,
        "Login locked out"
    );
}

/// Log resource management actions
pub fn log_resource_action(resource: &str, action: &str, id: Option<&str>, success: bool) {
    if success {
        info!(
            resource = resource,
            action = action,
            id = id,
            "Resource action performed"
        );
    } else {
        error!(
            resource = resource,
            action = action,
            id = id,
            "Resource action failed"
        );
    }
}

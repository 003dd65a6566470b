//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{PgAdminError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_api_config(&settings.api)?;
    validate_lockout_config(&settings.lockout)?;
    validate_storage_config(&settings.storage)?;
    validate_pagination_config(&settings.pagination)?;
    validate_logging_config(&settings.logging)?;

    if settings.notification.enabled {
        validate_notification_config(&settings.notification)?;
    }

    Ok(())
}

/// Validate API configuration
fn validate_api_config(config: &super::ApiConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(PgAdminError::Config(
            "API base URL is required".to_string()
        ));
    }

    url::Url::parse(&config.base_url)?;

    if config.timeout_seconds == 0 {
        return Err(PgAdminError::Config(
            "API timeout must be greater than 0".to_string()
        ));
    }

    let endpoints = &config.endpoints;
    if endpoints.login.is_empty() {
        return Err(PgAdminError::Config(
            "Login endpoint is required".to_string()
        ));
    }

    for (name, resource) in [
        ("guests", &endpoints.guests),
        ("reviews", &endpoints.reviews),
        ("rent", &endpoints.rent),
    ] {
        for path in [&resource.get, &resource.update, &resource.delete] {
            if !path.contains("{id}") {
                return Err(PgAdminError::Config(
                    format!("Endpoint '{}' for {} must contain an {{id}} placeholder", path, name)
                ));
            }
        }
        if resource.list.is_empty() || resource.create.is_empty() {
            return Err(PgAdminError::Config(
                format!("List and create endpoints for {} are required", name)
            ));
        }
    }

    Ok(())
}

/// Validate lockout policy
fn validate_lockout_config(config: &super::LockoutConfig) -> Result<()> {
    if config.max_attempts == 0 {
        return Err(PgAdminError::Config(
            "Max login attempts must be greater than 0".to_string()
        ));
    }

    if config.base_lockout_seconds == 0 {
        return Err(PgAdminError::Config(
            "Base lockout duration must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.state_path.is_empty() {
        return Err(PgAdminError::Config(
            "State file path is required".to_string()
        ));
    }

    Ok(())
}

/// Validate pagination configuration
fn validate_pagination_config(config: &super::PaginationConfig) -> Result<()> {
    if config.guests_page_size == 0 {
        return Err(PgAdminError::Config(
            "Guest page size must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate notification configuration
fn validate_notification_config(config: &super::NotificationConfig) -> Result<()> {
    if config.endpoint.is_empty() {
        return Err(PgAdminError::Config(
            "Notification endpoint is required".to_string()
        ));
    }

    if config.service_id.is_empty() || config.template_id.is_empty() || config.user_id.is_empty() {
        return Err(PgAdminError::Config(
            "Notification service, template and user IDs are required".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(PgAdminError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(PgAdminError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::path::Path;
use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub api: ApiConfig,
    pub lockout: LockoutConfig,
    pub storage: StorageConfig,
    pub notification: NotificationConfig,
    pub pagination: PaginationConfig,
    pub logging: LoggingConfig,
}

/// Backend REST API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub endpoints: EndpointsConfig,
}

/// Path templates of every remote operation, `{id}` is substituted per call
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointsConfig {
    pub login: String,
    pub guests: ResourceEndpoints,
    pub reviews: ResourceEndpoints,
    pub rent: ResourceEndpoints,
}

/// CRUD paths of one resource collection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResourceEndpoints {
    pub list: String,
    pub get: String,
    pub create: String,
    pub update: String,
    pub delete: String,
}

/// Login lockout policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LockoutConfig {
    pub max_attempts: u32,
    pub base_lockout_seconds: u64,
}

/// Local state persistence
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub state_path: String,
}

/// Transactional email sent after a successful login
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    pub user_id: String,
    pub timeout_seconds: u64,
}

/// List pagination
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaginationConfig {
    pub guests_page_size: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<String>,
    pub file_name: String,
    pub json: bool,
}

impl Settings {
    /// Load settings from `config.toml` (if present) and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::load(None)
    }

    /// Load settings, layering an optional explicit file and `PGADMIN__*` variables over defaults
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("PGADMIN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::PgAdminError> {
        super::validation::validate_settings(self)
    }
}

impl ResourceEndpoints {
    fn new(list: &str, get: &str, create: &str, update: &str, delete: &str) -> Self {
        Self {
            list: list.to_string(),
            get: get.to_string(),
            create: create.to_string(),
            update: update.to_string(),
            delete: delete.to_string(),
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            login: "loginWithEmail".to_string(),
            guests: ResourceEndpoints::new(
                "getDetailsof/guests",
                "getDetailsof/guests/{id}",
                "add/guests",
                "getDetailsof/guests/{id}",
                "delete/guests/{id}",
            ),
            reviews: ResourceEndpoints::new(
                "reviews",
                "reviews/{id}",
                "reviews",
                "reviews/{id}",
                "reviews/{id}",
            ),
            // Update and delete live under a different prefix than get on the backend
            rent: ResourceEndpoints::new(
                "get/payments",
                "payments/{id}",
                "add/payments",
                "rent-details/{id}",
                "rent-details/{id}",
            ),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "https://api-hammadii-6.onrender.com/".to_string(),
                timeout_seconds: 15,
                user_agent: format!("pg-admin/{}", env!("CARGO_PKG_VERSION")),
                endpoints: EndpointsConfig::default(),
            },
            lockout: LockoutConfig {
                max_attempts: 3,
                base_lockout_seconds: 60,
            },
            storage: StorageConfig {
                state_path: ".pg-admin/lockout.json".to_string(),
            },
            notification: NotificationConfig {
                enabled: false,
                endpoint: "https://api.emailjs.com/api/v1.0/email/send".to_string(),
                service_id: String::new(),
                template_id: String::new(),
                user_id: String::new(),
                timeout_seconds: 10,
            },
            pagination: PaginationConfig {
                guests_page_size: 6,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: None,
                file_name: "pg-admin.log".to_string(),
                json: false,
            },
        }
    }
}

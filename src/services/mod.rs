//! Services module
//!
//! Remote API client, login controller and login notification

pub mod api;
pub mod auth;
pub mod notification;

// Re-export commonly used services
pub use api::{ApiClient, AuthApi, RemoteResource, ResourceApi};
pub use auth::{LoginController, LoginSuccess};
pub use notification::{DisabledNotifier, EmailNotifier, LoginNotifier};

use std::sync::Arc;
use crate::config::settings::Settings;
use crate::state::lockout::LockoutPolicy;
use crate::state::storage::{FileStateStorage, LockoutStore};
use crate::utils::clock::{Clock, SystemClock};
use crate::utils::errors::Result;

/// Service factory for creating and wiring all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub api: Arc<ApiClient>,
    pub notifier: Arc<dyn LoginNotifier>,
    pub lockout_store: Arc<dyn LockoutStore>,
    pub clock: Arc<dyn Clock>,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings) -> Result<Self> {
        let api = Arc::new(ApiClient::new(&settings.api)?);
        let notifier: Arc<dyn LoginNotifier> = if settings.notification.enabled {
            Arc::new(EmailNotifier::new(settings.notification.clone())?)
        } else {
            Arc::new(DisabledNotifier)
        };
        let lockout_store = Arc::new(FileStateStorage::new(&settings.storage.state_path));

        Ok(Self {
            api,
            notifier,
            lockout_store,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the lockout store
    pub fn with_lockout_store(mut self, store: Arc<dyn LockoutStore>) -> Self {
        self.lockout_store = store;
        self
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build a login controller, restoring any saved lockout
    pub async fn login_controller(&self, settings: &Settings) -> LoginController {
        LoginController::restore(
            self.api.clone(),
            Arc::clone(&self.notifier),
            Arc::clone(&self.lockout_store),
            Arc::clone(&self.clock),
            LockoutPolicy::from(&settings.lockout),
        )
        .await
    }

    /// Summary of how services are configured
    pub fn status(&self, settings: &Settings) -> ServiceStatus {
        ServiceStatus {
            api_base_url: self.api.base_url().to_string(),
            notification_enabled: settings.notification.enabled,
            state_path: settings.storage.state_path.clone(),
        }
    }
}

impl std::fmt::Debug for ServiceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceFactory")
            .field("api", &self.api)
            .field("lockout_store", &self.lockout_store)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

/// Configuration summary for all services
#[derive(Debug, Clone)]
pub struct ServiceStatus {
    pub api_base_url: String,
    pub notification_enabled: bool,
    pub state_path: String,
}

impl ServiceStatus {
    /// Human-readable notes about degraded features
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.notification_enabled {
            issues.push("Login notification emails are disabled".to_string());
        }
        if !self.api_base_url.starts_with("https://") {
            issues.push("API is not reached over HTTPS".to_string());
        }

        issues
    }
}

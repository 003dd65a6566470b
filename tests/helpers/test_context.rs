//! Test context for unified test setup
//!
//! Builds settings that point at a mock backend and keep lockout state in a
//! temporary directory, and provides a clock driven by tokio's (pausable) time.

use std::sync::Arc;
use chrono::{DateTime, Utc};
use tempfile::TempDir;
use tokio::time::Instant;

use pg_admin::config::Settings;
use pg_admin::services::ServiceFactory;
use pg_admin::state::AppContext;
use pg_admin::utils::clock::Clock;

use super::api_mock::MockApiServer;

/// Unified test context that manages all test components
pub struct TestContext {
    pub api_mock: MockApiServer,
    pub settings: Settings,
    pub temp_dir: TempDir,
}

impl TestContext {
    /// Create a new test context with a fresh mock backend
    pub async fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let temp_dir = tempfile::tempdir()?;
        let api_mock = MockApiServer::new().await;
        let settings = Self::create_test_settings(&api_mock, &temp_dir);

        Ok(Self {
            api_mock,
            settings,
            temp_dir,
        })
    }

    /// Create test settings
    pub fn create_test_settings(api_mock: &MockApiServer, temp_dir: &TempDir) -> Settings {
        let mut settings = Settings::default();
        settings.api.base_url = api_mock.base_url();
        settings.api.timeout_seconds = 5;
        settings.storage.state_path = temp_dir
            .path()
            .join("lockout.json")
            .to_string_lossy()
            .into_owned();
        settings.notification.enabled = false;
        settings
    }

    pub fn factory(&self) -> Result<ServiceFactory, Box<dyn std::error::Error + Send + Sync>> {
        Ok(ServiceFactory::new(&self.settings)?)
    }

    /// Build the full shell context
    pub async fn app(&self) -> Result<AppContext, Box<dyn std::error::Error + Send + Sync>> {
        Ok(AppContext::from_factory(self.factory()?, self.settings.clone()).await)
    }
}

/// Wall clock that moves with `tokio::time`, so paused-time tests control it
#[derive(Debug, Clone)]
pub struct TokioClock {
    origin: DateTime<Utc>,
    started: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn shared() -> Arc<dyn Clock> {
        Arc::new(Self::new())
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = Instant::now().duration_since(self.started);
        self.origin + chrono::Duration::milliseconds(elapsed.as_millis() as i64)
    }
}

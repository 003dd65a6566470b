//! Login notification service
//!
//! Sends a transactional email after every successful sign-in. Delivery is
//! best effort: callers turn failures into warnings.

use std::time::Duration;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::settings::NotificationConfig;
use crate::utils::errors::{ApiError, PgAdminError, Result};

#[async_trait]
pub trait LoginNotifier: Send + Sync {
    /// Notify that `email` signed in at `at`
    async fn notify_login(&self, email: &str, at: DateTime<Utc>) -> Result<()>;
}

/// Request body of the email service
#[derive(Debug, Clone, Serialize)]
pub struct EmailRequest {
    pub service_id: String,
    pub template_id: String,
    pub user_id: String,
    pub template_params: TemplateParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateParams {
    pub email: String,
    pub time: String,
}

/// Notifier backed by an HTTP email-sending service
#[derive(Debug, Clone)]
pub struct EmailNotifier {
    client: Client,
    config: NotificationConfig,
}

impl EmailNotifier {
    pub fn new(config: NotificationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(PgAdminError::Http)?;

        Ok(Self { client, config })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn request_for(&self, email: &str, at: DateTime<Utc>) -> EmailRequest {
        EmailRequest {
            service_id: self.config.service_id.clone(),
            template_id: self.config.template_id.clone(),
            user_id: self.config.user_id.clone(),
            template_params: TemplateParams {
                email: email.to_string(),
                time: at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            },
        }
    }
}

#[async_trait]
impl LoginNotifier for EmailNotifier {
    async fn notify_login(&self, email: &str, at: DateTime<Utc>) -> Result<()> {
        if !self.is_enabled() {
            debug!("Login notification disabled, skipping");
            return Ok(());
        }

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&self.request_for(email, at))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PgAdminError::Api(ApiError::Timeout)
                } else {
                    PgAdminError::Api(ApiError::RequestFailed(e.to_string()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        info!(email = %email, "Login notification sent");
        Ok(())
    }
}

/// Notifier that never sends anything
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl LoginNotifier for DisabledNotifier {
    async fn notify_login(&self, _email: &str, _at: DateTime<Utc>) -> Result<()> {
        Ok(())
    }
}

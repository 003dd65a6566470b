//! Session and application context
//!
//! `SessionContext` holds the signed-in user and gates every resource
//! command; `AppContext` bundles it with the three list controllers.

use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::models::{Guest, RentRecord, Review, SessionUser};
use crate::services::auth::{LoginController, LoginSuccess};
use crate::services::ServiceFactory;
use crate::utils::errors::{LoginError, PgAdminError, Result};
use super::list_controller::ListController;

/// An authenticated session
#[derive(Debug, Clone)]
pub struct Session {
    pub user: SessionUser,
    pub token: String,
}

/// Authentication state for the running shell
#[derive(Debug)]
pub struct SessionContext {
    login: LoginController,
    session: Option<Session>,
}

impl SessionContext {
    pub fn new(login: LoginController) -> Self {
        Self { login, session: None }
    }

    /// Sign in through the lockout gate
    pub async fn login(&mut self, email: &str, password: &str) -> std::result::Result<LoginSuccess, LoginError> {
        let success = self.login.attempt_login(email, password).await?;
        info!(user_id = %success.user.id, "Signed in");
        self.session = Some(Session {
            user: success.user.clone(),
            token: success.token.clone(),
        });
        Ok(success)
    }

    /// Sign out, returning the user that was signed in
    pub fn logout(&mut self) -> Option<SessionUser> {
        let session = self.session.take()?;
        info!(user_id = %session.user.id, "Signed out");
        Some(session.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// The signed-in user, or `NotAuthenticated`
    pub fn require_user(&self) -> Result<&SessionUser> {
        self.user().ok_or(PgAdminError::NotAuthenticated)
    }

    /// Token returned by the login call. It is not attached to resource requests.
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    /// Name, email and id of the signed-in user
    pub fn profile(&self) -> Result<Profile> {
        let user = self.require_user()?;
        Ok(Profile {
            name: non_empty_or_na(&user.name),
            email: non_empty_or_na(&user.email),
            id: non_empty_or_na(&user.id),
        })
    }

    pub fn login_controller(&self) -> &LoginController {
        &self.login
    }

    pub fn shutdown(&mut self) {
        self.login.shutdown();
    }
}

/// Account details shown on the profile page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub id: String,
}

fn non_empty_or_na(value: &str) -> String {
    if value.trim().is_empty() {
        "N/A".to_string()
    } else {
        value.to_string()
    }
}

/// Everything the shell needs
#[derive(Debug)]
pub struct AppContext {
    pub settings: Settings,
    pub services: ServiceFactory,
    pub session: SessionContext,
    pub guests: ListController<Guest>,
    pub rent: ListController<RentRecord>,
    pub reviews: ListController<Review>,
}

impl AppContext {
    /// Wire controllers from a service factory, restoring saved lockout state
    pub async fn from_factory(services: ServiceFactory, settings: Settings) -> Self {
        let login = services.login_controller(&settings).await;
        let api = Arc::clone(&services.api);

        Self {
            session: SessionContext::new(login),
            guests: ListController::paginated(api.clone(), settings.pagination.guests_page_size),
            rent: ListController::new(api.clone()),
            reviews: ListController::new(api),
            services,
            settings,
        }
    }

    /// Sign out and drop the loaded collections
    pub fn logout(&mut self) -> Option<SessionUser> {
        let api = Arc::clone(&self.services.api);
        self.guests = ListController::paginated(api.clone(), self.settings.pagination.guests_page_size);
        self.rent = ListController::new(api.clone());
        self.reviews = ListController::new(api);
        self.session.logout()
    }

    pub fn shutdown(&mut self) {
        self.session.shutdown();
    }
}

//! Login attempt controller
//!
//! Gates the login call behind an escalating lockout. State survives restarts
//! through a [`LockoutStore`]; while locked a countdown task publishes the
//! remaining seconds and clears the lock itself when time runs out.

use std::sync::Arc;
use std::time::Duration;
use futures::Stream;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::models::SessionUser;
use crate::state::lockout::{LockoutPolicy, LockoutState};
use crate::state::storage::LockoutStore;
use crate::utils::clock::Clock;
use crate::utils::errors::LoginError;
use crate::utils::logging::{log_lockout, log_login_attempt};
use super::api::AuthApi;
use super::notification::LoginNotifier;

/// A successful sign-in
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub token: String,
    pub user: SessionUser,
    /// Set when the login notification could not be delivered
    pub warning: Option<String>,
}

/// Failure-counting gate in front of the login API
pub struct LoginController {
    api: Arc<dyn AuthApi>,
    notifier: Arc<dyn LoginNotifier>,
    store: Arc<dyn LockoutStore>,
    clock: Arc<dyn Clock>,
    policy: LockoutPolicy,
    state: Arc<Mutex<LockoutState>>,
    remaining: Arc<watch::Sender<u64>>,
    countdown: Option<JoinHandle<()>>,
}

impl LoginController {
    /// Restore the controller from storage, resuming any running lock
    pub async fn restore(
        api: Arc<dyn AuthApi>,
        notifier: Arc<dyn LoginNotifier>,
        store: Arc<dyn LockoutStore>,
        clock: Arc<dyn Clock>,
        policy: LockoutPolicy,
    ) -> Self {
        let mut state = match store.load().await {
            Ok(state) => state.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Failed to load lockout state, starting fresh");
                LockoutState::default()
            }
        };

        let now = clock.now();
        if state.expire_if_elapsed(now) {
            info!("Saved lockout has elapsed, clearing it");
            persist(store.as_ref(), &state).await;
        }
        let remaining = state.remaining_seconds(now);
        let locked = state.is_locked(now);

        let (remaining_tx, _) = watch::channel(remaining);
        let mut controller = Self {
            api,
            notifier,
            store,
            clock,
            policy,
            state: Arc::new(Mutex::new(state)),
            remaining: Arc::new(remaining_tx),
            countdown: None,
        };

        if locked {
            info!(remaining_seconds = remaining, "Resuming saved lockout");
            controller.start_countdown();
        }

        controller
    }

    pub fn policy(&self) -> LockoutPolicy {
        self.policy
    }

    /// Snapshot of the current bookkeeping
    pub async fn state(&self) -> LockoutState {
        self.state.lock().await.clone()
    }

    /// Seconds left on the current lock, as last published by the countdown
    pub fn remaining_seconds(&self) -> u64 {
        *self.remaining.borrow()
    }

    pub fn is_locked(&self) -> bool {
        self.remaining_seconds() > 0
    }

    /// Watch the remaining lock seconds
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.remaining.subscribe()
    }

    /// Stream of remaining seconds, ending after it yields zero
    pub fn countdown(&self) -> impl Stream<Item = u64> + Send + 'static {
        let mut rx = self.remaining.subscribe();
        async_stream::stream! {
            loop {
                let remaining = *rx.borrow_and_update();
                yield remaining;
                if remaining == 0 || rx.changed().await.is_err() {
                    break;
                }
            }
        }
    }

    /// Try to sign in
    pub async fn attempt_login(&mut self, email: &str, password: &str) -> Result<LoginSuccess, LoginError> {
        let email = email.trim();
        {
            let now = self.clock.now();
            let mut state = self.state.lock().await;
            if state.expire_if_elapsed(now) {
                self.remaining.send_replace(0);
            }

            if state.is_locked(now) {
                let remaining_seconds = state.remaining_seconds(now);
                debug!(remaining_seconds, "Login rejected while locked");
                return Err(LoginError::LockedOut { remaining_seconds });
            }

            state.email = email.to_string();
        }

        if email.is_empty() || password.is_empty() {
            let locked_for = self.register_failure(email).await;
            return Err(LoginError::MissingFields { locked_for });
        }

        let session = match self.api.login(email, password).await {
            Ok(response) => response.into_session(),
            Err(e) => {
                warn!(error = %e, "Login request failed");
                None
            }
        };

        let Some((token, user)) = session else {
            let locked_for = self.register_failure(email).await;
            return Err(LoginError::InvalidCredentials { locked_for });
        };

        {
            let mut state = self.state.lock().await;
            state.register_success();
        }
        self.stop_countdown();
        self.remaining.send_replace(0);
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Failed to remove lockout state");
        }
        log_login_attempt(&user.email, true, 0);

        let warning = match self.notifier.notify_login(&user.email, self.clock.now()).await {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "Login notification failed");
                Some("Signed in, but the login notification email could not be sent.".to_string())
            }
        };

        Ok(LoginSuccess { token, user, warning })
    }

    async fn register_failure(&mut self, email: &str) -> Option<u64> {
        let locked_for = {
            let mut state = self.state.lock().await;
            let locked_for = state.register_failure(&self.policy, self.clock.now());
            log_login_attempt(email, false, state.attempt_count);
            if let Some(seconds) = locked_for {
                log_lockout(state.attempt_count, seconds, state.backoff_multiplier);
            }
            persist(self.store.as_ref(), &state).await;
            locked_for
        };

        if let Some(seconds) = locked_for {
            self.remaining.send_replace(seconds);
            self.start_countdown();
        }
        locked_for
    }

    fn start_countdown(&mut self) {
        self.stop_countdown();

        let state = Arc::clone(&self.state);
        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);
        let remaining_tx = Arc::clone(&self.remaining);

        let handle = tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let mut state = state.lock().await;
                let now = clock.now();
                let remaining = state.remaining_seconds(now);
                if remaining > 0 {
                    remaining_tx.send_replace(remaining);
                    continue;
                }

                if state.expire_if_elapsed(now) {
                    persist(store.as_ref(), &state).await;
                }
                remaining_tx.send_replace(0);
                info!(next_multiplier = state.backoff_multiplier, "Lockout expired");
                break;
            }
        });

        self.countdown = Some(handle);
        debug!("Started lockout countdown");
    }

    fn stop_countdown(&mut self) {
        if let Some(handle) = self.countdown.take() {
            handle.abort();
            debug!("Stopped lockout countdown");
        }
    }

    /// Stop the countdown task
    pub fn shutdown(&mut self) {
        self.stop_countdown();
    }

    /// Whether a countdown task is still running
    pub fn countdown_active(&self) -> bool {
        self.countdown.as_ref().map_or(false, |h| !h.is_finished())
    }
}

impl Drop for LoginController {
    fn drop(&mut self) {
        self.stop_countdown();
    }
}

impl std::fmt::Debug for LoginController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginController")
            .field("policy", &self.policy)
            .field("remaining_seconds", &self.remaining_seconds())
            .finish_non_exhaustive()
    }
}

async fn persist(store: &dyn LockoutStore, state: &LockoutState) {
    if let Err(e) = store.save(state).await {
        warn!(error = %e, "Failed to save lockout state");
    }
}

//! Login lockout tests
//!
//! Countdown behaviour runs under paused tokio time with an in-process auth
//! fake; the end-to-end checks go through the HTTP client and wiremock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use serde_json::json;
use wiremock::{matchers::{method, path}, Mock, ResponseTemplate};

use pg_admin::models::LoginResponseWire;
use pg_admin::services::{ApiClient, AuthApi, DisabledNotifier, EmailNotifier, LoginController, LoginNotifier};
use pg_admin::state::{FileStateStorage, LockoutPolicy, LockoutState, LockoutStore, MemoryStateStorage};
use pg_admin::utils::clock::{Clock, ManualClock};
use pg_admin::utils::errors::{ApiError, LoginError, Result};

use crate::helpers::*;

#[derive(Default)]
struct FakeAuth {
    calls: AtomicUsize,
}

impl FakeAuth {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthApi for FakeAuth {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponseWire> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if password == ADMIN_PASSWORD {
            Ok(serde_json::from_value(json!({
                "token": "tok",
                "user": { "_id": "u-1", "email": email, "name": "Warden" }
            }))?)
        } else {
            Err(ApiError::Status { status: 401, body: String::new() }.into())
        }
    }
}

async fn controller(
    api: Arc<dyn AuthApi>,
    store: Arc<dyn LockoutStore>,
    clock: Arc<dyn Clock>,
) -> LoginController {
    LoginController::restore(api, Arc::new(DisabledNotifier), store, clock, LockoutPolicy::default()).await
}

async fn fail_until_locked(login: &mut LoginController) -> Option<u64> {
    let mut locked_for = None;
    for _ in 0..3 {
        match login.attempt_login(ADMIN_EMAIL, "wrong").await {
            Err(e) => locked_for = e.locked_for(),
            Ok(_) => panic!("wrong password signed in"),
        }
    }
    locked_for
}

#[tokio::test(start_paused = true)]
async fn test_third_failure_locks_and_countdown_reaches_zero() {
    let api = Arc::new(FakeAuth::default());
    let store = MemoryStateStorage::new();
    let mut login = controller(api.clone(), Arc::new(store.clone()), TokioClock::shared()).await;

    assert_matches!(
        login.attempt_login(ADMIN_EMAIL, "wrong").await,
        Err(LoginError::InvalidCredentials { locked_for: None })
    );
    assert_matches!(
        login.attempt_login(ADMIN_EMAIL, "wrong").await,
        Err(LoginError::InvalidCredentials { locked_for: None })
    );
    assert_matches!(
        login.attempt_login(ADMIN_EMAIL, "wrong").await,
        Err(LoginError::InvalidCredentials { locked_for: Some(60) })
    );

    let remaining = login.remaining_seconds();
    assert!((60..61).contains(&remaining), "remaining was {}", remaining);
    assert!(store.snapshot().and_then(|s| s.locked_until).is_some());

    // Locked: the correct password is refused without reaching the API
    assert_matches!(
        login.attempt_login(ADMIN_EMAIL, ADMIN_PASSWORD).await,
        Err(LoginError::LockedOut { remaining_seconds: 60 })
    );
    assert_eq!(api.calls(), 3);

    tokio::time::sleep(Duration::from_millis(30_500)).await;
    let remaining = login.remaining_seconds();
    assert!((29..=30).contains(&remaining), "remaining was {}", remaining);

    let ticks: Vec<u64> = login.countdown().collect().await;
    assert_eq!(ticks.last(), Some(&0));
    assert!(ticks.windows(2).all(|w| w[0] >= w[1]), "countdown went up: {:?}", ticks);
    assert!(!login.is_locked());

    let state = login.state().await;
    assert_eq!(state.attempt_count, 0);
    assert_eq!(state.locked_until, None);
    assert_eq!(state.backoff_multiplier, 2);

    let success = login.attempt_login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
    assert_eq!(success.user.email, ADMIN_EMAIL);
    assert_eq!(login.state().await, LockoutState::default());
    assert!(store.snapshot().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_lock_duration_doubles_per_episode() {
    let api = Arc::new(FakeAuth::default());
    let mut login = controller(api, Arc::new(MemoryStateStorage::new()), TokioClock::shared()).await;

    let mut durations = Vec::new();
    for _ in 0..4 {
        let seconds = fail_until_locked(&mut login).await.expect("lock should start");
        durations.push(seconds);
        tokio::time::sleep(Duration::from_secs(seconds + 1)).await;
        assert!(!login.is_locked());
    }

    assert_eq!(durations, vec![60, 120, 240, 480]);
}

#[tokio::test(start_paused = true)]
async fn test_wait_before_lock_allows_retry() {
    let api = Arc::new(FakeAuth::default());
    let mut login = controller(api.clone(), Arc::new(MemoryStateStorage::new()), TokioClock::shared()).await;

    fail_until_locked(&mut login).await;
    tokio::time::sleep(Duration::from_secs(59)).await;
    assert_matches!(
        login.attempt_login(ADMIN_EMAIL, ADMIN_PASSWORD).await,
        Err(LoginError::LockedOut { remaining_seconds: 1 })
    );

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(login.attempt_login(ADMIN_EMAIL, ADMIN_PASSWORD).await.is_ok());
    assert_eq!(api.calls(), 4);
}

#[tokio::test]
async fn test_lock_survives_reload_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state").join("lockout.json");
    let clock = ManualClock::new(Utc::now());
    let api = Arc::new(FakeAuth::default());

    let mut login = controller(
        api.clone(),
        Arc::new(FileStateStorage::new(&state_path)),
        Arc::new(clock.clone()),
    )
    .await;
    assert_eq!(fail_until_locked(&mut login).await, Some(60));
    drop(login);

    let saved = std::fs::read_to_string(&state_path).unwrap();
    assert!(!saved.contains("wrong"));
    assert!(saved.contains(ADMIN_EMAIL));

    clock.advance(chrono::Duration::seconds(25));
    let mut login = controller(
        api.clone(),
        Arc::new(FileStateStorage::new(&state_path)),
        Arc::new(clock.clone()),
    )
    .await;
    assert_eq!(login.remaining_seconds(), 35);
    assert!(login.countdown_active());
    assert_matches!(
        login.attempt_login(ADMIN_EMAIL, ADMIN_PASSWORD).await,
        Err(LoginError::LockedOut { remaining_seconds: 35 })
    );
    assert_eq!(api.calls(), 3);

    // Past the deadline while "closed": the reload clears the lock but keeps the escalation
    drop(login);
    clock.advance(chrono::Duration::seconds(60));
    let login = controller(api, Arc::new(FileStateStorage::new(&state_path)), Arc::new(clock)).await;
    assert!(!login.is_locked());
    let state = login.state().await;
    assert_eq!(state.attempt_count, 0);
    assert_eq!(state.backoff_multiplier, 2);
}

#[tokio::test]
async fn test_http_login_is_not_called_while_locked() {
    let ctx = TestContext::new().await.unwrap();
    ctx.api_mock.mock_login(ADMIN_EMAIL, ADMIN_PASSWORD, admin_user()).await;
    let api = Arc::new(ApiClient::new(&ctx.settings.api).unwrap());
    let clock = ManualClock::new(Utc::now());
    let mut login = controller(api, Arc::new(MemoryStateStorage::new()), Arc::new(clock.clone())).await;

    assert_eq!(fail_until_locked(&mut login).await, Some(60));
    assert_eq!(ctx.api_mock.count_requests("POST", "/loginWithEmail").await, 3);

    assert_matches!(
        login.attempt_login(ADMIN_EMAIL, ADMIN_PASSWORD).await,
        Err(LoginError::LockedOut { .. })
    );
    assert_eq!(ctx.api_mock.count_requests("POST", "/loginWithEmail").await, 3);

    clock.advance(chrono::Duration::seconds(61));
    let success = login.attempt_login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
    assert_eq!(success.token, "test-token");
    assert_eq!(ctx.api_mock.count_requests("POST", "/loginWithEmail").await, 4);
}

#[tokio::test]
async fn test_notification_failure_is_only_a_warning() {
    let ctx = TestContext::new().await.unwrap();
    ctx.api_mock.mock_login(ADMIN_EMAIL, ADMIN_PASSWORD, admin_user()).await;
    Mock::given(method("POST"))
        .and(path("/api/v1.0/email/send"))
        .respond_with(ResponseTemplate::new(400).set_body_string("The user ID is invalid"))
        .expect(1)
        .mount(&ctx.api_mock.server)
        .await;

    let mut notification = ctx.settings.notification.clone();
    notification.enabled = true;
    notification.endpoint = format!("{}/api/v1.0/email/send", ctx.api_mock.server.uri());
    notification.service_id = "service_pg".to_string();
    notification.template_id = "template_login".to_string();
    notification.user_id = "public-key".to_string();
    let notifier: Arc<dyn LoginNotifier> = Arc::new(EmailNotifier::new(notification).unwrap());

    let mut login = LoginController::restore(
        Arc::new(ApiClient::new(&ctx.settings.api).unwrap()),
        notifier,
        Arc::new(MemoryStateStorage::new()),
        Arc::new(ManualClock::new(Utc::now())),
        LockoutPolicy::default(),
    )
    .await;

    let success = login.attempt_login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
    assert_eq!(success.user.name, "Warden");
    assert!(success.warning.is_some());
}

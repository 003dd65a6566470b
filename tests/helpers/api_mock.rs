//! Mock PG backend for testing
//!
//! Wraps a wiremock server and mounts the backend routes the client uses,
//! with the default endpoint layout from `Settings::default()`.

use serde_json::{json, Value};
use wiremock::{
    matchers::{body_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Mock backend API server
pub struct MockApiServer {
    pub server: MockServer,
}

impl MockApiServer {
    /// Start a new mock backend
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to put into `ApiConfig::base_url`
    pub fn base_url(&self) -> String {
        format!("{}/", self.server.uri())
    }

    /// Mount `GET` for a collection endpoint
    pub async fn mock_list(&self, route: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mount any method/path with a status and JSON body
    pub async fn mock_status(&self, http_method: &str, route: &str, status: u16, body: Value) {
        Mock::given(method(http_method))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Accept the given credentials and reject everything else with 401
    pub async fn mock_login(&self, email: &str, password: &str, user: Value) {
        Mock::given(method("POST"))
            .and(path("/loginWithEmail"))
            .and(body_json(json!({ "email": email, "password": password })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "test-token",
                "user": user,
            })))
            .with_priority(1)
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path("/loginWithEmail"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })))
            .with_priority(10)
            .mount(&self.server)
            .await;
    }

    /// Requests received so far for `http_method` on `route`
    pub async fn count_requests(&self, http_method: &str, route: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == route)
            .count()
    }

    /// Drop all mounted mocks and recorded requests
    pub async fn reset(&self) {
        self.server.reset().await;
    }
}

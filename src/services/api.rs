//! Remote resource client
//!
//! Thin wrapper around the backend REST API. Every call sends JSON, treats
//! any non-2xx status as the same failure, and translates wire schemas into
//! the canonical models before handing them to controllers.

use std::time::{Duration, Instant};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn, Instrument};
use url::Url;
use uuid::Uuid;

use crate::config::settings::{ApiConfig, EndpointsConfig, ResourceEndpoints};
use crate::models::{
    Guest, GuestWire, LoginRequest, LoginResponseWire, RentRecord, RentWire, Resource, Review, ReviewWire,
};
use crate::utils::errors::{ApiError, PgAdminError, Result};
use crate::utils::helpers::truncate_text;
use crate::utils::logging::log_api_call;

/// A resource that has a wire schema and a set of remote endpoints
pub trait RemoteResource: Resource + From<Self::Wire> {
    type Wire: DeserializeOwned + Serialize + for<'a> From<&'a Self::Draft> + Send + Sync;

    fn endpoints(endpoints: &EndpointsConfig) -> &ResourceEndpoints;
}

impl RemoteResource for Guest {
    type Wire = GuestWire;

    fn endpoints(endpoints: &EndpointsConfig) -> &ResourceEndpoints {
        &endpoints.guests
    }
}

impl RemoteResource for RentRecord {
    type Wire = RentWire;

    fn endpoints(endpoints: &EndpointsConfig) -> &ResourceEndpoints {
        &endpoints.rent
    }
}

impl RemoteResource for Review {
    type Wire = ReviewWire;

    fn endpoints(endpoints: &EndpointsConfig) -> &ResourceEndpoints {
        &endpoints.reviews
    }
}

/// CRUD operations on one resource collection
#[async_trait]
pub trait ResourceApi<R: Resource>: Send + Sync {
    async fn list(&self) -> Result<Vec<R>>;

    /// `None` when the backend answers with an empty body or `null`
    async fn get(&self, id: &str) -> Result<Option<R>>;

    async fn create(&self, draft: &R::Draft) -> Result<()>;

    async fn update(&self, id: &str, draft: &R::Draft) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}

/// Credential check used by the login controller
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponseWire>;
}

/// HTTP client for the backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    endpoints: EndpointsConfig,
}

impl ApiClient {
    /// Create a new ApiClient instance
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(PgAdminError::Http)?;

        let mut base_url = Url::parse(&config.base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            endpoints: config.endpoints.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint template against the base URL, substituting `{id}`
    pub fn endpoint_url(&self, template: &str, id: Option<&str>) -> Result<Url> {
        let path = match id {
            Some(id) => template.replace("{id}", &urlencoding::encode(id)),
            None => template.to_string(),
        };
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Send a request and return the raw body of a 2xx response
    async fn execute<B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<String>
    where
        B: Serialize + Sync + ?Sized,
    {
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!("api_request", %request_id, method = %method);

        async move {
            let path = url.path().to_string();
            let started = Instant::now();
            debug!(url = %url, "Sending API request");

            let mut request = self
                .client
                .request(method.clone(), url)
                .header(CONTENT_TYPE, "application/json");
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    log_api_call(method.as_str(), &path, None, elapsed_ms(started), false);
                    return Err(map_transport_error(e).into());
                }
            };

            let status = response.status();
            let text = response.text().await.map_err(map_transport_error)?;
            log_api_call(method.as_str(), &path, Some(status.as_u16()), elapsed_ms(started), status.is_success());

            if !status.is_success() {
                warn!(status = status.as_u16(), "API request rejected");
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    body: truncate_text(&text, 200),
                }
                .into());
            }

            Ok(text)
        }
        .instrument(span)
        .await
    }

    async fn fetch_list<R: RemoteResource>(&self) -> Result<Vec<R>> {
        let url = self.endpoint_url(&R::endpoints(&self.endpoints).list, None)?;
        let text = self.execute::<()>(Method::GET, url, None).await?;
        let items: Vec<R::Wire> = parse_body(&text)?;
        Ok(items.into_iter().map(R::from).collect())
    }

    async fn fetch_one<R: RemoteResource>(&self, id: &str) -> Result<Option<R>> {
        let url = self.endpoint_url(&R::endpoints(&self.endpoints).get, Some(id))?;
        let text = self.execute::<()>(Method::GET, url, None).await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let item: Option<R::Wire> = parse_body(&text)?;
        Ok(item.map(R::from))
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

fn map_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else if e.is_connect() {
        ApiError::ServiceUnavailable
    } else {
        ApiError::RequestFailed(e.to_string())
    }
}

fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| ApiError::InvalidResponse(e.to_string()).into())
}

#[async_trait]
impl<R: RemoteResource> ResourceApi<R> for ApiClient {
    async fn list(&self) -> Result<Vec<R>> {
        self.fetch_list::<R>().await
    }

    async fn get(&self, id: &str) -> Result<Option<R>> {
        self.fetch_one::<R>(id).await
    }

    async fn create(&self, draft: &R::Draft) -> Result<()> {
        let url = self.endpoint_url(&R::endpoints(&self.endpoints).create, None)?;
        let payload = R::Wire::from(draft);
        self.execute(Method::POST, url, Some(&payload)).await?;
        Ok(())
    }

    async fn update(&self, id: &str, draft: &R::Draft) -> Result<()> {
        let url = self.endpoint_url(&R::endpoints(&self.endpoints).update, Some(id))?;
        let payload = R::Wire::from(draft);
        self.execute(Method::PUT, url, Some(&payload)).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.endpoint_url(&R::endpoints(&self.endpoints).delete, Some(id))?;
        self.execute::<()>(Method::DELETE, url, None).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponseWire> {
        let url = self.endpoint_url(&self.endpoints.login, None)?;
        let text = self
            .execute(Method::POST, url, Some(&LoginRequest { email, password }))
            .await?;
        parse_body(&text)
    }
}

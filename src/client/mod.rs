//! Site API client
//!
//! Async client for the directory's backing services: AI relevance search,
//! view and vote counters, and the analytics sink. Built on reqwest with a
//! per-request timeout; supports an optional API key.

pub mod analytics;
pub mod error;
pub mod types;
pub(crate) mod wire;

mod counts;
mod relevance;


use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use analytics::AnalyticsEvent;
pub use error::Error;
pub use types::*;

/// Default user agent sent with every request.
pub const USER_AGENT: &str = concat!("toolshed-mcp/", env!("CARGO_PKG_VERSION"));

// ── Auth ────────────────────────────────────────────────────────────────────

/// API key for the site API.
struct ApiKey {
    key: String,
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey").field("key", &"[REDACTED]").finish()
    }
}

// ── Client ──────────────────────────────────────────────────────────────────

/// Async client for the directory site API.
///
/// Every request is bounded by the timeout given at construction; an expired
/// request surfaces as [`Error::Timeout`].
#[derive(Debug)]
pub struct SiteClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<ApiKey>,
}

impl SiteClient {
    /// Create a new client for the API rooted at `base_url`.
    pub fn new(user_agent: &str, base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        })
    }

    /// Send an API key with every request.
    ///
    /// Returns `self` for builder-style chaining.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(ApiKey { key: key.into() });
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, url);
        match &self.api_key {
            Some(auth) => builder.bearer_auth(&auth.key),
            None => builder,
        }
    }

    /// Map non-success HTTP status codes to typed errors.
    pub(crate) async fn check_status(
        resp: reqwest::Response,
        path: &str,
    ) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Err(Error::NotFound(path.to_string()))
        } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Err(Error::RateLimited)
        } else {
            let text = resp.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }

    /// Read a JSON body, rejecting anything that does not parse as a whole.
    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// GET a JSON resource.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let resp = self.request(reqwest::Method::GET, path).send().await?;
        let resp = Self::check_status(resp, path).await?;
        Self::read_json(resp).await
    }

    /// POST a JSON body and return a deserialized response.
    pub(crate) async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let resp = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await?;
        let resp = Self::check_status(resp, path).await?;
        Self::read_json(resp).await
    }

    /// POST with no body and return a deserialized response.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let resp = self.request(reqwest::Method::POST, path).send().await?;
        let resp = Self::check_status(resp, path).await?;
        Self::read_json(resp).await
    }

    /// POST a JSON body, expecting no meaningful response body.
    pub(crate) async fn post_json_ok<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let resp = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await?;
        Self::check_status(resp, path).await?;
        Ok(())
    }
}

//! Guarded API client: the single egress point to the admin backend.
//!
//! ARCHITECTURE
//! ============
//! `GuardedClient` wraps one `reqwest::Client` and a fixed base URL with an
//! ordered pipeline of request and response stages (see `pipeline`). The
//! default pipeline built by `GuardedClient::guarded` is exactly:
//!
//! 1. `BearerAuth` (request): attach the current credential.
//! 2. `LogoutOnUnauthorized` (response): on 401 clear it and navigate to login.
//!
//! TRADE-OFFS
//! ==========
//! No retries, backoff, queuing or explicit timeouts. Operators retry by
//! hand; a hung call only stalls the view that made it.

pub mod admin;
pub mod pipeline;
pub mod types;

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::credential::CredentialStore;
use crate::error::ApiError;
use crate::session::Navigator;
use pipeline::{BearerAuth, LogoutOnUnauthorized, RequestContext, RequestStage, ResponseContext, ResponseStage};

// =============================================================================
// BUILDER
// =============================================================================

pub struct GuardedClientBuilder {
    base_url: String,
    request_stages: Vec<Arc<dyn RequestStage>>,
    response_stages: Vec<Arc<dyn ResponseStage>>,
}

impl GuardedClientBuilder {
    #[must_use]
    pub fn request_stage(mut self, stage: impl RequestStage + 'static) -> Self {
        self.request_stages.push(Arc::new(stage));
        self
    }

    #[must_use]
    pub fn response_stage(mut self, stage: impl ResponseStage + 'static) -> Self {
        self.response_stages.push(Arc::new(stage));
        self
    }

    /// Validate the base URL and build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute http(s) URL or the
    /// HTTP client cannot be constructed.
    pub fn build(self) -> Result<GuardedClient, ApiError> {
        let base_url = parse_base_url(&self.base_url)?;
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(default_headers)
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(GuardedClient {
            http,
            base_url,
            request_stages: self.request_stages.into(),
            response_stages: self.response_stages.into(),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw.trim()).map_err(|e| ApiError::InvalidBaseUrl(format!("{raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ApiError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(url)
}

// =============================================================================
// CLIENT
// =============================================================================

/// Cheap to clone; clones share the HTTP connection pool and the pipeline.
#[derive(Clone)]
pub struct GuardedClient {
    http: reqwest::Client,
    base_url: Url,
    request_stages: Arc<[Arc<dyn RequestStage>]>,
    response_stages: Arc<[Arc<dyn ResponseStage>]>,
}

impl GuardedClient {
    /// Start a client with an empty pipeline.
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> GuardedClientBuilder {
        GuardedClientBuilder { base_url: base_url.into(), request_stages: Vec::new(), response_stages: Vec::new() }
    }

    /// Client with the standard bearer + logout-on-401 pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is unusable.
    pub fn guarded(
        config: &ApiConfig,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        Self::builder(config.base_url.clone())
            .request_stage(BearerAuth::new(Arc::clone(&credentials)))
            .response_stage(LogoutOnUnauthorized::new(credentials, navigator))
            .build()
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for `segments` under the base URL; each segment is
    /// percent-encoded on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot take path segments.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode a JSON response body.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` on 401 (after the response stages ran),
    /// `Status` on any other non-2xx, `Request` on transport failure and
    /// `Parse` if the body does not decode into `T`.
    pub async fn send_json<T, B>(&self, method: Method, segments: &[&str], body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let text = self.execute(method, segments, body, false).await?;
        decode_body(&text)
    }

    /// Send a request whose success body is irrelevant (deletes).
    ///
    /// # Errors
    ///
    /// Same as `send_json`, minus `Parse`.
    pub async fn send_empty<B>(&self, method: Method, segments: &[&str], body: Option<&B>) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(method, segments, body, false).await.map(drop)
    }

    pub(crate) async fn send_public<T, B>(&self, method: Method, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let text = self.execute(method, segments, Some(body), true).await?;
        decode_body(&text)
    }

    async fn execute<B>(&self, method: Method, segments: &[&str], body: Option<&B>, public: bool) -> Result<String, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ApiError::Request(format!("request body encode failed: {e}")))?;
        let mut request = RequestContext {
            method,
            path: format!("/{}", segments.join("/")),
            url: self.endpoint(segments)?,
            headers: HeaderMap::new(),
            body,
            public,
        };
        for stage in self.request_stages.iter() {
            stage.on_request(&mut request);
        }

        let mut outgoing = self
            .http
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            outgoing = outgoing.json(body);
        }

        let response = outgoing.send().await.map_err(|e| {
            warn!(method = %request.method, path = %request.path, error = %e, "admin api request failed");
            ApiError::Request(e.to_string())
        })?;
        let status = response.status();

        // Stages see the status as soon as it arrives; a body that fails to
        // read must not keep a 401 from logging out.
        let observed = ResponseContext { request: &request, status };
        for stage in self.response_stages.iter() {
            stage.on_response(&observed);
        }
        debug!(method = %request.method, path = %request.path, status = status.as_u16(), "admin api response");

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) if status == StatusCode::UNAUTHORIZED => {
                warn!(path = %request.path, error = %e, "401 body unreadable");
                String::new()
            }
            Err(e) => return Err(ApiError::Request(e.to_string())),
        };
        check_status(status, text)
    }
}

// =============================================================================
// RESPONSE DECODING
// =============================================================================

fn check_status(status: StatusCode, body: String) -> Result<String, ApiError> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized { body });
    }
    if !status.is_success() {
        return Err(ApiError::Status { status: status.as_u16(), body });
    }
    Ok(body)
}

fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let payload = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(payload).map_err(|e| ApiError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

//! Request/response stages applied to every backend call.
//!
//! DESIGN
//! ======
//! Request stages run in order, synchronously, after the request context is
//! built and before anything leaves the process. Response stages run in
//! order on every response the backend actually sends, success or error.
//! Stages observe and mutate; they never turn one outcome into another, so
//! the caller always receives exactly what the backend said.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use tracing::warn;
use url::Url;

use crate::credential::CredentialStore;
use crate::guard::LOGIN_PATH;
use crate::session::Navigator;

// =============================================================================
// CONTEXTS
// =============================================================================

/// One outgoing call. Lives only as long as the call.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Path relative to the base URL, unencoded, for logging.
    pub path: String,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
    /// Endpoint does not require a credential (login).
    pub public: bool,
}

/// What the backend answered to a `RequestContext`.
#[derive(Debug)]
pub struct ResponseContext<'a> {
    pub request: &'a RequestContext,
    pub status: StatusCode,
}

pub trait RequestStage: Send + Sync {
    fn on_request(&self, request: &mut RequestContext);
}

pub trait ResponseStage: Send + Sync {
    fn on_response(&self, response: &ResponseContext<'_>);
}

// =============================================================================
// BEARER AUTH
// =============================================================================

/// Attach `Authorization: Bearer <token>` from the credential current at call
/// time; strip the header when there is none.
pub struct BearerAuth {
    credentials: Arc<dyn CredentialStore>,
}

impl BearerAuth {
    #[must_use]
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self { credentials }
    }
}

impl RequestStage for BearerAuth {
    fn on_request(&self, request: &mut RequestContext) {
        request.headers.remove(AUTHORIZATION);
        let Some(credential) = self.credentials.current() else {
            return;
        };
        match HeaderValue::from_str(&format!("Bearer {}", credential.token())) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => warn!(path = %request.path, "credential is not a valid header value; sending unauthenticated"),
        }
    }
}

// =============================================================================
// LOGOUT ON 401
// =============================================================================

/// On 401 from a credentialed endpoint: clear the credential, then request a
/// full navigation to the login page. Once per response.
pub struct LogoutOnUnauthorized {
    credentials: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl LogoutOnUnauthorized {
    #[must_use]
    pub fn new(credentials: Arc<dyn CredentialStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { credentials, navigator }
    }
}

impl ResponseStage for LogoutOnUnauthorized {
    fn on_response(&self, response: &ResponseContext<'_>) {
        if response.status != StatusCode::UNAUTHORIZED || response.request.public {
            return;
        }
        warn!(
            method = %response.request.method,
            path = %response.request.path,
            "backend rejected credential; logging out"
        );
        if let Err(e) = self.credentials.remove() {
            warn!(error = %e, "failed to clear credential after 401");
        }
        self.navigator.navigate(LOGIN_PATH);
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;

//! Typed admin endpoints. Every call except `login` requires the credential
//! and goes through the full pipeline.

use reqwest::Method;

use super::GuardedClient;
use super::types::{
    ApiKey, CreateApiKeyRequest, CreateDomainRequest, DashboardStats, Domain, ImapTestRequest, ImapTestResponse,
    LoginRequest, LoginResponse, Message, TempEmail, UpdateDomainRequest,
};
use crate::error::ApiError;

const ADMIN: &str = "admin";

impl GuardedClient {
    /// `POST /admin/login`: exchange operator credentials for a bearer token.
    ///
    /// A 401 here means wrong credentials, not an expired session, so the
    /// logout stage does not fire for it.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection or a transport error.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.send_public(Method::POST, &[ADMIN, "login"], request).await
    }

    /// `GET /admin/stats`
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` from the call.
    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        self.send_json::<_, ()>(Method::GET, &[ADMIN, "stats"], None).await
    }

    // =========================================================================
    // DOMAINS
    // =========================================================================

    /// `GET /admin/domains`
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` from the call.
    pub async fn domains(&self) -> Result<Vec<Domain>, ApiError> {
        self.send_json::<_, ()>(Method::GET, &[ADMIN, "domains"], None).await
    }

    /// `POST /admin/domains`
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` from the call.
    pub async fn create_domain(&self, request: &CreateDomainRequest) -> Result<Domain, ApiError> {
        self.send_json(Method::POST, &[ADMIN, "domains"], Some(request)).await
    }

    /// `PATCH /admin/domains/{id}`
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` from the call.
    pub async fn update_domain(&self, id: &str, request: &UpdateDomainRequest) -> Result<Domain, ApiError> {
        self.send_json(Method::PATCH, &[ADMIN, "domains", id], Some(request)).await
    }

    /// `DELETE /admin/domains/{id}`
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` from the call.
    pub async fn delete_domain(&self, id: &str) -> Result<(), ApiError> {
        self.send_empty::<()>(Method::DELETE, &[ADMIN, "domains", id], None).await
    }

    // =========================================================================
    // TEMPORARY ADDRESSES
    // =========================================================================

    /// `GET /admin/emails`
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` from the call.
    pub async fn emails(&self) -> Result<Vec<TempEmail>, ApiError> {
        self.send_json::<_, ()>(Method::GET, &[ADMIN, "emails"], None).await
    }

    /// `DELETE /admin/emails/{id}` removes the address and its messages.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` from the call.
    pub async fn delete_email(&self, id: &str) -> Result<(), ApiError> {
        self.send_empty::<()>(Method::DELETE, &[ADMIN, "emails", id], None).await
    }

    /// `GET /admin/emails/{email}/messages`, with the address percent-encoded
    /// as one path segment.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` from the call.
    pub async fn messages(&self, email: &str) -> Result<Vec<Message>, ApiError> {
        self.send_json::<_, ()>(Method::GET, &[ADMIN, "emails", email, "messages"], None).await
    }

    // =========================================================================
    // IMAP
    // =========================================================================

    /// `POST /admin/imap/test`. The backend probes the server; a failed
    /// probe is a 200 with `success: false`.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` from the call.
    pub async fn test_imap(&self, request: &ImapTestRequest) -> Result<ImapTestResponse, ApiError> {
        self.send_json(Method::POST, &[ADMIN, "imap", "test"], Some(request)).await
    }

    // =========================================================================
    // API KEYS
    // =========================================================================

    /// `GET /admin/api-keys`
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` from the call.
    pub async fn api_keys(&self) -> Result<Vec<ApiKey>, ApiError> {
        self.send_json::<_, ()>(Method::GET, &[ADMIN, "api-keys"], None).await
    }

    /// `POST /admin/api-keys`. The returned `key` is the only time the full
    /// value is visible.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` from the call.
    pub async fn create_api_key(&self, name: &str) -> Result<ApiKey, ApiError> {
        let request = CreateApiKeyRequest { name: name.to_owned() };
        self.send_json(Method::POST, &[ADMIN, "api-keys"], Some(&request)).await
    }

    /// `DELETE /admin/api-keys/{id}`
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` from the call.
    pub async fn revoke_api_key(&self, id: &str) -> Result<(), ApiError> {
        self.send_empty::<()>(Method::DELETE, &[ADMIN, "api-keys", id], None).await
    }
}

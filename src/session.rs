//! Session store: the one place that answers "is this operator logged in".
//!
//! DESIGN
//! ======
//! `SessionStore` is built once per process and passed by reference to
//! whatever needs auth state or backend access. It owns the credential
//! store, the navigator and the guarded client, so the flag it reports and
//! the token the client sends can never come from two different places.
//!
//! `is_loading` is true until `initialize()` runs; views gate auth-dependent
//! redirects on it. `is_authenticated` is the flag set by login/logout,
//! intersected with credential presence at read time: a credential cleared
//! by the 401 stage, or one that has expired, reads as logged out without
//! waiting for the next `logout()`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use time::OffsetDateTime;
use tracing::{info, warn};

use crate::api::GuardedClient;
use crate::api::types::LoginRequest;
use crate::config::ApiConfig;
use crate::credential::{Credential, CredentialStore};
use crate::error::ApiError;
use crate::guard::LOGIN_PATH;

// =============================================================================
// NAVIGATOR
// =============================================================================

/// Performs a full navigation: everything held in memory for the current
/// view is discarded, not just the route.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator for headless embedders: records the request in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, path: &str) {
        warn!(%path, "full navigation requested");
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Authentication flags derived from the persisted credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { is_authenticated: false, is_loading: true }
    }
}

// =============================================================================
// STORE
// =============================================================================

pub struct SessionStore {
    credentials: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    client: GuardedClient,
    state: RwLock<SessionState>,
    initialized: AtomicBool,
}

impl SessionStore {
    /// Build the store and its guarded client with the standard pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is unusable.
    pub fn new(
        config: &ApiConfig,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let client = GuardedClient::guarded(config, Arc::clone(&credentials), Arc::clone(&navigator))?;
        Ok(Self::with_client(client, credentials, navigator))
    }

    /// Build the store around an already configured client. The client's
    /// pipeline should read from the same `credentials`.
    #[must_use]
    pub fn with_client(client: GuardedClient, credentials: Arc<dyn CredentialStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            credentials,
            navigator,
            client,
            state: RwLock::new(SessionState::default()),
            initialized: AtomicBool::new(false),
        }
    }

    /// Read the persisted credential once and settle the flags. Later calls
    /// are no-ops.
    pub fn initialize(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return;
        }
        let present = self.credentials.is_present();
        self.set_state(SessionState { is_authenticated: present, is_loading: false });
        info!(authenticated = present, "session initialized");
    }

    /// Exchange operator credentials for a token and persist it.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection, a transport error, `Parse` if the
    /// granted lifetime is not positive, or a store error if the new
    /// credential cannot be written. State is untouched on error.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<(), ApiError> {
        let request = LoginRequest { email: identifier.to_owned(), password: secret.to_owned() };
        let response = self.client.login(&request).await?;
        if response.expires_in <= 0 {
            return Err(ApiError::Parse(format!("login returned non-positive lifetime {}", response.expires_in)));
        }

        let credential = Credential::issue(response.access_token, response.expires_in, OffsetDateTime::now_utc());
        self.credentials.write(&credential)?;
        self.set_state(SessionState { is_authenticated: true, is_loading: false });

        info!(expires_at = %credential.expires_at(), "operator logged in");
        Ok(())
    }

    /// Clear the credential and navigate to the login page. Safe to call
    /// with no credential present.
    pub fn logout(&self) {
        if let Err(e) = self.credentials.remove() {
            warn!(error = %e, "failed to clear credential on logout");
        }
        self.set_state(SessionState { is_authenticated: false, is_loading: false });
        info!("operator logged out");
        self.navigator.navigate(LOGIN_PATH);
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        let flags = *self.state.read().unwrap_or_else(PoisonError::into_inner);
        SessionState { is_authenticated: flags.is_authenticated && self.credentials.is_present(), ..flags }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    /// Client for every backend call made on behalf of this session.
    #[must_use]
    pub fn client(&self) -> &GuardedClient {
        &self.client
    }

    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    fn set_state(&self, next: SessionState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

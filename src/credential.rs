//! Admin credential and the stores that persist it.
//!
//! DESIGN
//! ======
//! The credential is one cookie: `access_token=<bearer>` with `Path=/`,
//! `SameSite=Strict` and an absolute `Expires` derived from the lifetime the
//! backend hands out at login. Stores keep whatever was written; expiry is
//! passive and applied on read by `CredentialStore::current`, so nothing
//! ever sweeps the slot in the background.
//!
//! Reads are synchronous. The bearer stage in the API client calls
//! `current()` on every outgoing request and must not await.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::{Duration, OffsetDateTime, PrimitiveDateTime};
use tracing::warn;

use crate::error::StoreError;

/// Name of the cookie holding the bearer token.
pub const CREDENTIAL_COOKIE: &str = "access_token";

// =============================================================================
// CREDENTIAL
// =============================================================================

/// Bearer token plus the absolute instant it stops being usable.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    expires_at: OffsetDateTime,
}

impl Credential {
    /// Build a credential from a login response: `expires_at = issued_at + lifetime_secs`.
    ///
    /// Sub-second precision is dropped because the cookie `Expires` attribute
    /// only carries whole seconds. Lifetimes past the representable range
    /// saturate at the latest (or earliest) instant `time` can hold.
    #[must_use]
    pub fn issue(token: impl Into<String>, lifetime_secs: i64, issued_at: OffsetDateTime) -> Self {
        let exact = issued_at.checked_add(Duration::seconds(lifetime_secs)).unwrap_or_else(|| {
            if lifetime_secs > 0 {
                PrimitiveDateTime::MAX.assume_utc()
            } else {
                PrimitiveDateTime::MIN.assume_utc()
            }
        });
        let expires_at = exact.replace_nanosecond(0).unwrap_or(exact);
        Self { token: token.into(), expires_at }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn expires_at(&self) -> OffsetDateTime {
        self.expires_at
    }

    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }

    /// The cookie form of this credential.
    #[must_use]
    pub fn to_cookie(&self) -> Cookie<'static> {
        Cookie::build((CREDENTIAL_COOKIE, self.token.clone()))
            .path("/")
            .same_site(SameSite::Strict)
            .expires(self.expires_at)
            .build()
    }

    /// Parse a `Set-Cookie` style line written by `to_cookie`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Malformed` if the line is not a cookie, names a
    /// different cookie, has an empty value or carries no expiry.
    pub fn from_cookie_str(raw: &str) -> Result<Self, StoreError> {
        let cookie = Cookie::parse(raw.trim().to_owned()).map_err(|e| StoreError::Malformed(e.to_string()))?;
        if cookie.name() != CREDENTIAL_COOKIE {
            return Err(StoreError::Malformed(format!("unexpected cookie name `{}`", cookie.name())));
        }
        if cookie.value().is_empty() {
            return Err(StoreError::Malformed("empty token".into()));
        }
        let expires_at = cookie
            .expires_datetime()
            .ok_or_else(|| StoreError::Malformed("missing Expires attribute".into()))?;
        Ok(Self { token: cookie.value().to_owned(), expires_at })
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Persistence slot for at most one credential.
pub trait CredentialStore: Send + Sync {
    /// Return the stored credential as written, expired or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read or parsed.
    fn read(&self) -> Result<Option<Credential>, StoreError>;

    /// Replace the stored credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn write(&self, credential: &Credential) -> Result<(), StoreError>;

    /// Remove the stored credential. Removing an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be cleared.
    fn remove(&self) -> Result<(), StoreError>;

    /// The credential usable right now. Expired and unreadable credentials
    /// read as absent.
    fn current(&self) -> Option<Credential> {
        self.current_at(OffsetDateTime::now_utc())
    }

    fn current_at(&self, now: OffsetDateTime) -> Option<Credential> {
        match self.read() {
            Ok(credential) => credential.filter(|c| !c.is_expired_at(now)),
            Err(e) => {
                warn!(error = %e, "credential unreadable; treating as absent");
                None
            }
        }
    }

    fn is_present(&self) -> bool {
        self.current().is_some()
    }
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Process-local slot. Used by tests and by embedders that manage
/// persistence themselves.
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: RwLock<Option<Credential>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        Self { slot: RwLock::new(Some(credential)) }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn read(&self) -> Result<Option<Credential>, StoreError> {
        Ok(self.slot.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn write(&self, credential: &Credential) -> Result<(), StoreError> {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(credential.clone());
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        self.slot.write().unwrap_or_else(PoisonError::into_inner).take();
        Ok(())
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

/// Cookie file on disk holding a single `Set-Cookie` line. Survives process
/// restarts, which is what gives the CLI a session between invocations.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn read(&self) -> Result<Option<Credential>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Credential::from_cookie_str(&raw).map(Some)
    }

    fn write(&self, credential: &Credential) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, format!("{}\n", credential.to_cookie()))?;
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "credential_test.rs"]
mod tests;

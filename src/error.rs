//! Error types shared by the credential store and the API client.
//!
//! ERROR HANDLING
//! ==============
//! A 401 is its own variant because the client has already cleared the
//! credential and requested navigation by the time the caller sees it. The
//! caller still gets the error so it can stop whatever it was waiting on.
//! Every other non-2xx status and every transport failure is handed back
//! unchanged; the core does not distinguish validation from server errors.

// =============================================================================
// CREDENTIAL STORE
// =============================================================================

/// Errors produced while persisting or reading the credential cookie.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The cookie file could not be read, written or removed.
    #[error("credential file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The stored cookie could not be parsed back into a credential.
    #[error("credential cookie malformed: {0}")]
    Malformed(String),
}

// =============================================================================
// API CLIENT
// =============================================================================

/// Errors produced by `GuardedClient` calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend rejected the credential. Global logout already ran.
    #[error("authentication required (status 401)")]
    Unauthorized { body: String },

    /// The backend returned any other non-success status.
    #[error("API response error: status {status}")]
    Status { status: u16, body: String },

    /// The request never produced a response.
    #[error("API request failed: {0}")]
    Request(String),

    /// The response body did not match the expected shape.
    #[error("API response parse failed: {0}")]
    Parse(String),

    /// The configured base URL cannot be used to build endpoint URLs.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The credential returned by login could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// HTTP status carried by the error, if the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Human-readable message from a JSON error body (`message` or `error`).
    #[must_use]
    pub fn message(&self) -> Option<String> {
        let body = match self {
            Self::Unauthorized { body } | Self::Status { body, .. } => body,
            _ => return None,
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        ["message", "error"]
            .iter()
            .find_map(|key| value.get(*key).and_then(serde_json::Value::as_str))
            .map(str::to_owned)
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

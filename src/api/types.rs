//! Wire types for the admin backend. Timestamps stay as the ISO strings the
//! backend sends; nothing in the admin layer does date arithmetic on them.

use serde::{Deserialize, Serialize};

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

// =============================================================================
// STATS
// =============================================================================

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_domains: u64,
    pub active_domains: u64,
    pub total_emails: u64,
    pub active_emails: u64,
    pub total_messages: u64,
}

// =============================================================================
// DOMAINS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Domain {
    pub id: String,
    pub domain: String,
    pub imap_host: String,
    pub imap_port: u16,
    pub imap_user: String,
    pub active: bool,
    pub created_at: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CreateDomainRequest {
    pub domain: String,
    pub imap_host: String,
    pub imap_port: u16,
    pub imap_user: String,
    pub imap_password: String,
}

/// Partial update; absent fields are left out of the body entirely.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct UpdateDomainRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imap_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imap_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imap_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imap_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl UpdateDomainRequest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domain.is_none()
            && self.imap_host.is_none()
            && self.imap_port.is_none()
            && self.imap_user.is_none()
            && self.imap_password.is_none()
            && self.active.is_none()
    }
}

// =============================================================================
// TEMPORARY ADDRESSES & MESSAGES
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum EmailStatus {
    Active,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TempEmail {
    pub id: String,
    pub email: String,
    pub domain: String,
    pub status: EmailStatus,
    pub messages_count: u64,
    pub created_at: String,
    #[serde(default)]
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub from: String,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub received_at: String,
}

// =============================================================================
// IMAP PROBE
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
pub struct ImapTestRequest {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImapTestResponse {
    pub success: bool,
    pub message: String,
}

// =============================================================================
// API KEYS
// =============================================================================

/// In listings `key` is whatever the backend chooses to show (usually
/// masked); the create response carries the full key exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKey {
    pub id: String,
    pub name: String,
    pub key: String,
    pub active: bool,
    pub created_at: String,
    #[serde(default)]
    pub last_used: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateApiKeyRequest {
    pub name: String,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

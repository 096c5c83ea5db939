//! TPMail admin core: session store, guarded API client, route guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! The temporary-email backend owns every business rule (domains, IMAP
//! polling, address expiry, message storage). This crate is the operator
//! side of it: it keeps the admin credential, funnels every backend call
//! through one client that attaches and revokes that credential, and decides
//! at the edge whether a navigation may reach a dashboard page at all.
//!
//! FLOW
//! ====
//! `guard::evaluate` runs first on every navigation (cookie presence only) →
//! allowed pages call the backend through `api::GuardedClient` → the bearer
//! stage reads the current credential from the `CredentialStore` → a 401
//! clears it and asks the `Navigator` for a full navigation to `/login`,
//! which lands back in the guard.

pub mod api;
pub mod config;
pub mod credential;
pub mod dashboard;
pub mod error;
pub mod guard;
pub mod poll;
pub mod routes;
pub mod session;

pub use api::GuardedClient;
pub use config::{ApiConfig, GatewayConfig};
pub use credential::{Credential, CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use error::{ApiError, StoreError};
pub use guard::GuardAction;
pub use session::{LoggingNavigator, Navigator, SessionState, SessionStore};

//! Route guard. Decides, before any page is served, where a navigation goes.
//!
//! DESIGN
//! ======
//! A pure function of `(path, credential present)`. It never talks to the
//! backend and never inspects the token: a present-but-expired cookie is
//! treated as authenticated until the API client sees a 401 and clears it.
//!
//! | class     | credential | action                                |
//! |-----------|------------|---------------------------------------|
//! | excluded  | any        | allow                                 |
//! | public    | yes        | redirect `/dashboard`                 |
//! | public    | no         | allow                                 |
//! | root      | yes        | redirect `/dashboard`                 |
//! | root      | no         | redirect `/login`                     |
//! | protected | yes        | allow                                 |
//! | protected | no         | redirect `/login?redirect=<path>`     |

use std::fmt::Write;

/// Login page.
pub const LOGIN_PATH: &str = "/login";
/// Landing page for authenticated operators.
pub const DASHBOARD_PATH: &str = "/dashboard";
/// Query parameter carrying the page the operator originally asked for.
pub const RETURN_TARGET_PARAM: &str = "redirect";

/// Paths matched as a whole segment (`/api` and `/api/...`, not `/api-keys`).
const EXCLUDED_SEGMENTS: &[&str] = &["/api", "/favicon.ico", "/healthz"];
/// Paths matched by plain prefix.
const EXCLUDED_PREFIXES: &[&str] = &["/_next/"];
const PUBLIC_SEGMENTS: &[&str] = &[LOGIN_PATH];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Static assets and non-page endpoints; the guard never applies.
    Excluded,
    /// Reachable without a credential.
    Public,
    /// `/`.
    Root,
    /// Every dashboard page.
    Protected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardAction {
    Allow,
    Redirect(String),
}

#[must_use]
pub fn classify(path: &str) -> PathClass {
    if EXCLUDED_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
        || EXCLUDED_SEGMENTS.iter().any(|segment| matches_segment(path, segment))
    {
        return PathClass::Excluded;
    }
    if PUBLIC_SEGMENTS.iter().any(|segment| matches_segment(path, segment)) {
        return PathClass::Public;
    }
    if path.is_empty() || path == "/" {
        return PathClass::Root;
    }
    PathClass::Protected
}

/// Decide what to do with a navigation to `path`.
#[must_use]
pub fn evaluate(path: &str, credential_present: bool) -> GuardAction {
    match (classify(path), credential_present) {
        (PathClass::Excluded, _) | (PathClass::Public, false) | (PathClass::Protected, true) => GuardAction::Allow,
        (PathClass::Public | PathClass::Root, true) => GuardAction::Redirect(DASHBOARD_PATH.to_owned()),
        (PathClass::Root, false) => GuardAction::Redirect(LOGIN_PATH.to_owned()),
        (PathClass::Protected, false) => GuardAction::Redirect(login_with_return_target(path)),
    }
}

/// `/login?redirect=<path>`.
#[must_use]
pub fn login_with_return_target(path: &str) -> String {
    format!("{LOGIN_PATH}?{RETURN_TARGET_PARAM}={}", escape_query_value(path))
}

fn matches_segment(path: &str, segment: &str) -> bool {
    path.strip_prefix(segment)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Percent-escape only what would end or corrupt a query value; `/` and
/// other path punctuation stay readable.
fn escape_query_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~/:@!$'()*,;".contains(&byte) {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

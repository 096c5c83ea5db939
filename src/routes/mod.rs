//! Edge gateway router.
//!
//! SYSTEM CONTEXT
//! ==============
//! The gateway sits in front of the pre-built dashboard bundle. Every
//! navigation passes `route_guard` before a file is served, so protected
//! pages never reach an operator without a credential cookie. The gateway
//! never calls the backend; validity of the token is the API client's
//! problem once the page is running.
//!
//! Unknown paths fall back to `index.html` so client-side routes load the
//! app shell.

use axum::Router;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::http::header::{CACHE_CONTROL, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum_extra::extract::cookie::CookieJar;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::config::GatewayConfig;
use crate::credential::CREDENTIAL_COOKIE;
use crate::guard::{self, GuardAction};

/// Fingerprinted build output; safe to cache forever.
const STATIC_ASSET_PREFIX: &str = "/_next/static/";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";
const CACHE_NO_STORE: &str = "no-store, no-cache, must-revalidate, proxy-revalidate, max-age=0";

/// Gateway: health probe, guarded dashboard bundle, cache headers, tracing.
pub fn app(config: &GatewayConfig) -> Router {
    let index = config.dashboard_dir.join("index.html");
    let dashboard = ServeDir::new(&config.dashboard_dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(index));

    Router::new()
        .route("/healthz", get(healthz))
        .fallback_service(dashboard)
        .layer(middleware::from_fn(route_guard))
        .layer(middleware::from_fn(cache_control))
        .layer(TraceLayer::new_for_http())
}

/// Apply `guard::evaluate` using presence of the credential cookie only.
async fn route_guard(jar: CookieJar, request: Request, next: Next) -> Response {
    let present = jar.get(CREDENTIAL_COOKIE).is_some_and(|c| !c.value().is_empty());
    match guard::evaluate(request.uri().path(), present) {
        GuardAction::Allow => next.run(request).await,
        GuardAction::Redirect(target) => {
            debug!(path = %request.uri().path(), %target, "guard redirect");
            Redirect::temporary(&target).into_response()
        }
    }
}

async fn cache_control(request: Request, next: Next) -> Response {
    let immutable = request.uri().path().starts_with(STATIC_ASSET_PREFIX);
    let mut response = next.run(request).await;
    let value = if immutable { CACHE_IMMUTABLE } else { CACHE_NO_STORE };
    response.headers_mut().insert(CACHE_CONTROL, HeaderValue::from_static(value));
    response
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

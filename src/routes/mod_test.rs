use super::*;
use reqwest::header::{COOKIE, LOCATION};
use std::path::Path;

struct Gateway {
    base: String,
    http: reqwest::Client,
    _dir: tempfile::TempDir,
}

impl Gateway {
    async fn start() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        seed_bundle(dir.path());
        let config = GatewayConfig { port: 0, dashboard_dir: dir.path().to_path_buf() };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app(&config)).await.expect("gateway serve");
        });

        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("http client");
        Self { base: format!("http://{addr}"), http, _dir: dir }
    }

    async fn get(&self, path: &str, cookie: Option<&str>) -> reqwest::Response {
        let mut req = self.http.get(format!("{}{path}", self.base));
        if let Some(cookie) = cookie {
            req = req.header(COOKIE, cookie);
        }
        req.send().await.expect("gateway request")
    }
}

fn seed_bundle(root: &Path) {
    std::fs::write(root.join("index.html"), "<html>shell</html>").expect("index");
    std::fs::create_dir_all(root.join("_next/static")).expect("static dir");
    std::fs::write(root.join("_next/static/app.js"), "console.log(1)").expect("asset");
    std::fs::write(root.join("favicon.ico"), "icon").expect("favicon");
}

fn location(resp: &reqwest::Response) -> &str {
    resp.headers().get(LOCATION).expect("location header").to_str().expect("ascii location")
}

const SIGNED_IN: Option<&str> = Some("access_token=T");

// =============================================================================
// guard wiring
// =============================================================================

#[tokio::test]
async fn protected_page_without_cookie_redirects_with_return_target() {
    let gw = Gateway::start().await;
    let resp = gw.get("/domains", None).await;
    assert_eq!(resp.status(), reqwest::StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/login?redirect=/domains");
}

#[tokio::test]
async fn protected_page_with_cookie_serves_shell() {
    let gw = Gateway::start().await;
    let resp = gw.get("/domains", SIGNED_IN).await;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "<html>shell</html>");
}

#[tokio::test]
async fn empty_cookie_value_counts_as_absent() {
    let gw = Gateway::start().await;
    let resp = gw.get("/settings", Some("access_token=")).await;
    assert_eq!(location(&resp), "/login?redirect=/settings");
}

#[tokio::test]
async fn login_with_cookie_redirects_to_dashboard() {
    let gw = Gateway::start().await;
    let resp = gw.get("/login", SIGNED_IN).await;
    assert_eq!(location(&resp), "/dashboard");
}

#[tokio::test]
async fn login_without_cookie_is_served() {
    let gw = Gateway::start().await;
    let resp = gw.get("/login", None).await;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn root_redirects_by_cookie_presence() {
    let gw = Gateway::start().await;
    assert_eq!(location(&gw.get("/", None).await), "/login");
    assert_eq!(location(&gw.get("/", SIGNED_IN).await), "/dashboard");
}

#[tokio::test]
async fn static_assets_bypass_guard() {
    let gw = Gateway::start().await;
    let resp = gw.get("/_next/static/app.js", None).await;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let favicon = gw.get("/favicon.ico", None).await;
    assert_eq!(favicon.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn healthz_is_unguarded() {
    let gw = Gateway::start().await;
    assert_eq!(gw.get("/healthz", None).await.status(), reqwest::StatusCode::OK);
}

// =============================================================================
// cache headers
// =============================================================================

#[tokio::test]
async fn static_assets_are_cached_immutably() {
    let gw = Gateway::start().await;
    let resp = gw.get("/_next/static/app.js", None).await;
    assert_eq!(resp.headers().get(CACHE_CONTROL).expect("cache-control"), CACHE_IMMUTABLE);
}

#[tokio::test]
async fn pages_and_redirects_are_not_cached() {
    let gw = Gateway::start().await;
    let page = gw.get("/dashboard", SIGNED_IN).await;
    assert_eq!(page.headers().get(CACHE_CONTROL).expect("cache-control"), CACHE_NO_STORE);
    let redirect = gw.get("/dashboard", None).await;
    assert_eq!(redirect.headers().get(CACHE_CONTROL).expect("cache-control"), CACHE_NO_STORE);
}

use tpmail_admin::{GatewayConfig, routes};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env().expect("invalid gateway configuration");
    if !config.dashboard_dir.is_dir() {
        tracing::warn!(dir = %config.dashboard_dir.display(), "dashboard directory missing; pages will 404");
    }

    let app = routes::app(&config);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, dashboard = %config.dashboard_dir.display(), "tpmail admin gateway listening");
    axum::serve(listener, app).await.expect("server failed");
}

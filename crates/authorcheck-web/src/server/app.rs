use crate::server::{routes, static_files};
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Build the Axum application
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(state.config.server.port, allow_any_origin_from_env());

    let api_routes = Router::new()
        .route("/health", get(routes::health))
        .route("/model", get(routes::model_info))
        .route("/analyze", post(routes::analyze));

    Router::new()
        .nest("/api", api_routes)
        .route("/metrics", get(routes::metrics))
        .fallback(static_files::serve_static)
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// `AUTHORCHECK_ALLOW_ANY_ORIGIN=1|true` opens CORS to every origin
fn allow_any_origin_from_env() -> bool {
    std::env::var("AUTHORCHECK_ALLOW_ANY_ORIGIN")
        .ok()
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// CORS for the page's own origins on `port`, or for any origin
pub fn cors_layer(port: u16, allow_any_origin: bool) -> CorsLayer {
    if allow_any_origin {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = [
        format!("http://localhost:{}", port),
        format!("http://127.0.0.1:{}", port),
    ]
    .iter()
    .filter_map(|origin| HeaderValue::from_str(origin).ok())
    .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Run the server until SIGINT/SIGTERM
pub async fn run_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = build_app(state);

    tracing::info!("Starting authorcheck server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::warn!("Shutdown signal received, stopping server...");
}

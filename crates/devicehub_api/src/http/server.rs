use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::http::device_handler::{self, AppState};

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Build the application router
///
/// Device routes live under `/api`; the liveness probe stays at the root.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/devices", get(device_handler::list_devices))
        .route("/device", post(device_handler::create_device))
        .route(
            "/device/:id",
            get(device_handler::get_device)
                .put(device_handler::update_device)
                .delete(device_handler::delete_device),
        )
        .route(
            "/device/brand/:brand",
            get(device_handler::list_devices_by_brand),
        )
        .route(
            "/device/state/:state",
            get(device_handler::list_devices_by_state),
        );

    Router::new()
        .route("/ping", get(device_handler::ping))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until the cancellation token fires
///
/// Shutdown is graceful: the listener stops accepting and in-flight requests
/// are allowed to complete before this function returns.
pub async fn run_http_server(
    config: HttpServerConfig,
    state: AppState,
    cancellation_token: CancellationToken,
) -> Result<(), anyhow::Error> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let router = build_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(address = %addr, "HTTP server listening");

    let serve = axum::serve(listener, router).with_graceful_shutdown(async move {
        cancellation_token.cancelled().await;
        debug!("HTTP server shutdown signal received");
    });

    match serve.await {
        Ok(_) => {
            debug!("HTTP server stopped gracefully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("HTTP server error: {}", e);
            Err(e.into())
        }
    }
}

//! Static asset server for the browser front end.
//!
//! Serves one directory. `/` answers with `index.html`, and any request path
//! ending in `.gz` is labelled as gzip-encoded JavaScript so pre-compressed
//! bundles load directly.

use crate::config::ServerSettings;
use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub host: IpAddr,
    /// Port to bind to (0 for random)
    pub port: u16,
    /// Directory of static assets
    pub public_dir: PathBuf,
}

impl ServerConfig {
    pub fn new(host: IpAddr, port: u16, public_dir: PathBuf) -> Self {
        Self {
            host,
            port,
            public_dir,
        }
    }
}

impl From<&ServerSettings> for ServerConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self::new(settings.host, settings.port, settings.public_dir.clone())
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Label `.gz` assets as gzip-encoded JavaScript.
async fn gzip_asset_headers(request: Request, next: Next) -> Response {
    let is_gz = request.uri().path().ends_with(".gz");
    let mut response = next.run(request).await;
    if is_gz {
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_ENCODING, HeaderValue::from_static("gzip"));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/javascript"),
        );
    }
    response
}

/// Build the router for a public directory.
pub fn router(public_dir: PathBuf) -> Router {
    let index = ServeFile::new(public_dir.join("index.html"));
    Router::new()
        .route("/health", get(health))
        .route_service("/", index)
        .fallback_service(ServeDir::new(public_dir))
        .layer(middleware::from_fn(gzip_asset_headers))
}

/// Run the HTTP server
pub async fn run(
    config: ServerConfig,
) -> anyhow::Result<(SocketAddr, tokio::sync::oneshot::Sender<()>)> {
    if !config.public_dir.is_dir() {
        tracing::warn!(
            "Public directory {} does not exist; only /health will answer",
            config.public_dir.display()
        );
    }

    let app = router(config.public_dir.clone());

    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!("Server running at http://localhost:{}", actual_addr.port());

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("Server shutdown signal received");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_addr, shutdown_tx))
}

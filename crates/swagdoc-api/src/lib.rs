//! # swagdoc-api — Documentation Service
//!
//! Axum application publishing generated documentation over HTTP.
//!
//! ## Routes
//!
//! - `/`: UI configuration payload
//! - `/api-docs/v1.2/`: Swagger 1.2 resource listing
//! - `/api-docs/v1.2/{resource}`: Swagger 1.2 API declaration
//! - `/api-docs/v2.0/`: Swagger 2.0 document
//! - `/health/liveness`: liveness probe (no access check)
//!
//! ## Middleware Stack (Tower)
//!
//! TraceLayer → handlers. Callers are identified per request by the
//! [`auth::Caller`] extractor.
//!
//! ## Crate Policy
//!
//! - No generation logic in route handlers; they delegate to `swagdoc-gen`.
//! - All errors map to structured HTTP responses via `AppError`.

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    let docs = routes::docs::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Router::new()
        .route("/health/liveness", get(liveness))
        .merge(docs)
}

/// Liveness probe.
async fn liveness() -> &'static str {
    "ok"
}

/// Serve `app` on `addr` until the process is stopped.
pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "serving documentation");
    axum::serve(listener, app(state)).await
}

//! HTTP surface: the versioned JSON API plus open status endpoints.

pub mod api;
pub mod auth;
pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::ServiceState;

/// Assemble the full application router.
///
/// The token gate wraps only `/api/v0`; `/_status` stays open so external
/// health checks keep working on a token-protected server.
pub fn router(state: ServiceState) -> Router {
    Router::new()
        .nest(
            "/api/v0",
            api::v0::router(state.clone()).layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_token,
            )),
        )
        .nest("/_status", health::router(state.clone()))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes()))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Serve the API on an already-bound listener until ctrl-c.
pub async fn serve(listener: TcpListener, state: ServiceState) -> std::io::Result<()> {
    let app = router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    tracing::info!("shutdown signal received");
}

//! Shared-token gate for the versioned API.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::ServiceState;

/// Header clients present the shared token in.
pub const TOKEN_HEADER: &str = "x-access-token";

/// Reject requests that do not carry the configured token.
///
/// With no token configured every request passes. The comparison is a
/// plain equality check; the token is a LAN-sharing convenience, not a
/// credential store.
pub async fn require_token(
    State(state): State<ServiceState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(expected) = state.token() {
        let presented = request
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());
        if presented != Some(expected) {
            tracing::warn!(path = %request.uri().path(), "rejected request without a valid token");
            return (StatusCode::UNAUTHORIZED, "Invalid or missing token").into_response();
        }
    }
    next.run(request).await
}

//! Service status endpoints
//!
//! Open endpoints for external orchestration:
//! - Liveness probe
//! - Build/version report

use axum::routing::get;
use axum::Router;

use crate::ServiceState;

mod liveness;
mod version;

// Re-export request/response types for use by CLI and other clients
pub use liveness::{LivezRequest, LivezResponse};
pub use version::VersionRequest;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/livez", get(liveness::handler))
        .route("/version", get(version::handler))
        .with_state(state)
}

//! Directory creation API endpoints

use axum::routing::post;
use axum::Router;

use crate::ServiceState;

mod create;

// Re-export request/response types for use by CLI and other clients
pub use create::{CreateDirBody, CreateDirRequest, CreateDirResponse};

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", post(create::handler_root))
        .route("/*path", post(create::handler))
        .with_state(state)
}

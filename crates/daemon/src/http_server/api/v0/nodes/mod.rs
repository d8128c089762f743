//! Node API endpoints
//!
//! Operations addressed by stable node id:
//! - Metadata lookup
//! - Content download
//! - Delete
//! - Rename

use axum::routing::{get, post};
use axum::Router;

use crate::ServiceState;

mod delete_node;
mod download;
mod get;
mod rename;

// Re-export request/response types for use by CLI and other clients
pub use delete_node::{DeleteNodeRequest, DeleteNodeResponse};
pub use download::DownloadQuery;
pub use get::GetNodeRequest;
pub use rename::{RenameBody, RenameRequest};

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/:id", get(get::handler).delete(delete_node::handler))
        .route("/:id/download", get(download::handler))
        .route("/:id/rename", post(rename::handler))
        .with_state(state)
}

//! Tree API endpoints
//!
//! Path-addressed operations on the served directory:
//! - List a directory with hypermedia links
//! - Upload files (multipart)
//! - Delete by path

use axum::routing::get;
use axum::Router;

use crate::ServiceState;

mod delete_path;
mod ls;
mod upload;

// Re-export request/response types for use by CLI and other clients
pub use delete_path::{DeletePathRequest, DeletePathResponse};
pub use ls::{EntryInfo, LinkEntry, LsRequest, LsResponse};
pub use upload::{UploadRequest, UploadResponse};

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", get(ls::handler_root).post(upload::handler_root))
        .route(
            "/*path",
            get(ls::handler)
                .post(upload::handler)
                .delete(delete_path::handler),
        )
        .with_state(state)
}

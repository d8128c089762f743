//! Version 0 of the daemon API.

pub mod dirs;
pub mod nodes;
pub mod tree;

use axum::response::{IntoResponse, Response};
use axum::Router;
use http::StatusCode;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use common::TreeError;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .nest("/tree", tree::router(state.clone()))
        .nest("/dirs", dirs::router(state.clone()))
        .nest("/nodes", nodes::router(state.clone()))
        .with_state(state)
}

/// The one place the tree error taxonomy turns into HTTP statuses, so
/// every endpoint reports the same way.
pub(crate) fn tree_error_response(err: &TreeError) -> Response {
    let status = match err {
        TreeError::AccessDenied | TreeError::Forbidden(_) => StatusCode::FORBIDDEN,
        TreeError::NotFound(_) => StatusCode::NOT_FOUND,
        TreeError::BadRequest(_) => StatusCode::BAD_REQUEST,
        TreeError::Conflict(_) | TreeError::DirectoryNotEmpty(_) => StatusCode::CONFLICT,
        TreeError::System(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "request failed");
    }
    (status, format!("Error: {err}")).into_response()
}

// `/` stays literal so hrefs keep their segment structure; space and the
// other URL-special characters get escaped.
const HREF_ENCODE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`');

/// Percent-encode a relative tree path for use inside an href.
pub(crate) fn encode_href_path(path: &str) -> String {
    utf8_percent_encode(path, HREF_ENCODE).to_string()
}

/// Href of the tree route for a relative path; empty means the root.
pub(crate) fn tree_href(rel: &str) -> String {
    if rel.is_empty() {
        "/api/v0/tree".to_string()
    } else {
        format!("/api/v0/tree/{}", encode_href_path(rel))
    }
}

/// Href of the dirs route for a relative parent path.
pub(crate) fn dirs_href(rel: &str) -> String {
    if rel.is_empty() {
        "/api/v0/dirs".to_string()
    } else {
        format!("/api/v0/dirs/{}", encode_href_path(rel))
    }
}

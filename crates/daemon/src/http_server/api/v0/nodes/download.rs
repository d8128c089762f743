use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use http::{header, StatusCode};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use common::{NodeId, TreeError};

use crate::http_server::api::v0::tree_error_response;
use crate::ServiceState;

/// Query parameters for downloads.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadQuery {
    /// Serve the file inline for in-browser preview instead of forcing a
    /// download.
    #[serde(default)]
    pub view: Option<bool>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<NodeId>,
    Query(query): Query<DownloadQuery>,
) -> Result<impl IntoResponse, DownloadError> {
    let content = state.share().open(&id).await?;
    let disposition = disposition_header(query.view.unwrap_or(false), &content.name);

    tracing::debug!(node = %id, name = %content.name, bytes = content.len, "serving file");

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content.mime_type)
        .header(header::CONTENT_LENGTH, content.len)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from_stream(ReaderStream::new(content.file)))?;
    Ok(response)
}

/// `inline` previews in the browser, `attachment` forces a save dialog.
/// The filename is quoted; quotes and non-ascii bytes in the name are
/// dropped rather than risking a malformed header.
fn disposition_header(view: bool, name: &str) -> String {
    let kind = if view { "inline" } else { "attachment" };
    let safe: String = name
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control() && *c != '"' && *c != '\\')
        .collect();
    if safe.is_empty() {
        kind.to_string()
    } else {
        format!("{kind}; filename=\"{safe}\"")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error("failed to build response: {0}")]
    Response(#[from] http::Error),
}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        match self {
            DownloadError::Tree(e) => tree_error_response(&e),
            DownloadError::Response(_) => {
                tracing::error!(error = %self, "download response construction failed");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {self}")).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_selects_kind() {
        assert_eq!(
            disposition_header(true, "report.pdf"),
            "inline; filename=\"report.pdf\""
        );
        assert_eq!(
            disposition_header(false, "report.pdf"),
            "attachment; filename=\"report.pdf\""
        );
    }

    #[test]
    fn test_disposition_strips_hostile_names() {
        assert_eq!(
            disposition_header(false, "a\"b\r\n.txt"),
            "attachment; filename=\"ab.txt\""
        );
        assert_eq!(disposition_header(false, "日本語"), "attachment");
    }
}

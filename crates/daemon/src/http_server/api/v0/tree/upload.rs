use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::TryStreamExt;
use http::StatusCode;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use tokio_util::io::StreamReader;

use common::TreeError;

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::{tree_error_response, tree_href};
use crate::ServiceState;

/// Request to upload files into a directory. On the wire this is a
/// multipart form with one `files` part per file.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Target directory, relative to the served root; empty for the root.
    pub path: String,
    /// `(file name, content)` pairs.
    pub files: Vec<(String, Vec<u8>)>,
}

/// Response listing the stored files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub uploaded: Vec<String>,
    pub message: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(path): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, UploadError> {
    store_files(&state, &path, multipart).await
}

pub async fn handler_root(
    State(state): State<ServiceState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, UploadError> {
    store_files(&state, "", multipart).await
}

/// Stream each `files` part straight from the wire into the share.
///
/// Parts are stored in order; the first failure aborts the remainder but
/// keeps the files already completed, and the failed part itself leaves
/// nothing behind.
async fn store_files(
    state: &ServiceState,
    raw_dir: &str,
    mut multipart: Multipart,
) -> Result<Response, UploadError> {
    let share = state.share();
    let mut uploaded = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("files") {
            continue;
        }
        let name = field
            .file_name()
            .ok_or(UploadError::MissingFileName)?
            .to_string();

        let reader = StreamReader::new(field.map_err(std::io::Error::other));
        futures::pin_mut!(reader);
        let (_, written) = share.add(raw_dir, &name, reader).await?;

        tracing::debug!(name = %name, bytes = written, "stored uploaded file");
        uploaded.push(name);
    }

    if uploaded.is_empty() {
        return Err(UploadError::NoFiles);
    }

    let message = format!("All {} files uploaded successfully.", uploaded.len());
    Ok((StatusCode::CREATED, Json(UploadResponse { uploaded, message })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error("Malformed multipart request: {0}")]
    Multipart(#[from] MultipartError),
    #[error("File part is missing a file name")]
    MissingFileName,
    #[error("No files were provided")]
    NoFiles,
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self {
            UploadError::Tree(e) => tree_error_response(&e),
            UploadError::Multipart(_) | UploadError::MissingFileName | UploadError::NoFiles => {
                (StatusCode::BAD_REQUEST, format!("Error: {self}")).into_response()
            }
        }
    }
}

impl ApiRequest for UploadRequest {
    type Response = UploadResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join(&tree_href(&self.path)).unwrap();
        let mut form = Form::new();
        for (name, bytes) in self.files {
            form = form.part("files", Part::bytes(bytes).file_name(name));
        }
        client.post(full_url).multipart(form)
    }
}

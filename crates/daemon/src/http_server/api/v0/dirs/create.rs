use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::TreeError;

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::{dirs_href, tree_error_response};
use crate::ServiceState;

/// Body for directory creation: the new directory's name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDirBody {
    pub name: String,
}

/// Request to create a directory under a parent path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDirRequest {
    /// Parent directory, relative to the served root; empty for the root.
    pub path: String,
    /// Name of the directory to create.
    pub name: String,
}

/// Response describing the created directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDirResponse {
    pub name: String,
    /// Path of the new directory, relative to the served root.
    pub path: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(path): Path<String>,
    Json(body): Json<CreateDirBody>,
) -> Result<impl IntoResponse, CreateDirError> {
    create_directory(&state, &path, body).await
}

pub async fn handler_root(
    State(state): State<ServiceState>,
    Json(body): Json<CreateDirBody>,
) -> Result<impl IntoResponse, CreateDirError> {
    create_directory(&state, "", body).await
}

async fn create_directory(
    state: &ServiceState,
    raw_dir: &str,
    body: CreateDirBody,
) -> Result<Response, CreateDirError> {
    let share = state.share();
    let created = share.mkdir(raw_dir, &body.name).await?;

    // Report the name as stored, which may differ from the request by
    // trimmed whitespace.
    let name = created
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let path = share.relative(&created).to_string_lossy().into_owned();

    Ok((StatusCode::CREATED, Json(CreateDirResponse { name, path })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum CreateDirError {
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl IntoResponse for CreateDirError {
    fn into_response(self) -> Response {
        match self {
            CreateDirError::Tree(e) => tree_error_response(&e),
        }
    }
}

impl ApiRequest for CreateDirRequest {
    type Response = CreateDirResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join(&dirs_href(&self.path)).unwrap();
        client.post(full_url).json(&CreateDirBody { name: self.name })
    }
}

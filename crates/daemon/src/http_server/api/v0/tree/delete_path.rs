use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::TreeError;

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::{tree_error_response, tree_href};
use crate::ServiceState;

/// Query parameters for path deletes.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteQuery {
    /// Required to delete a non-empty directory.
    #[serde(default)]
    pub recursive: Option<bool>,
}

/// Request to delete an entry by tree path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePathRequest {
    pub path: String,
    pub recursive: bool,
}

/// Response confirming the deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePathResponse {
    pub deleted: bool,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(path): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<impl IntoResponse, DeletePathError> {
    state
        .share()
        .rm(&path, query.recursive.unwrap_or(false))
        .await?;

    Ok((StatusCode::OK, Json(DeletePathResponse { deleted: true })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum DeletePathError {
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl IntoResponse for DeletePathError {
    fn into_response(self) -> Response {
        match self {
            DeletePathError::Tree(e) => tree_error_response(&e),
        }
    }
}

impl ApiRequest for DeletePathRequest {
    type Response = DeletePathResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join(&tree_href(&self.path)).unwrap();
        client
            .delete(full_url)
            .query(&[("recursive", self.recursive)])
    }
}

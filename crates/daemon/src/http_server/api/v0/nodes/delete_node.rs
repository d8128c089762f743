use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::{NodeId, TreeError};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::tree_error_response;
use crate::ServiceState;

/// Query parameters for node deletes.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteQuery {
    /// Required to delete a non-empty directory.
    #[serde(default)]
    pub recursive: Option<bool>,
}

/// Request to delete an entry by node id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteNodeRequest {
    pub node_id: NodeId,
    pub recursive: bool,
}

/// Response confirming the deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteNodeResponse {
    pub deleted: bool,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<NodeId>,
    Query(query): Query<DeleteQuery>,
) -> Result<impl IntoResponse, DeleteNodeError> {
    state
        .share()
        .rm_node(&id, query.recursive.unwrap_or(false))
        .await?;

    Ok((StatusCode::OK, Json(DeleteNodeResponse { deleted: true })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteNodeError {
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl IntoResponse for DeleteNodeError {
    fn into_response(self) -> Response {
        match self {
            DeleteNodeError::Tree(e) => tree_error_response(&e),
        }
    }
}

impl ApiRequest for DeleteNodeRequest {
    type Response = DeleteNodeResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url
            .join(&format!("/api/v0/nodes/{}", self.node_id))
            .unwrap();
        client
            .delete(full_url)
            .query(&[("recursive", self.recursive)])
    }
}

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::{NodeId, TreeError};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::tree::EntryInfo;
use crate::http_server::api::v0::tree_error_response;
use crate::ServiceState;

/// Request to fetch one entry's metadata by node id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetNodeRequest {
    pub node_id: NodeId,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<NodeId>,
) -> Result<impl IntoResponse, GetNodeError> {
    let share = state.share();
    let entry = share.stat(&id).await?;
    let rel = share
        .relative(&entry.node.path)
        .to_string_lossy()
        .into_owned();

    Ok((
        http::StatusCode::OK,
        Json(EntryInfo::new(&entry, &rel, share.allow_delete())),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum GetNodeError {
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl IntoResponse for GetNodeError {
    fn into_response(self) -> Response {
        match self {
            GetNodeError::Tree(e) => tree_error_response(&e),
        }
    }
}

impl ApiRequest for GetNodeRequest {
    type Response = EntryInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url
            .join(&format!("/api/v0/nodes/{}", self.node_id))
            .unwrap();
        client.get(full_url)
    }
}

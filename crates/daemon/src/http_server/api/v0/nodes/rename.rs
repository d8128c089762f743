use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::{NodeId, TreeError};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::tree::EntryInfo;
use crate::http_server::api::v0::tree_error_response;
use crate::ServiceState;

/// Body for renames: the entry's new name, a single path component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameBody {
    pub name: String,
}

/// Request to rename an entry by node id. The id survives the rename.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRequest {
    pub node_id: NodeId,
    pub name: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<NodeId>,
    Json(body): Json<RenameBody>,
) -> Result<impl IntoResponse, RenameError> {
    let share = state.share();
    let node = share.mv(&id, &body.name).await?;

    // Fresh stat of the renamed entry so the response carries current
    // metadata, not the pre-rename observation.
    let entry = share.stat(&node.id).await?;
    let rel = share
        .relative(&entry.node.path)
        .to_string_lossy()
        .into_owned();

    Ok((
        StatusCode::OK,
        Json(EntryInfo::new(&entry, &rel, share.allow_delete())),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum RenameError {
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl IntoResponse for RenameError {
    fn into_response(self) -> Response {
        match self {
            RenameError::Tree(e) => tree_error_response(&e),
        }
    }
}

impl ApiRequest for RenameRequest {
    type Response = EntryInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url
            .join(&format!("/api/v0/nodes/{}/rename", self.node_id))
            .unwrap();
        client.post(full_url).json(&RenameBody { name: self.name })
    }
}

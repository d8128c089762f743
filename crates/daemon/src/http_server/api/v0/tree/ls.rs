use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::{Entry, TreeError};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::{dirs_href, tree_error_response, tree_href};
use crate::ServiceState;

/// Request to list a directory by its tree path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LsRequest {
    /// Path relative to the served root; empty lists the root.
    pub path: String,
}

/// Response containing one directory's entries, directories first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LsResponse {
    /// The listed directory, relative to the served root.
    pub path: String,
    pub items: Vec<EntryInfo>,
    #[serde(rename = "_links")]
    pub links: BTreeMap<String, LinkEntry>,
}

/// One hypermedia link: where and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkEntry {
    pub href: String,
    pub method: String,
}

impl LinkEntry {
    fn get(href: String) -> Self {
        Self {
            href,
            method: "GET".to_string(),
        }
    }

    fn post(href: String) -> Self {
        Self {
            href,
            method: "POST".to_string(),
        }
    }

    fn delete(href: String) -> Self {
        Self {
            href,
            method: "DELETE".to_string(),
        }
    }
}

/// Wire form of one directory entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryInfo {
    pub id: common::NodeId,
    pub name: String,
    /// Path relative to the served root.
    pub path: String,
    pub is_dir: bool,
    /// File size in bytes; absent for directories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_byte: Option<u64>,
    /// Human-readable modification time (UTC).
    pub modified: Option<String>,
    /// Raw modification time, unix seconds.
    pub modified_at: Option<i64>,
    pub mime_type: String,
    #[serde(rename = "_links")]
    pub links: BTreeMap<String, LinkEntry>,
}

impl EntryInfo {
    pub fn new(entry: &Entry, rel_path: &str, allow_delete: bool) -> Self {
        let id = entry.node.id;
        let modified = entry.modified.map(DateTime::<Utc>::from);

        let mut links = BTreeMap::new();
        links.insert(
            "self".to_string(),
            LinkEntry::get(format!("/api/v0/nodes/{id}")),
        );
        if entry.is_dir {
            links.insert("contents".to_string(), LinkEntry::get(tree_href(rel_path)));
        } else {
            links.insert(
                "download".to_string(),
                LinkEntry::get(format!("/api/v0/nodes/{id}/download")),
            );
            if is_previewable(&entry.mime_type) {
                links.insert(
                    "preview".to_string(),
                    LinkEntry::get(format!("/api/v0/nodes/{id}/download?view=true")),
                );
            }
        }
        if allow_delete {
            links.insert(
                "delete".to_string(),
                LinkEntry::delete(format!("/api/v0/nodes/{id}")),
            );
        }
        links.insert(
            "rename".to_string(),
            LinkEntry::post(format!("/api/v0/nodes/{id}/rename")),
        );

        Self {
            id,
            name: entry.node.name.clone(),
            path: rel_path.to_string(),
            is_dir: entry.is_dir,
            size_byte: entry.size,
            modified: modified.map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            modified_at: modified.map(|dt| dt.timestamp()),
            mime_type: entry.mime_type.clone(),
            links,
        }
    }
}

/// Whether a browser can render the type inline, which decides if the
/// entry advertises a `preview` link.
fn is_previewable(mime_type: &str) -> bool {
    mime_type == "application/pdf"
        || ["image/", "video/", "audio/", "text/"]
            .iter()
            .any(|prefix| mime_type.starts_with(prefix))
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, LsError> {
    list_directory(&state, &path).await
}

pub async fn handler_root(
    State(state): State<ServiceState>,
) -> Result<impl IntoResponse, LsError> {
    list_directory(&state, "").await
}

async fn list_directory(state: &ServiceState, raw_path: &str) -> Result<Response, LsError> {
    let share = state.share();
    let listing = share.ls(raw_path).await?;
    let dir_rel = listing.path.to_string_lossy().into_owned();

    let items = listing
        .entries
        .iter()
        .map(|entry| {
            let rel = share.relative(&entry.node.path).to_string_lossy().into_owned();
            EntryInfo::new(entry, &rel, share.allow_delete())
        })
        .collect();

    let mut links = BTreeMap::new();
    links.insert("self".to_string(), LinkEntry::get(tree_href(&dir_rel)));
    links.insert("upload".to_string(), LinkEntry::post(tree_href(&dir_rel)));
    links.insert("mkdir".to_string(), LinkEntry::post(dirs_href(&dir_rel)));

    Ok((
        http::StatusCode::OK,
        Json(LsResponse {
            path: dir_rel,
            items,
            links,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum LsError {
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl IntoResponse for LsError {
    fn into_response(self) -> Response {
        match self {
            LsError::Tree(e) => tree_error_response(&e),
        }
    }
}

impl ApiRequest for LsRequest {
    type Response = LsResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join(&tree_href(&self.path)).unwrap();
        client.get(full_url)
    }
}

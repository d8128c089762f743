//! Stable identities for filesystem entries.
//!
//! Clients address entries by an 8-byte id derived from the entry's device
//! and inode numbers, so an id keeps working across renames and stops
//! working when the underlying inode is gone.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tokio::sync::RwLock;

/// Stable identity for a filesystem entry: the first 8 bytes of
/// `blake3("{device}:{inode}")`, rendered as 16 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId([u8; 8]);

impl NodeId {
    pub fn from_metadata(meta: &std::fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;

        let raw = format!("{}:{}", meta.dev(), meta.ino());
        let digest = blake3::hash(raw.as_bytes());
        let mut id = [0u8; 8];
        id.copy_from_slice(&digest.as_bytes()[..8]);
        Self(id)
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for NodeId {
    type Err = ParseNodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| ParseNodeIdError(s.to_string()))?;
        let id: [u8; 8] = bytes
            .try_into()
            .map_err(|_| ParseNodeIdError(s.to_string()))?;
        Ok(Self(id))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid node id: {0:?}")]
pub struct ParseNodeIdError(String);

// Ids travel as their hex string so they can embed directly in URLs and
// JSON without a binary encoding.
impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// A registered filesystem entry. `path` is absolute and inside the jail;
/// `name` is the final path component at the last observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub path: PathBuf,
}

/// In-memory map from node ids to their last observed location.
///
/// Entries appear when a listing observes them and are refreshed on every
/// re-observation, so a rename keeps the id while the recorded path moves.
/// Lookups never touch the filesystem; callers re-verify an entry before
/// trusting it (see [`crate::share::Share::node`]).
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: Arc<RwLock<HashMap<NodeId, Node>>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or refresh the entry for `path`.
    pub async fn register(&self, path: &Path, meta: &std::fs::Metadata) -> Node {
        let id = NodeId::from_metadata(meta);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let node = Node {
            id,
            name,
            path: path.to_path_buf(),
        };
        self.nodes.write().await.insert(id, node.clone());
        node
    }

    /// Look up a node by id, returning a clone of the last observation.
    pub async fn resolve(&self, id: &NodeId) -> Option<Node> {
        self.nodes.read().await.get(id).cloned()
    }

    /// Forget a node whose backing entry is gone.
    pub async fn evict(&self, id: &NodeId) -> Option<Node> {
        self.nodes.write().await.remove(id)
    }

    pub async fn len(&self) -> usize {
        self.nodes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.nodes.read().await.is_empty()
    }
}

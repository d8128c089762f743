//! The tree service: one served directory and every operation the HTTP
//! surface exposes over it.

mod list;
mod mutate;
mod serve;

pub use list::{Entry, Listing};
pub use serve::Content;

use std::path::Path;

use crate::error::TreeError;
use crate::jail::Jail;
use crate::node::{Node, NodeId, NodeRegistry};

/// A directory subtree served to clients.
///
/// Cloning is cheap; clones share the node registry.
#[derive(Debug, Clone)]
pub struct Share {
    jail: Jail,
    registry: NodeRegistry,
    allow_delete: bool,
}

impl Share {
    pub async fn new(root: impl AsRef<Path>, allow_delete: bool) -> Result<Self, TreeError> {
        Ok(Self {
            jail: Jail::new(root).await?,
            registry: NodeRegistry::new(),
            allow_delete,
        })
    }

    pub fn root(&self) -> &Path {
        self.jail.root()
    }

    pub fn allow_delete(&self) -> bool {
        self.allow_delete
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub(crate) fn jail(&self) -> &Jail {
        &self.jail
    }

    /// Express `path` relative to the served root, for wire formats.
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        self.jail.relativize(path)
    }

    /// Resolve a node id to a live filesystem entry.
    ///
    /// The registry only remembers the last observation, so the entry is
    /// re-stat'ed and its identity re-derived. A path deleted behind our
    /// back, or an inode recycled for something else, reads as gone rather
    /// than as stale data; either way the id is evicted.
    pub async fn node(&self, id: &NodeId) -> Result<Node, TreeError> {
        let node = self
            .registry
            .resolve(id)
            .await
            .ok_or_else(|| TreeError::NotFound(format!("unknown node id: {id}")))?;

        match tokio::fs::metadata(&node.path).await {
            Ok(meta) if NodeId::from_metadata(&meta) == *id => Ok(node),
            Ok(_) | Err(_) => {
                self.registry.evict(id).await;
                Err(TreeError::NotFound(format!("node {id} is gone from disk")))
            }
        }
    }

    /// Fresh metadata view of a node, after verifying it.
    pub async fn stat(&self, id: &NodeId) -> Result<Entry, TreeError> {
        let node = self.node(id).await?;
        let meta = tokio::fs::metadata(&node.path).await?;
        Ok(Entry::new(node, &meta))
    }
}

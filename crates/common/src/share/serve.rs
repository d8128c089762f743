use tokio::fs::File;

use crate::error::TreeError;
use crate::node::NodeId;

use super::Share;

/// An opened file ready to stream to a client.
#[derive(Debug)]
pub struct Content {
    pub file: File,
    pub len: u64,
    /// Extension guess; `application/octet-stream` when unknown.
    pub mime_type: String,
    pub name: String,
}

impl Share {
    /// Open a node's bytes for streaming.
    ///
    /// Directories open fine on unix, so the check happens on the opened
    /// handle rather than on a pre-stat that could race a replacement.
    pub async fn open(&self, id: &NodeId) -> Result<Content, TreeError> {
        let node = self.node(id).await?;

        let file = File::open(&node.path).await?;
        let meta = file.metadata().await?;
        if meta.is_dir() {
            return Err(TreeError::BadRequest(format!(
                "cannot open a directory: {}",
                node.name
            )));
        }

        let mime_type = mime_guess::from_path(&node.path)
            .first_or_octet_stream()
            .to_string();

        Ok(Content {
            file,
            len: meta.len(),
            mime_type,
            name: node.name,
        })
    }
}

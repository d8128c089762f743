use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::error::TreeError;
use crate::node::Node;

use super::Share;

/// Metadata for one directory child, computed fresh for each listing.
#[derive(Debug, Clone)]
pub struct Entry {
    pub node: Node,
    pub is_dir: bool,
    /// File size in bytes; `None` for directories.
    pub size: Option<u64>,
    pub modified: Option<SystemTime>,
    /// Guessed from the extension for files; `inode/directory` for
    /// directories.
    pub mime_type: String,
}

impl Entry {
    pub(crate) fn new(node: Node, meta: &std::fs::Metadata) -> Self {
        let is_dir = meta.is_dir();
        let mime_type = if is_dir {
            "inode/directory".to_string()
        } else {
            mime_guess::from_path(&node.path)
                .first_or_octet_stream()
                .to_string()
        };
        Self {
            is_dir,
            size: (!is_dir).then(|| meta.len()),
            modified: meta.modified().ok(),
            mime_type,
            node,
        }
    }
}

/// An ordered view of one directory's immediate children.
#[derive(Debug, Clone)]
pub struct Listing {
    /// The listed directory, relative to the served root.
    pub path: PathBuf,
    pub entries: Vec<Entry>,
}

impl Share {
    /// List the immediate children of a jailed directory path.
    ///
    /// Every child observed here is registered (or refreshed) in the node
    /// registry. A child whose stat fails mid-walk is skipped with a
    /// warning; a permission failure opening the directory itself yields an
    /// empty listing, which is how this service has always presented
    /// unreadable directories to browsers.
    pub async fn ls(&self, raw_path: &str) -> Result<Listing, TreeError> {
        let dir = self.jail().resolve(raw_path).await?;
        let rel = self.relative(&dir).to_path_buf();

        let meta = tokio::fs::metadata(&dir).await?;
        if !meta.is_dir() {
            return Err(TreeError::NotFound(format!(
                "not a directory: {}",
                rel.display()
            )));
        }

        let mut entries = Vec::new();
        let mut reader = match tokio::fs::read_dir(&dir).await {
            Ok(reader) => reader,
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                tracing::warn!(path = %dir.display(), "unreadable directory listed as empty");
                return Ok(Listing { path: rel, entries });
            }
            Err(e) => return Err(e.into()),
        };

        while let Some(child) = reader.next_entry().await? {
            let path = child.path();
            let meta = match tokio::fs::metadata(&path).await {
                Ok(meta) => meta,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unstattable entry");
                    continue;
                }
            };

            let node = self.registry().register(&path, &meta).await;
            entries.push(Entry::new(node, &meta));
        }

        entries.sort_by(|a, b| {
            b.is_dir.cmp(&a.is_dir).then_with(|| {
                a.node
                    .name
                    .to_lowercase()
                    .cmp(&b.node.name.to_lowercase())
            })
        });

        Ok(Listing { path: rel, entries })
    }
}

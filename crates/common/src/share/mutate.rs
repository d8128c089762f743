use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncRead, AsyncWriteExt};

use crate::error::TreeError;
use crate::node::{Node, NodeId};

use super::Share;

impl Share {
    /// Store one uploaded file under a jailed directory path.
    ///
    /// The name is validated and the destination checked before any byte is
    /// written; the bytes then stream into a temp file in the target
    /// directory and move into place with a no-clobber rename. A conflicting
    /// upload fails without leaving anything behind, and a lost rename race
    /// reads as `Conflict`, never as an overwrite.
    pub async fn add<R>(
        &self,
        raw_dir: &str,
        name: &str,
        mut content: R,
    ) -> Result<(PathBuf, u64), TreeError>
    where
        R: AsyncRead + Unpin,
    {
        let dir = self.target_dir(raw_dir).await?;
        let name = sanitize_name(name)?;
        let dest = dir.join(&name);
        ensure_vacant(&dest, &name).await?;

        // tempfile only offers blocking calls; keep them off the runtime.
        let tmp_dir = dir.clone();
        let (file, tmp_path) = tokio::task::spawn_blocking(move || {
            tempfile::NamedTempFile::new_in(tmp_dir)
        })
        .await
        .map_err(std::io::Error::other)??
        .into_parts();

        let mut out = tokio::fs::File::from_std(file);
        let written = tokio::io::copy(&mut content, &mut out).await?;
        out.flush().await?;
        drop(out);

        let persist_dest = dest.clone();
        tokio::task::spawn_blocking(move || tmp_path.persist_noclobber(persist_dest))
            .await
            .map_err(std::io::Error::other)?
            .map_err(|e| {
                if e.error.kind() == ErrorKind::AlreadyExists {
                    TreeError::Conflict(format!("\"{name}\" already exists"))
                } else {
                    TreeError::System(e.error)
                }
            })?;

        tracing::debug!(path = %dest.display(), bytes = written, "stored upload");
        Ok((dest, written))
    }

    /// Create a directory under a jailed parent path.
    pub async fn mkdir(&self, raw_dir: &str, name: &str) -> Result<PathBuf, TreeError> {
        let dir = self.target_dir(raw_dir).await?;
        let name = sanitize_name(name)?;
        let dest = dir.join(&name);

        match tokio::fs::create_dir(&dest).await {
            Ok(()) => Ok(dest),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(TreeError::Conflict(format!("\"{name}\" already exists")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a jailed path.
    pub async fn rm(&self, raw_path: &str, recursive: bool) -> Result<(), TreeError> {
        self.check_delete_allowed()?;
        let path = self.jail().resolve(raw_path).await?;
        if path == self.root() {
            return Err(TreeError::BadRequest(
                "refusing to delete the served root".to_string(),
            ));
        }

        let meta = tokio::fs::metadata(&path).await?;
        let id = NodeId::from_metadata(&meta);
        self.remove(&path, &meta, recursive).await?;
        self.registry().evict(&id).await;
        Ok(())
    }

    /// Delete the entry behind a node id and evict the id.
    pub async fn rm_node(&self, id: &NodeId, recursive: bool) -> Result<(), TreeError> {
        self.check_delete_allowed()?;
        let node = self.node(id).await?;

        let meta = tokio::fs::metadata(&node.path).await?;
        self.remove(&node.path, &meta, recursive).await?;
        self.registry().evict(id).await;
        Ok(())
    }

    /// Rename a node within its parent directory. The id is inode-derived,
    /// so it survives the rename; the registry is refreshed in place.
    pub async fn mv(&self, id: &NodeId, new_name: &str) -> Result<Node, TreeError> {
        let node = self.node(id).await?;
        let name = sanitize_name(new_name)?;
        let parent = node.path.parent().ok_or_else(|| {
            TreeError::BadRequest("cannot rename the served root".to_string())
        })?;
        let dest = parent.join(&name);
        if dest == node.path {
            return Ok(node);
        }
        ensure_vacant(&dest, &name).await?;

        tokio::fs::rename(&node.path, &dest).await?;
        let meta = tokio::fs::metadata(&dest).await?;
        Ok(self.registry().register(&dest, &meta).await)
    }

    fn check_delete_allowed(&self) -> Result<(), TreeError> {
        if self.allow_delete() {
            Ok(())
        } else {
            Err(TreeError::Forbidden(
                "delete operations are disabled on this server".to_string(),
            ))
        }
    }

    /// Jail a path and require it to be an existing directory.
    async fn target_dir(&self, raw_dir: &str) -> Result<PathBuf, TreeError> {
        let dir = self.jail().resolve(raw_dir).await?;
        let meta = tokio::fs::metadata(&dir).await?;
        if !meta.is_dir() {
            return Err(TreeError::BadRequest(format!(
                "target is not a directory: {}",
                self.relative(&dir).display()
            )));
        }
        Ok(dir)
    }

    async fn remove(
        &self,
        path: &Path,
        meta: &std::fs::Metadata,
        recursive: bool,
    ) -> Result<(), TreeError> {
        if meta.is_dir() {
            if recursive {
                tokio::fs::remove_dir_all(path).await?;
            } else {
                let mut reader = tokio::fs::read_dir(path).await?;
                if reader.next_entry().await?.is_some() {
                    return Err(TreeError::DirectoryNotEmpty(
                        self.relative(path).to_path_buf(),
                    ));
                }
                tokio::fs::remove_dir(path).await?;
            }
        } else {
            tokio::fs::remove_file(path).await?;
        }
        Ok(())
    }
}

/// Validate a client-supplied entry name: one path component, no
/// separators, no control characters, not a dot name.
fn sanitize_name(name: &str) -> Result<String, TreeError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TreeError::BadRequest("empty name".to_string()));
    }
    if name == "." || name == ".." {
        return Err(TreeError::BadRequest(format!("invalid name: {name:?}")));
    }
    if name
        .chars()
        .any(|c| c == '/' || c == '\\' || c.is_control())
    {
        return Err(TreeError::BadRequest(format!(
            "name contains a path separator or control character: {name:?}"
        )));
    }
    Ok(name.to_string())
}

async fn ensure_vacant(dest: &Path, name: &str) -> Result<(), TreeError> {
    match tokio::fs::symlink_metadata(dest).await {
        Ok(_) => Err(TreeError::Conflict(format!("\"{name}\" already exists"))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_accepts_ordinary_names() {
        assert_eq!(sanitize_name("report.pdf").unwrap(), "report.pdf");
        assert_eq!(sanitize_name(".hidden").unwrap(), ".hidden");
        assert_eq!(sanitize_name(" padded.txt ").unwrap(), "padded.txt");
    }

    #[test]
    fn test_sanitize_rejects_escapes() {
        assert!(sanitize_name("").is_err());
        assert!(sanitize_name("   ").is_err());
        assert!(sanitize_name(".").is_err());
        assert!(sanitize_name("..").is_err());
        assert!(sanitize_name("a/b").is_err());
        assert!(sanitize_name("a\\b").is_err());
        assert!(sanitize_name("a\0b").is_err());
        assert!(sanitize_name("a\nb").is_err());
    }
}

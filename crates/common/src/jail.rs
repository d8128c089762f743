//! Path confinement for client-supplied paths.
//!
//! Every path a client names is resolved through a [`Jail`] before it is
//! used, so traversal sequences and symlinks cannot reach outside the
//! served directory.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::error::TreeError;

/// Confines client-supplied paths to one canonical root directory.
///
/// The root is canonicalized once at construction; [`Jail::resolve`]
/// re-canonicalizes every candidate so `.`/`..` segments and symlinks are
/// flattened before the containment check.
#[derive(Debug, Clone)]
pub struct Jail {
    root: PathBuf,
}

impl Jail {
    /// Anchor a jail at `root`. Fails if the path cannot be canonicalized
    /// or is not a directory.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self, TreeError> {
        let root = tokio::fs::canonicalize(root.as_ref()).await?;
        let meta = tokio::fs::metadata(&root).await?;
        if !meta.is_dir() {
            return Err(TreeError::BadRequest(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a client-supplied path into an absolute path inside the root.
    ///
    /// The input is percent-decoded, joined onto the root and canonicalized.
    /// Anything that lands outside the root is `AccessDenied`; a path that
    /// cannot be canonicalized because it does not exist is `NotFound`.
    ///
    /// The decode happens here even though HTTP routing has usually decoded
    /// the path once already, so a name whose literal bytes form a valid
    /// `%XX` sequence (`a%2eb`) resolves to its decoded form (`a.b`). This
    /// double decode is deliberate: it matches how the service has always
    /// read paths, and the containment check runs after all decoding, so an
    /// encoded traversal can never slip through as a literal name.
    pub async fn resolve(&self, raw: &str) -> Result<PathBuf, TreeError> {
        let decoded = percent_decode_str(raw).decode_utf8_lossy();
        if decoded.is_empty() {
            return Ok(self.root.clone());
        }

        // Lexical pre-check: a path that climbs above the root is an escape
        // even when the target does not exist, and absolute paths never
        // resolve relative to the root.
        let mut depth: i64 = 0;
        for component in Path::new(decoded.as_ref()).components() {
            match component {
                Component::ParentDir => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(TreeError::AccessDenied);
                    }
                }
                Component::Normal(_) => depth += 1,
                Component::CurDir => {}
                Component::RootDir | Component::Prefix(_) => {
                    return Err(TreeError::AccessDenied)
                }
            }
        }

        let candidate = self.root.join(decoded.as_ref());
        let resolved = match tokio::fs::canonicalize(&candidate).await {
            Ok(path) => path,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TreeError::NotFound(format!("no such path: {decoded}")))
            }
            Err(e) => return Err(e.into()),
        };

        if !resolved.starts_with(&self.root) {
            return Err(TreeError::AccessDenied);
        }

        Ok(resolved)
    }

    /// Express `path` relative to the root, for display and wire formats.
    pub fn relativize<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn jail_with_file() -> (Jail, tempfile::TempDir) {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("docs")).unwrap();
        std::fs::write(temp.path().join("docs/readme.md"), b"hello").unwrap();
        let jail = Jail::new(temp.path()).await.unwrap();
        (jail, temp)
    }

    #[tokio::test]
    async fn test_resolves_inside_root() {
        let (jail, _temp) = jail_with_file().await;
        let resolved = jail.resolve("docs/readme.md").await.unwrap();
        assert!(resolved.starts_with(jail.root()));
        assert_eq!(jail.relativize(&resolved), Path::new("docs/readme.md"));
    }

    #[tokio::test]
    async fn test_empty_path_is_root() {
        let (jail, _temp) = jail_with_file().await;
        assert_eq!(jail.resolve("").await.unwrap(), jail.root());
    }

    #[tokio::test]
    async fn test_traversal_is_denied() {
        let (jail, _temp) = jail_with_file().await;
        assert!(matches!(
            jail.resolve("../secret").await,
            Err(TreeError::AccessDenied)
        ));
        assert!(matches!(
            jail.resolve("docs/../../secret").await,
            Err(TreeError::AccessDenied)
        ));
    }

    #[tokio::test]
    async fn test_encoded_traversal_is_denied() {
        let (jail, _temp) = jail_with_file().await;
        assert!(matches!(
            jail.resolve("%2e%2e%2fsecret").await,
            Err(TreeError::AccessDenied)
        ));
    }

    #[tokio::test]
    async fn test_absolute_path_is_denied() {
        let (jail, _temp) = jail_with_file().await;
        assert!(matches!(
            jail.resolve("/etc/passwd").await,
            Err(TreeError::AccessDenied)
        ));
    }

    #[tokio::test]
    async fn test_missing_path_is_not_found() {
        let (jail, _temp) = jail_with_file().await;
        assert!(matches!(
            jail.resolve("docs/missing.md").await,
            Err(TreeError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_symlink_escape_is_denied() {
        let (jail, temp) = jail_with_file().await;
        let outside = tempfile::TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("way-out")).unwrap();
        assert!(matches!(
            jail.resolve("way-out").await,
            Err(TreeError::AccessDenied)
        ));
    }

    #[tokio::test]
    async fn test_already_decoded_input_decodes_again() {
        let (jail, temp) = jail_with_file().await;
        std::fs::write(temp.path().join("a.b"), b"decoded").unwrap();
        std::fs::write(temp.path().join("a%2eb"), b"literal").unwrap();

        // Input that HTTP routing already decoded once still decodes here;
        // the literal `%`-named sibling is shadowed.
        let resolved = jail.resolve("a%2eb").await.unwrap();
        assert_eq!(jail.relativize(&resolved), Path::new("a.b"));
    }

    #[tokio::test]
    async fn test_percent_decoding_reaches_real_names() {
        let (jail, temp) = jail_with_file().await;
        std::fs::write(temp.path().join("docs/with space.txt"), b"x").unwrap();
        let resolved = jail.resolve("docs/with%20space.txt").await.unwrap();
        assert_eq!(
            jail.relativize(&resolved),
            Path::new("docs/with space.txt")
        );
    }
}

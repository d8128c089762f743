//! Integration tests for the share: listing, mutation, and content serving
//! against a real temp directory.

mod common;

use std::path::Path;

use tokio::io::AsyncReadExt;

use ::common::{Entry, Listing, TreeError};

fn entry_named<'a>(listing: &'a Listing, name: &str) -> &'a Entry {
    listing
        .entries
        .iter()
        .find(|e| e.node.name == name)
        .unwrap_or_else(|| panic!("no entry named {name}"))
}

#[tokio::test]
async fn test_listing_orders_directories_first() {
    let (share, _temp) = common::setup_share(false).await;

    let listing = share.ls("").await.unwrap();
    let names: Vec<&str> = listing.entries.iter().map(|e| e.node.name.as_str()).collect();
    assert_eq!(names, vec!["docs", "notes.txt"]);

    let docs = entry_named(&listing, "docs");
    assert!(docs.is_dir);
    assert_eq!(docs.mime_type, "inode/directory");
    assert_eq!(docs.size, None);

    let notes = entry_named(&listing, "notes.txt");
    assert!(!notes.is_dir);
    assert_eq!(notes.size, Some(10));
    assert_eq!(notes.mime_type, "text/plain");
    assert!(notes.modified.is_some());
}

#[tokio::test]
async fn test_listing_sort_is_case_insensitive() {
    let (share, temp) = common::setup_share(false).await;
    std::fs::write(temp.path().join("Alpha.txt"), b"x").unwrap();
    std::fs::write(temp.path().join("zed.txt"), b"x").unwrap();

    let listing = share.ls("").await.unwrap();
    let names: Vec<&str> = listing.entries.iter().map(|e| e.node.name.as_str()).collect();
    assert_eq!(names, vec!["docs", "Alpha.txt", "notes.txt", "zed.txt"]);
}

#[tokio::test]
async fn test_listing_registers_nodes() {
    let (share, _temp) = common::setup_share(false).await;

    let listing = share.ls("").await.unwrap();
    assert_eq!(share.registry().len().await, 2);

    let id = entry_named(&listing, "notes.txt").node.id;
    let resolved = share.registry().resolve(&id).await.unwrap();
    assert_eq!(resolved.name, "notes.txt");
}

#[tokio::test]
async fn test_nested_listing_path_is_relative() {
    let (share, _temp) = common::setup_share(false).await;

    let listing = share.ls("docs").await.unwrap();
    assert_eq!(listing.path, Path::new("docs"));
    assert_eq!(listing.entries.len(), 1);
    assert_eq!(listing.entries[0].node.name, "guide.md");
}

#[tokio::test]
async fn test_listing_requires_a_directory() {
    let (share, _temp) = common::setup_share(false).await;

    assert!(matches!(
        share.ls("missing").await,
        Err(TreeError::NotFound(_))
    ));
    assert!(matches!(
        share.ls("notes.txt").await,
        Err(TreeError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_unreadable_directory_lists_as_empty() {
    use std::os::unix::fs::PermissionsExt;

    let (share, temp) = common::setup_share(false).await;
    let locked = temp.path().join("locked");
    std::fs::create_dir(&locked).unwrap();
    std::fs::write(locked.join("inner.txt"), b"x").unwrap();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits entirely; there is nothing to observe.
    if std::fs::read_dir(&locked).is_err() {
        let listing = share.ls("locked").await.unwrap();
        assert_eq!(listing.path, Path::new("locked"));
        assert!(listing.entries.is_empty());
    }

    // Restore so the temp dir can be cleaned up.
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[tokio::test]
async fn test_unstattable_entry_is_skipped() {
    let (share, temp) = common::setup_share(false).await;
    std::os::unix::fs::symlink(temp.path().join("gone"), temp.path().join("dangling")).unwrap();

    let listing = share.ls("").await.unwrap();
    let names: Vec<&str> = listing.entries.iter().map(|e| e.node.name.as_str()).collect();
    assert_eq!(names, vec!["docs", "notes.txt"]);
}

#[tokio::test]
async fn test_traversal_never_escapes() {
    let (share, _temp) = common::setup_share(false).await;

    assert!(matches!(
        share.ls("..").await,
        Err(TreeError::AccessDenied)
    ));
    assert!(matches!(
        share.ls("%2e%2e%2f").await,
        Err(TreeError::AccessDenied)
    ));
}

#[tokio::test]
async fn test_upload_writes_full_content() {
    let (share, temp) = common::setup_share(false).await;
    let payload = vec![7u8; 64 * 1024];

    let (dest, written) = share.add("docs", "data.bin", &payload[..]).await.unwrap();
    assert_eq!(written, payload.len() as u64);
    assert_eq!(std::fs::read(temp.path().join("docs/data.bin")).unwrap(), payload);
    assert_eq!(dest, temp.path().canonicalize().unwrap().join("docs/data.bin"));

    let listing = share.ls("docs").await.unwrap();
    assert_eq!(entry_named(&listing, "data.bin").size, Some(payload.len() as u64));
}

#[tokio::test]
async fn test_upload_conflict_leaves_no_partial() {
    let (share, temp) = common::setup_share(false).await;

    let result = share.add("", "notes.txt", &b"overwrite!"[..]).await;
    assert!(matches!(result, Err(TreeError::Conflict(_))));

    // The original survives and no temp artifact is left behind.
    assert_eq!(
        std::fs::read(temp.path().join("notes.txt")).unwrap(),
        b"ten bytes!"
    );
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 2);
}

#[tokio::test]
async fn test_upload_rejects_bad_names() {
    let (share, _temp) = common::setup_share(false).await;

    for name in ["", "  ", ".", "..", "a/b", "a\\b", "a\nb"] {
        assert!(
            matches!(
                share.add("", name, &b"x"[..]).await,
                Err(TreeError::BadRequest(_))
            ),
            "expected rejection for {name:?}"
        );
    }
}

#[tokio::test]
async fn test_upload_target_must_be_a_directory() {
    let (share, _temp) = common::setup_share(false).await;

    assert!(matches!(
        share.add("notes.txt", "x.txt", &b"x"[..]).await,
        Err(TreeError::BadRequest(_))
    ));
    assert!(matches!(
        share.add("missing", "x.txt", &b"x"[..]).await,
        Err(TreeError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_mkdir_and_conflict() {
    let (share, temp) = common::setup_share(false).await;

    let created = share.mkdir("", "photos").await.unwrap();
    assert!(created.is_dir());
    assert!(temp.path().join("photos").is_dir());

    assert!(matches!(
        share.mkdir("", "photos").await,
        Err(TreeError::Conflict(_))
    ));
    assert!(matches!(
        share.mkdir("", "a/b").await,
        Err(TreeError::BadRequest(_))
    ));
}

#[tokio::test]
async fn test_delete_disabled_is_forbidden() {
    let (share, temp) = common::setup_share(false).await;

    assert!(matches!(
        share.rm("notes.txt", false).await,
        Err(TreeError::Forbidden(_))
    ));
    assert!(temp.path().join("notes.txt").exists());
}

#[tokio::test]
async fn test_delete_file_evicts_the_node() {
    let (share, temp) = common::setup_share(true).await;

    let listing = share.ls("").await.unwrap();
    let id = entry_named(&listing, "notes.txt").node.id;

    share.rm_node(&id, false).await.unwrap();
    assert!(!temp.path().join("notes.txt").exists());
    assert!(share.registry().resolve(&id).await.is_none());
    assert!(matches!(
        share.stat(&id).await,
        Err(TreeError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_directory_checks_emptiness() {
    let (share, temp) = common::setup_share(true).await;
    share.mkdir("", "empty").await.unwrap();

    // Empty directory goes without `recursive`.
    share.rm("empty", false).await.unwrap();
    assert!(!temp.path().join("empty").exists());

    // Non-empty requires it.
    assert!(matches!(
        share.rm("docs", false).await,
        Err(TreeError::DirectoryNotEmpty(_))
    ));
    assert!(temp.path().join("docs").exists());

    share.rm("docs", true).await.unwrap();
    assert!(!temp.path().join("docs").exists());
}

#[tokio::test]
async fn test_delete_root_is_refused() {
    let (share, temp) = common::setup_share(true).await;

    assert!(matches!(
        share.rm("", true).await,
        Err(TreeError::BadRequest(_))
    ));
    assert!(temp.path().exists());
}

#[tokio::test]
async fn test_rename_keeps_the_id() {
    let (share, temp) = common::setup_share(false).await;

    let listing = share.ls("").await.unwrap();
    let id = entry_named(&listing, "notes.txt").node.id;

    let renamed = share.mv(&id, "renamed.txt").await.unwrap();
    assert_eq!(renamed.id, id);
    assert_eq!(renamed.name, "renamed.txt");

    assert!(!temp.path().join("notes.txt").exists());
    assert_eq!(
        std::fs::read(temp.path().join("renamed.txt")).unwrap(),
        b"ten bytes!"
    );

    let fresh = share.stat(&id).await.unwrap();
    assert_eq!(fresh.node.name, "renamed.txt");
}

#[tokio::test]
async fn test_rename_conflict_and_noop() {
    let (share, _temp) = common::setup_share(false).await;

    let listing = share.ls("").await.unwrap();
    let id = entry_named(&listing, "notes.txt").node.id;

    assert!(matches!(
        share.mv(&id, "docs").await,
        Err(TreeError::Conflict(_))
    ));
    assert!(matches!(
        share.mv(&id, "bad/name").await,
        Err(TreeError::BadRequest(_))
    ));

    // Renaming to the current name is a no-op, not a conflict.
    let same = share.mv(&id, "notes.txt").await.unwrap();
    assert_eq!(same.id, id);
}

#[tokio::test]
async fn test_open_streams_file_content() {
    let (share, _temp) = common::setup_share(false).await;

    let listing = share.ls("docs").await.unwrap();
    let id = entry_named(&listing, "guide.md").node.id;

    let mut content = share.open(&id).await.unwrap();
    assert_eq!(content.len, 8);
    assert_eq!(content.mime_type, "text/markdown");
    assert_eq!(content.name, "guide.md");

    let mut bytes = Vec::new();
    content.file.read_to_end(&mut bytes).await.unwrap();
    assert_eq!(bytes, b"# guide\n");
}

#[tokio::test]
async fn test_open_rejects_directories() {
    let (share, _temp) = common::setup_share(false).await;

    let listing = share.ls("").await.unwrap();
    let id = entry_named(&listing, "docs").node.id;

    assert!(matches!(
        share.open(&id).await,
        Err(TreeError::BadRequest(_))
    ));
}

#[tokio::test]
async fn test_stale_id_reads_as_gone() {
    let (share, temp) = common::setup_share(true).await;

    let listing = share.ls("").await.unwrap();
    let id = entry_named(&listing, "notes.txt").node.id;

    // Deleted behind the share's back, not through the API.
    std::fs::remove_file(temp.path().join("notes.txt")).unwrap();

    assert!(matches!(
        share.node(&id).await,
        Err(TreeError::NotFound(_))
    ));
    assert!(share.registry().resolve(&id).await.is_none());
}

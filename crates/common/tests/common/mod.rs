//! Shared setup for share integration tests.

use tempfile::TempDir;

use ::common::Share;

/// Make the share's `tracing::warn!` skip paths visible under
/// `--nocapture`. Repeat calls after the first are rejected and ignored.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Build a share over a small fixture tree:
///
/// ```text
/// root/
///   docs/
///     guide.md      "# guide\n"   (8 bytes)
///   notes.txt       "ten bytes!"  (10 bytes)
/// ```
pub async fn setup_share(allow_delete: bool) -> (Share, TempDir) {
    init_tracing();

    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("docs")).unwrap();
    std::fs::write(temp.path().join("docs/guide.md"), b"# guide\n").unwrap();
    std::fs::write(temp.path().join("notes.txt"), b"ten bytes!").unwrap();

    let share = Share::new(temp.path(), allow_delete).await.unwrap();
    (share, temp)
}

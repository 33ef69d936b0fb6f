use std::path::PathBuf;

pub fn folder_to_use() -> PathBuf {
    tempfile::Builder::new()
        .prefix("targets_watch_test_")
        .tempdir()
        .expect("failed to create temp dir")
        .into_path()
}

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::error::StoreError;
use crate::core::snapshot::Snapshot;

/// Writes the snapshot's bytes to `path` through a temp file and rename.
///
/// Returns `false` without touching the file when it already holds the same
/// bytes.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<bool, StoreError> {
    let bytes = snapshot.bytes()?;
    match fs::read(path) {
        Ok(existing) if snapshot.equals_bytes(&existing) => {
            debug!(path = %path.display(), "checkpoint up to date");
            return Ok(false);
        }
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = tmp_path_for(path);
    let written = write_tmp(&tmp_path, &bytes).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    debug!(
        path = %path.display(),
        bytes = bytes.len(),
        digest = snapshot.digest(),
        "checkpoint written"
    );
    Ok(true)
}

/// `<path>.tmp`, appended so it never collides with `path` itself.
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

fn write_tmp(tmp_path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp_file = File::create(tmp_path)?;
    tmp_file.write_all(bytes)?;
    tmp_file.sync_all()
}

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, info};

use crate::core::error::StoreError;
use crate::core::read::ReadTargets;
use crate::core::snapshot::Snapshot;

/// Read-only routing table backed by a file the control plane writes.
///
/// Broker-side processes hold one of these and call [`FileTargets::reload`]
/// when they suspect the file changed. Unchanged contents are detected by
/// comparing bytes and never re-parsed.
pub struct FileTargets {
    path: PathBuf,
    current: ArcSwap<Snapshot>,
}

impl FileTargets {
    /// Loads the table at `path`. A missing file is an empty table, so a
    /// process can start before the first table is written.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let snapshot = match fs::read(&path) {
            Ok(raw) => Snapshot::from_bytes(&raw)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "targets file missing, starting empty");
                Snapshot::empty()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(FileTargets {
            path,
            current: ArcSwap::from_pointee(snapshot),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the file and publishes it if its bytes differ from the current
    /// snapshot. Returns `true` if a new snapshot was published.
    ///
    /// On any error, including a file that has disappeared since `load`, the
    /// current snapshot stays in place.
    pub fn reload(&self) -> Result<bool, StoreError> {
        let raw = fs::read(&self.path)?;
        if self.current.load().equals_bytes(&raw) {
            return Ok(false);
        }
        let next = Snapshot::from_bytes(&raw)?;
        info!(
            path = %self.path.display(),
            brokers = next.broker_count(),
            targets = next.target_count(),
            digest = next.digest(),
            "targets reloaded"
        );
        self.current.store(Arc::new(next));
        Ok(true)
    }
}

impl ReadTargets for FileTargets {
    fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }
}

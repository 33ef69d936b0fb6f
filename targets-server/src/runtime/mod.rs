/*
Background work for a process that consumes a published routing table.

Right now that is a single loop re-reading the targets file; it owns no state
beyond the shared `FileTargets` handle and stops on the shutdown signal.
*/
use std::sync::Arc;
use std::time::Duration;

use broker_targets::FileTargets;
use tokio::sync::watch::Receiver;
use tokio::task::JoinHandle;

mod reload;

pub use reload::run_periodic_reload;

pub fn run(
    targets: Arc<FileTargets>,
    shutdown_rx: Receiver<()>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(run_periodic_reload(targets, shutdown_rx, interval))
}

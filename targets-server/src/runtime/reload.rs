use std::sync::Arc;
use std::time::Duration;

use broker_targets::FileTargets;
use tokio::sync::watch::Receiver;
use tokio::time::MissedTickBehavior;

pub async fn run_periodic_reload(
    targets: Arc<FileTargets>,
    mut shutdown_rx: Receiver<()>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match targets.reload() {
                    Ok(true) => tracing::debug!("Targets reload picked up a new table."),
                    Ok(false) => tracing::trace!("Targets unchanged."),
                    Err(e) => tracing::warn!("Targets reload failed, keeping current table: {}", e),
                }
            }

            _ = shutdown_rx.changed() => {
                tracing::info!("Shutdown signal received. Stopping targets reload.");
                break;
            }
        }
    }
}

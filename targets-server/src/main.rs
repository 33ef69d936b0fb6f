use std::ops::ControlFlow;
use std::sync::Arc;

use anyhow::{Context, Result};
use broker_targets::{FileTargets, ReadTargets};
use clap::Parser;
use targets_server::{runtime, Params, WatchConfig};
use tokio::sync::watch;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let params = Params::parse();
    let mut config = WatchConfig::load_or_default(params.config.as_ref())?;
    if let Some(path) = params.targets_path {
        config.targets_path = path;
    }

    tracing_subscriber::fmt()
        .with_max_level(config.level()?)
        .with_target(false)
        .with_thread_ids(true)
        .compact()
        .init();

    info!("targets-watch starting with config: {:?}", config);

    let targets = FileTargets::load(&config.targets_path)
        .with_context(|| format!("loading targets from {:?}", config.targets_path))?;
    let targets = Arc::new(targets);
    log_summary(&targets);

    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let reload = runtime::run(Arc::clone(&targets), shutdown_rx, config.reload_interval());

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    let _ = shutdown_tx.send(());
    reload.await.context("reload task failed")?;

    log_summary(&targets);
    Ok(())
}

fn log_summary(targets: &FileTargets) {
    let snapshot = targets.snapshot();
    info!(
        brokers = snapshot.broker_count(),
        targets = snapshot.target_count(),
        digest = snapshot.digest(),
        "routing table"
    );
    snapshot.range_brokers(|broker| {
        info!(
            broker = %broker.key(),
            state = ?broker.state,
            targets = broker.targets.len(),
            "broker"
        );
        ControlFlow::Continue(())
    });
}

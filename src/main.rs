use anyhow::{Context, Result};
use clap::Parser;
use ifwatch::*;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let app_config = cli.load_config()?;
    logging::init(&app_config.logging)?;
    tracing::info!(version = %version::banner(), agent = %cli.agent, "starting");

    let session = snmp::UdpSession::connect(&snmp::SessionConfig {
        agent: cli.agent.clone(),
        port: app_config.agent.port,
        community: app_config.agent.community.clone(),
        timeout: Duration::from_millis(app_config.agent.timeout_ms),
        retries: app_config.agent.retries,
    })
    .await
    .with_context(|| format!("opening SNMP session to {}", cli.agent))?;

    let info = resolver::Resolver::new(&session)
        .with_walk_page_size(app_config.monitoring.walk_page_size)
        .resolve(&cli.interface)
        .await?;
    tracing::info!(
        index = info.identity.index,
        name = %info.identity.name,
        speed_mbps = info.identity.speed_mbps,
        sys_name = %info.sys_name,
        "interface resolved"
    );

    let capacity = app_config.monitoring.history_capacity;
    let monitor = monitor::Monitor::new(
        info.identity.clone(),
        app_config.monitoring.interval_secs,
        capacity,
    )?;

    let (state_tx, state_rx) = watch::channel(worker::DashboardState::default());
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            transport: Arc::new(session),
            monitor,
            state_tx,
            shutdown_rx,
        },
        worker::WorkerConfig {
            stop_on_error: app_config.monitoring.stop_on_error,
        },
    );

    let view = dashboard::DashboardView::new(info, capacity);
    let ui_result = tokio::task::spawn_blocking(move || view.run(state_rx, shutdown_tx))
        .await
        .context("dashboard task")?;

    let worker_result = worker_handle.await.context("worker task")?;
    ui_result?;
    worker_result?;
    tracing::info!("stopped");
    Ok(())
}

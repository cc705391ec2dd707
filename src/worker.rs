// Background sampling worker: one monitor tick per interval, published to the dashboard via watch.
// Ticks never overlap; a slow agent pushes the next tick back rather than stacking requests.

use crate::models::CounterDelta;
use crate::monitor::{Monitor, TickOutcome};
use crate::snmp::SnmpTransport;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::Instrument;

/// What the dashboard draws after each tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    /// Ticks attempted, successful or not.
    pub ticks: u64,
    /// None until the second successful sample.
    pub delta: Option<CounterDelta>,
    pub rx_history: Vec<f64>,
    pub tx_history: Vec<f64>,
    /// Error from the most recent tick, cleared by the next success.
    pub last_error: Option<String>,
}

pub struct WorkerDeps<T> {
    pub transport: Arc<T>,
    pub monitor: Monitor,
    pub state_tx: watch::Sender<DashboardState>,
    pub shutdown_rx: oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    /// Return the first sampling error instead of skipping the tick.
    pub stop_on_error: bool,
}

/// Runs until shutdown (or until the shutdown sender is dropped). Configuration errors,
/// and sampling errors when `stop_on_error` is set, end the task with that error.
pub fn spawn<T>(
    deps: WorkerDeps<T>,
    config: WorkerConfig,
) -> tokio::task::JoinHandle<anyhow::Result<()>>
where
    T: SnmpTransport + Send + Sync + 'static,
{
    let WorkerDeps {
        transport,
        mut monitor,
        state_tx,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig { stop_on_error } = config;

    let interval_secs = monitor.interval_secs();
    let if_index = monitor.identity().index;
    let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", if_index, interval_secs);

    let task = async move {
        let mut tick = interval(Duration::from_secs(interval_secs));
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    match monitor.tick(transport.as_ref()).await {
                        Ok(outcome) => {
                            if let TickOutcome::Sampled { utilization, .. } = &outcome {
                                tracing::debug!(
                                    rx_percent = utilization.rx_percent,
                                    tx_percent = utilization.tx_percent,
                                    "sampled"
                                );
                            } else {
                                tracing::debug!("baseline sample taken");
                            }
                            let history = monitor.history();
                            state_tx.send_modify(|state| {
                                state.ticks += 1;
                                state.last_error = None;
                                if let TickOutcome::Sampled { delta, .. } = outcome {
                                    state.delta = Some(delta);
                                    state.rx_history = history.rx_series();
                                    state.tx_history = history.tx_series();
                                }
                            });
                        }
                        Err(e) if e.is_config() || stop_on_error => {
                            tracing::error!(error = %e, operation = "tick", "stopping worker");
                            state_tx.send_modify(|state| {
                                state.ticks += 1;
                                state.last_error = Some(e.to_string());
                            });
                            return Err(anyhow::Error::from(e));
                        }
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                operation = "tick",
                                "sample failed; tick skipped"
                            );
                            state_tx.send_modify(|state| {
                                state.ticks += 1;
                                state.last_error = Some(e.to_string());
                            });
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
            }
        }
        Ok(())
    };
    tokio::spawn(task.instrument(worker_span))
}

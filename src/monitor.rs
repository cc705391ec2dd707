// Per-tick pipeline: sample -> delta -> utilization -> history, committed only on full success.

use crate::history::HistoryBuffer;
use crate::models::{CounterDelta, CounterSample, InterfaceIdentity, UtilizationSample};
use crate::sampler::{CounterSampler, SampleError};
use crate::snmp::SnmpTransport;
use crate::utilization::{self, UtilizationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("sampling failed: {0}")]
    Sample(#[from] SampleError),

    #[error("invalid configuration: {0}")]
    Config(#[from] UtilizationError),
}

impl MonitorError {
    /// Configuration errors never clear up on their own.
    pub fn is_config(&self) -> bool {
        matches!(self, MonitorError::Config(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// First successful read; there is nothing to diff against yet.
    Baseline(CounterSample),
    Sampled {
        sample: CounterSample,
        delta: CounterDelta,
        utilization: UtilizationSample,
    },
}

pub struct Monitor {
    sampler: CounterSampler,
    interval_secs: u64,
    history: HistoryBuffer<UtilizationSample>,
}

impl Monitor {
    /// Fails fast on a zero link speed or zero interval.
    pub fn new(
        identity: InterfaceIdentity,
        interval_secs: u64,
        history_capacity: usize,
    ) -> Result<Self, UtilizationError> {
        utilization::validate(interval_secs, identity.speed_mbps)?;
        Ok(Self {
            sampler: CounterSampler::new(identity),
            interval_secs,
            history: HistoryBuffer::new(history_capacity),
        })
    }

    pub fn identity(&self) -> &InterfaceIdentity {
        self.sampler.identity()
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn history(&self) -> &HistoryBuffer<UtilizationSample> {
        &self.history
    }

    pub fn previous(&self) -> Option<&CounterSample> {
        self.sampler.previous()
    }

    pub async fn tick<T: SnmpTransport + ?Sized>(
        &mut self,
        transport: &T,
    ) -> Result<TickOutcome, MonitorError> {
        let (sample, delta) = self.sampler.observe(transport).await?;
        let Some(delta) = delta else {
            self.sampler.commit(sample);
            return Ok(TickOutcome::Baseline(sample));
        };

        let utilization = utilization::utilization(
            &delta,
            self.interval_secs,
            self.sampler.identity().speed_mbps,
        )?;

        self.history.append(utilization);
        self.sampler.commit(sample);
        Ok(TickOutcome::Sampled {
            sample,
            delta,
            utilization,
        })
    }
}

// Octet deltas -> percent of link capacity

use crate::models::{CounterDelta, UtilizationSample};
use thiserror::Error;

const BITS_PER_OCTET: u128 = 8;
const BITS_PER_MEGABIT: u128 = 1_000_000;

/// Zero speed or zero interval: a configuration problem, not a transient one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UtilizationError {
    #[error("interface link speed is 0 Mbps; utilization is undefined")]
    ZeroSpeed,
    #[error("sampling interval must be at least 1 second")]
    ZeroInterval,
    #[error("link speed times interval is too large to represent")]
    CapacityOverflow,
}

/// Rejects the inputs for which utilization has no finite, exact denominator.
pub fn validate(interval_secs: u64, speed_mbps: u64) -> Result<(), UtilizationError> {
    capacity_bits(interval_secs, speed_mbps).map(|_| ())
}

/// Bits the link can carry over the interval.
fn capacity_bits(interval_secs: u64, speed_mbps: u64) -> Result<u128, UtilizationError> {
    if speed_mbps == 0 {
        return Err(UtilizationError::ZeroSpeed);
    }
    if interval_secs == 0 {
        return Err(UtilizationError::ZeroInterval);
    }
    u128::from(speed_mbps)
        .checked_mul(u128::from(interval_secs))
        .and_then(|v| v.checked_mul(BITS_PER_MEGABIT))
        .ok_or(UtilizationError::CapacityOverflow)
}

/// `octets * 8 * 100 / (speed_mbps * interval_secs * 1_000_000)`.
/// Products are formed in u128 so only the final division rounds.
pub fn percent_of_capacity(
    octets: u64,
    interval_secs: u64,
    speed_mbps: u64,
) -> Result<f64, UtilizationError> {
    let capacity = capacity_bits(interval_secs, speed_mbps)?;
    // u64 * 800 always fits in u128
    let bits_x100 = u128::from(octets) * BITS_PER_OCTET * 100;
    Ok(bits_x100 as f64 / capacity as f64)
}

/// Rx/Tx utilization for one interval. `interval_secs` is the nominal polling period.
pub fn utilization(
    delta: &CounterDelta,
    interval_secs: u64,
    speed_mbps: u64,
) -> Result<UtilizationSample, UtilizationError> {
    Ok(UtilizationSample {
        rx_percent: percent_of_capacity(delta.in_octets, interval_secs, speed_mbps)?,
        tx_percent: percent_of_capacity(delta.out_octets, interval_secs, speed_mbps)?,
    })
}

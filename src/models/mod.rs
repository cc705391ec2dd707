// Domain models

mod counters;
mod interface;
mod utilization;

pub use counters::{CounterDelta, CounterSample, counter_delta};
pub use interface::{InterfaceIdentity, InterfaceInfo};
pub use utilization::UtilizationSample;

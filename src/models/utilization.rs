// Rx/Tx utilization of link capacity

/// Percent of link capacity used during one interval. Not clamped: values above 100
/// are passed through for the consumer to handle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UtilizationSample {
    pub rx_percent: f64,
    pub tx_percent: f64,
}

// Raw interface counters and per-interval deltas

/// Modulus of the 64-bit counters. A reading lower than the previous one means the counter wrapped.
const COUNTER_MODULUS: i128 = 1 << 64;

/// One reading of the six polled counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSample {
    pub in_octets: u64,
    pub in_discards: u64,
    pub in_errors: u64,
    pub out_octets: u64,
    pub out_discards: u64,
    pub out_errors: u64,
}

/// Increase of each counter between two consecutive samples. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterDelta {
    pub in_octets: u64,
    pub in_discards: u64,
    pub in_errors: u64,
    pub out_octets: u64,
    pub out_discards: u64,
    pub out_errors: u64,
}

impl CounterSample {
    /// Per-counter increase since `previous`, wrap-corrected.
    pub fn delta_since(&self, previous: &CounterSample) -> CounterDelta {
        CounterDelta {
            in_octets: counter_delta(self.in_octets, previous.in_octets),
            in_discards: counter_delta(self.in_discards, previous.in_discards),
            in_errors: counter_delta(self.in_errors, previous.in_errors),
            out_octets: counter_delta(self.out_octets, previous.out_octets),
            out_discards: counter_delta(self.out_discards, previous.out_discards),
            out_errors: counter_delta(self.out_errors, previous.out_errors),
        }
    }
}

/// `current - previous`, plus 2^64 when the counter wrapped in between.
pub fn counter_delta(current: u64, previous: u64) -> u64 {
    let diff = i128::from(current) - i128::from(previous);
    let corrected = if diff < 0 {
        diff + COUNTER_MODULUS
    } else {
        diff
    };
    // corrected is in [0, 2^64)
    corrected as u64
}

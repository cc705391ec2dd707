// Counter sampling: one batched GetRequest per tick for the six interface counters.

use crate::mib;
use crate::models::{CounterDelta, CounterSample, InterfaceIdentity};
use crate::snmp::{Oid, SnmpError, SnmpTransport};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error(transparent)]
    Snmp(#[from] SnmpError),

    /// Varbind absent, an exception value, or not an unsigned number.
    #[error("counter {oid} missing or not numeric")]
    MissingCounter { oid: Oid },
}

/// Counter OIDs for one ifIndex, in `CounterSample` field order.
pub fn counter_oids(if_index: u32) -> [Oid; 6] {
    [
        mib::indexed(mib::IF_HC_IN_OCTETS, if_index),
        mib::indexed(mib::IF_IN_DISCARDS, if_index),
        mib::indexed(mib::IF_IN_ERRORS, if_index),
        mib::indexed(mib::IF_HC_OUT_OCTETS, if_index),
        mib::indexed(mib::IF_OUT_DISCARDS, if_index),
        mib::indexed(mib::IF_OUT_ERRORS, if_index),
    ]
}

/// Fetches one sample and, when `previous` is present, the delta against it.
/// A `None` delta marks the baseline tick and is not a zero rate.
pub async fn sample<T: SnmpTransport + ?Sized>(
    transport: &T,
    identity: &InterfaceIdentity,
    previous: Option<&CounterSample>,
) -> Result<(CounterSample, Option<CounterDelta>), SampleError> {
    let oids = counter_oids(identity.index);
    let response = transport.get(&oids).await?;
    response.check()?;

    let read = |oid: &Oid| {
        response
            .value_of(oid)
            .and_then(|v| v.as_counter())
            .ok_or_else(|| SampleError::MissingCounter { oid: oid.clone() })
    };
    let [in_octets, in_discards, in_errors, out_octets, out_discards, out_errors] = &oids;
    let current = CounterSample {
        in_octets: read(in_octets)?,
        in_discards: read(in_discards)?,
        in_errors: read(in_errors)?,
        out_octets: read(out_octets)?,
        out_discards: read(out_discards)?,
        out_errors: read(out_errors)?,
    };

    let delta = previous.map(|prev| current.delta_since(prev));
    Ok((current, delta))
}

/// Owns the previous-sample slot for one interface. The slot only moves forward via
/// `commit`, so a failed tick leaves the baseline where it was.
#[derive(Debug, Clone)]
pub struct CounterSampler {
    identity: InterfaceIdentity,
    previous: Option<CounterSample>,
}

impl CounterSampler {
    pub fn new(identity: InterfaceIdentity) -> Self {
        Self {
            identity,
            previous: None,
        }
    }

    pub fn identity(&self) -> &InterfaceIdentity {
        &self.identity
    }

    pub fn previous(&self) -> Option<&CounterSample> {
        self.previous.as_ref()
    }

    /// Reads the counters without touching the stored baseline.
    pub async fn observe<T: SnmpTransport + ?Sized>(
        &self,
        transport: &T,
    ) -> Result<(CounterSample, Option<CounterDelta>), SampleError> {
        sample(transport, &self.identity, self.previous.as_ref()).await
    }

    pub fn commit(&mut self, current: CounterSample) {
        self.previous = Some(current);
    }
}

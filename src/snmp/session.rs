// Agent session: snmp2's async v2c client behind SnmpTransport, with a per-attempt timeout and retransmit.

use super::{ErrorStatus, Oid, Response, SnmpError, SnmpTransport, Value, VarBind};
use bytes::Bytes;
use snmp2::AsyncSession;
use std::fmt::Debug;
use tokio::sync::Mutex;
use tokio::time::{Duration, timeout};
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub agent: String,
    pub port: u16,
    pub community: String,
    /// Per-attempt wait for a response.
    pub timeout: Duration,
    /// Retransmissions after the first attempt.
    pub retries: u32,
}

pub struct UdpSession {
    client: Mutex<AsyncSession>,
    timeout: Duration,
    retries: u32,
}

impl UdpSession {
    pub async fn connect(config: &SessionConfig) -> Result<Self, SnmpError> {
        // Seed request ids so a restarted process does not match stale replies.
        let seed = (chrono::Utc::now().timestamp_subsec_nanos() & 0x7fff_ffff) as i32;
        let client = AsyncSession::new_v2c(
            (config.agent.as_str(), config.port),
            config.community.as_bytes(),
            seed,
        )
        .await
        .map_err(client_error)?;
        tracing::debug!(agent = %config.agent, port = config.port, "SNMP session opened");
        Ok(Self {
            client: Mutex::new(client),
            timeout: config.timeout,
            retries: config.retries,
        })
    }

    /// One GetRequest for a single OID.
    #[instrument(skip(self, oid), fields(%oid))]
    async fn get_one(&self, oid: &Oid) -> Result<Response, SnmpError> {
        let name = to_wire(oid)?;
        let mut client = self.client.lock().await;
        for attempt in 0..=self.retries {
            match timeout(self.timeout, client.get(&name)).await {
                Ok(reply) => return reply.map_err(client_error).and_then(from_pdu),
                Err(_) => tracing::debug!(attempt, "no response before timeout"),
            }
        }
        Err(SnmpError::Timeout {
            attempts: self.retries + 1,
        })
    }
}

impl SnmpTransport for UdpSession {
    /// Issues one GetRequest per OID and merges the replies in request order. A non-zero
    /// error-status stops the sequence; its index is rebased onto `oids`.
    async fn get(&self, oids: &[Oid]) -> Result<Response, SnmpError> {
        let mut merged = Response::with_varbinds(Vec::with_capacity(oids.len()));
        for (position, oid) in oids.iter().enumerate() {
            let mut reply = self.get_one(oid).await?;
            if reply.error_status != ErrorStatus::NoError {
                if reply.error_index > 0 {
                    reply.error_index = position as u32 + 1;
                }
                return Ok(reply);
            }
            merged.request_id = reply.request_id;
            merged.varbinds.append(&mut reply.varbinds);
        }
        Ok(merged)
    }

    #[instrument(skip(self, oids), fields(oids = oids.len()))]
    async fn get_bulk(
        &self,
        oids: &[Oid],
        non_repeaters: u32,
        max_repetitions: u32,
    ) -> Result<Response, SnmpError> {
        let names = oids.iter().map(to_wire).collect::<Result<Vec<_>, _>>()?;
        let refs: Vec<&snmp2::Oid<'static>> = names.iter().collect();
        let mut client = self.client.lock().await;
        for attempt in 0..=self.retries {
            match timeout(
                self.timeout,
                client.getbulk(&refs, non_repeaters, max_repetitions),
            )
            .await
            {
                Ok(reply) => return reply.map_err(client_error).and_then(from_pdu),
                Err(_) => tracing::debug!(attempt, "no response before timeout"),
            }
        }
        Err(SnmpError::Timeout {
            attempts: self.retries + 1,
        })
    }
}

fn client_error(e: impl Debug) -> SnmpError {
    SnmpError::Client(format!("{e:?}"))
}

fn to_wire(oid: &Oid) -> Result<snmp2::Oid<'static>, SnmpError> {
    let arcs: Vec<u64> = oid.arcs().iter().map(|&a| u64::from(a)).collect();
    snmp2::Oid::from(&arcs[..]).map_err(|e| SnmpError::InvalidOid(format!("{oid}: {e:?}")))
}

fn from_wire(oid: &snmp2::Oid<'_>) -> Result<Oid, SnmpError> {
    oid.to_id_string().parse()
}

fn from_wire_value(value: snmp2::Value<'_>) -> Result<Value, SnmpError> {
    use snmp2::Value as Wire;
    Ok(match value {
        Wire::Integer(v) => Value::Integer(v),
        Wire::OctetString(b) => Value::OctetString(Bytes::copy_from_slice(b)),
        Wire::Null => Value::Null,
        Wire::ObjectIdentifier(oid) => Value::ObjectIdentifier(from_wire(&oid)?),
        Wire::IpAddress(addr) => Value::IpAddress(addr),
        Wire::Counter32(v) => Value::Counter32(v),
        Wire::Unsigned32(v) => Value::Gauge32(v),
        Wire::Timeticks(v) => Value::TimeTicks(v),
        Wire::Opaque(b) => Value::Opaque(Bytes::copy_from_slice(b)),
        Wire::Counter64(v) => Value::Counter64(v),
        Wire::NoSuchObject => Value::NoSuchObject,
        Wire::NoSuchInstance => Value::NoSuchInstance,
        Wire::EndOfMibView => Value::EndOfMibView,
        _ => return Err(SnmpError::Decode("unsupported varbind type".into())),
    })
}

fn from_pdu(pdu: snmp2::Pdu<'_>) -> Result<Response, SnmpError> {
    let error_status = ErrorStatus::from_code(i64::try_from(pdu.error_status).unwrap_or(-1));
    let error_index = u32::try_from(pdu.error_index).unwrap_or_default();
    let request_id = i32::try_from(pdu.req_id).unwrap_or_default();
    let varbinds = pdu
        .varbinds
        .map(|(oid, value)| Ok(VarBind::new(from_wire(&oid)?, from_wire_value(value)?)))
        .collect::<Result<Vec<_>, SnmpError>>()?;
    Ok(Response {
        request_id,
        error_status,
        error_index,
        varbinds,
    })
}

// SNMPv2c client: object identifiers, varbind values, and the transport seam the core polls through.

mod session;
mod walk;

pub use session::{SessionConfig, UdpSession};
pub use walk::bulk_walk;

use bytes::Bytes;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnmpError {
    /// Socket, encoding or correlation failure reported by the SNMP client.
    #[error("SNMP client error: {0}")]
    Client(String),

    #[error("no response from agent after {attempts} attempt(s)")]
    Timeout { attempts: u32 },

    /// Agent answered with a non-zero error-status.
    #[error("Failed - {status}({index})")]
    Status { status: ErrorStatus, index: u32 },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("invalid OID: {0}")]
    InvalidOid(String),
}

/// Object identifier as a sequence of arcs. Ordering is lexicographic, which is MIB order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Oid(Vec<u32>);

impl Oid {
    pub fn new(arcs: impl Into<Vec<u32>>) -> Self {
        Self(arcs.into())
    }

    pub fn arcs(&self) -> &[u32] {
        &self.0
    }

    /// This OID with one more arc appended (e.g. a table column plus a row index).
    pub fn child(&self, sub: u32) -> Oid {
        let mut arcs = Vec::with_capacity(self.0.len() + 1);
        arcs.extend_from_slice(&self.0);
        arcs.push(sub);
        Oid(arcs)
    }

    /// True when `self` lies strictly below `base` in the tree.
    pub fn is_descendant_of(&self, base: &Oid) -> bool {
        self.0.len() > base.0.len() && self.0.starts_with(&base.0)
    }

    /// Arcs following `base`, if `self` is a descendant of it.
    pub fn suffix_after(&self, base: &Oid) -> Option<&[u32]> {
        self.is_descendant_of(base).then(|| &self.0[base.0.len()..])
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Oid(arcs.to_vec())
    }
}

impl FromStr for Oid {
    type Err = SnmpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix('.').unwrap_or(s);
        let arcs = trimmed
            .split('.')
            .map(|arc| arc.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| SnmpError::InvalidOid(s.to_string()))?;
        if arcs.len() < 2 || arcs[0] > 2 || (arcs[0] < 2 && arcs[1] >= 40) {
            return Err(SnmpError::InvalidOid(s.to_string()));
        }
        Ok(Oid(arcs))
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{arc}")?;
            first = false;
        }
        Ok(())
    }
}

/// Varbind value, including the SNMPv2 exception markers.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    OctetString(Bytes),
    Null,
    ObjectIdentifier(Oid),
    IpAddress([u8; 4]),
    Counter32(u32),
    Gauge32(u32),
    TimeTicks(u32),
    Opaque(Bytes),
    Counter64(u64),
    NoSuchObject,
    NoSuchInstance,
    EndOfMibView,
}

impl Value {
    /// Unsigned reading of numeric values, widened losslessly to u64.
    pub fn as_counter(&self) -> Option<u64> {
        match *self {
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => Some(u64::from(v)),
            Value::Counter64(v) => Some(v),
            Value::Integer(v) => u64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView
        )
    }

    /// Display text; octet strings are decoded lossily as UTF-8.
    pub fn to_text(&self) -> String {
        match self {
            Value::OctetString(b) | Value::Opaque(b) => String::from_utf8_lossy(b).into_owned(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::OctetString(b) | Value::Opaque(b) => f.write_str(&String::from_utf8_lossy(b)),
            Value::Null => f.write_str("NULL"),
            Value::ObjectIdentifier(oid) => write!(f, "{oid}"),
            Value::IpAddress([a, b, c, d]) => write!(f, "{a}.{b}.{c}.{d}"),
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => write!(f, "{v}"),
            Value::Counter64(v) => write!(f, "{v}"),
            Value::NoSuchObject => f.write_str("noSuchObject"),
            Value::NoSuchInstance => f.write_str("noSuchInstance"),
            Value::EndOfMibView => f.write_str("endOfMibView"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarBind {
    pub oid: Oid,
    pub value: Value,
}

impl VarBind {
    pub fn new(oid: Oid, value: Value) -> Self {
        Self { oid, value }
    }
}

/// PDU error-status codes (RFC 3416).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    WrongType,
    WrongLength,
    WrongEncoding,
    WrongValue,
    NoCreation,
    InconsistentValue,
    ResourceUnavailable,
    CommitFailed,
    UndoFailed,
    AuthorizationError,
    NotWritable,
    InconsistentName,
    Unknown(i64),
}

impl ErrorStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => ErrorStatus::NoError,
            1 => ErrorStatus::TooBig,
            2 => ErrorStatus::NoSuchName,
            3 => ErrorStatus::BadValue,
            4 => ErrorStatus::ReadOnly,
            5 => ErrorStatus::GenErr,
            6 => ErrorStatus::NoAccess,
            7 => ErrorStatus::WrongType,
            8 => ErrorStatus::WrongLength,
            9 => ErrorStatus::WrongEncoding,
            10 => ErrorStatus::WrongValue,
            11 => ErrorStatus::NoCreation,
            12 => ErrorStatus::InconsistentValue,
            13 => ErrorStatus::ResourceUnavailable,
            14 => ErrorStatus::CommitFailed,
            15 => ErrorStatus::UndoFailed,
            16 => ErrorStatus::AuthorizationError,
            17 => ErrorStatus::NotWritable,
            18 => ErrorStatus::InconsistentName,
            other => ErrorStatus::Unknown(other),
        }
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorStatus::NoError => "NoError",
            ErrorStatus::TooBig => "TooBig",
            ErrorStatus::NoSuchName => "NoSuchName",
            ErrorStatus::BadValue => "BadValue",
            ErrorStatus::ReadOnly => "ReadOnly",
            ErrorStatus::GenErr => "GenError",
            ErrorStatus::NoAccess => "NoAccess",
            ErrorStatus::WrongType => "WrongType",
            ErrorStatus::WrongLength => "WrongLength",
            ErrorStatus::WrongEncoding => "WrongEncoding",
            ErrorStatus::WrongValue => "WrongValue",
            ErrorStatus::NoCreation => "NoCreation",
            ErrorStatus::InconsistentValue => "InconsistentValue",
            ErrorStatus::ResourceUnavailable => "ResourceUnavailable",
            ErrorStatus::CommitFailed => "CommitFailed",
            ErrorStatus::UndoFailed => "UndoFailed",
            ErrorStatus::AuthorizationError => "AuthorizationError",
            ErrorStatus::NotWritable => "NotWritable",
            ErrorStatus::InconsistentName => "InconsistentName",
            ErrorStatus::Unknown(code) => return write!(f, "Unknown({code})"),
        };
        f.write_str(name)
    }
}

/// Decoded Response-PDU.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub request_id: i32,
    pub error_status: ErrorStatus,
    pub error_index: u32,
    pub varbinds: Vec<VarBind>,
}

impl Response {
    /// A successful response carrying `varbinds`.
    pub fn with_varbinds(varbinds: Vec<VarBind>) -> Self {
        Self {
            request_id: 0,
            error_status: ErrorStatus::NoError,
            error_index: 0,
            varbinds,
        }
    }

    /// Err when the agent reported a non-zero error-status.
    pub fn check(&self) -> Result<(), SnmpError> {
        match self.error_status {
            ErrorStatus::NoError => Ok(()),
            status => Err(SnmpError::Status {
                status,
                index: self.error_index,
            }),
        }
    }

    pub fn value_of(&self, oid: &Oid) -> Option<&Value> {
        self.varbinds
            .iter()
            .find(|vb| &vb.oid == oid)
            .map(|vb| &vb.value)
    }
}

/// Request/response exchanges against one agent. Calls are issued sequentially by a single owner.
pub trait SnmpTransport {
    /// Values for every OID in `oids`, in request order.
    fn get(&self, oids: &[Oid]) -> impl Future<Output = Result<Response, SnmpError>> + Send;

    /// One GetBulkRequest.
    fn get_bulk(
        &self,
        oids: &[Oid],
        non_repeaters: u32,
        max_repetitions: u32,
    ) -> impl Future<Output = Result<Response, SnmpError>> + Send;
}

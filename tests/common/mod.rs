// Shared test helpers: scripted SNMP transport and canned interface data

#![allow(dead_code)]

use ifwatch::mib;
use ifwatch::models::{CounterSample, InterfaceIdentity};
use ifwatch::sampler::counter_oids;
use ifwatch::snmp::{ErrorStatus, Oid, Response, SnmpError, SnmpTransport, Value, VarBind};
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Get(Vec<Oid>),
    GetBulk {
        oids: Vec<Oid>,
        non_repeaters: u32,
        max_repetitions: u32,
    },
}

/// Replays queued replies in order and records every request. An empty queue times out.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<Response, SnmpError>>>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_varbinds(&self, varbinds: Vec<(Oid, Value)>) {
        let varbinds = varbinds
            .into_iter()
            .map(|(oid, value)| VarBind::new(oid, value))
            .collect();
        self.push(Ok(Response::with_varbinds(varbinds)));
    }

    pub fn push_status(&self, status: ErrorStatus, index: u32) {
        let mut resp = Response::with_varbinds(vec![]);
        resp.error_status = status;
        resp.error_index = index;
        self.push(Ok(resp));
    }

    pub fn push_timeout(&self) {
        self.push(Err(SnmpError::Timeout { attempts: 1 }));
    }

    pub fn push(&self, reply: Result<Response, SnmpError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn pending(&self) -> usize {
        self.replies.lock().unwrap().len()
    }

    fn next(&self, request: Request) -> Result<Response, SnmpError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(SnmpError::Timeout { attempts: 1 }))
    }
}

impl SnmpTransport for MockTransport {
    async fn get(&self, oids: &[Oid]) -> Result<Response, SnmpError> {
        self.next(Request::Get(oids.to_vec()))
    }

    async fn get_bulk(
        &self,
        oids: &[Oid],
        non_repeaters: u32,
        max_repetitions: u32,
    ) -> Result<Response, SnmpError> {
        self.next(Request::GetBulk {
            oids: oids.to_vec(),
            non_repeaters,
            max_repetitions,
        })
    }
}

pub fn text(s: &str) -> Value {
    Value::OctetString(bytes_of(s))
}

fn bytes_of(s: &str) -> bytes::Bytes {
    bytes::Bytes::copy_from_slice(s.as_bytes())
}

pub fn identity(index: u32, speed_mbps: u64) -> InterfaceIdentity {
    InterfaceIdentity {
        index,
        name: format!("ge-0/0/{index}"),
        alias: String::new(),
        speed_mbps,
    }
}

pub fn sample(in_octets: u64, out_octets: u64) -> CounterSample {
    CounterSample {
        in_octets,
        out_octets,
        ..CounterSample::default()
    }
}

/// Queues a successful counter reply for `index` carrying `s`.
pub fn push_counters(transport: &MockTransport, index: u32, s: CounterSample) {
    let [in_octets, in_discards, in_errors, out_octets, out_discards, out_errors] =
        counter_oids(index);
    transport.push_varbinds(vec![
        (in_octets, Value::Counter64(s.in_octets)),
        (in_discards, Value::Counter32(s.in_discards as u32)),
        (in_errors, Value::Counter32(s.in_errors as u32)),
        (out_octets, Value::Counter64(s.out_octets)),
        (out_discards, Value::Counter32(s.out_discards as u32)),
        (out_errors, Value::Counter32(s.out_errors as u32)),
    ]);
}

/// ifName row for a walk page.
pub fn if_name_row(index: u32, name: &str) -> (Oid, Value) {
    (mib::indexed(mib::IF_NAME, index), text(name))
}

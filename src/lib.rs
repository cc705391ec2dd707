// Library for tests to access modules

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod history;
pub mod logging;
pub mod mib;
pub mod models;
pub mod monitor;
pub mod resolver;
pub mod sampler;
pub mod snmp;
pub mod utilization;
pub mod version;
pub mod worker;

// Command-line arguments; flags override the config file.

use crate::config::AppConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ifwatch", version, about = "Live SNMP interface utilization monitor")]
pub struct Cli {
    /// SNMP agent host name or address
    pub agent: String,

    /// Interface: case-insensitive substring of ifName, or `.N` for ifIndex N
    #[arg(allow_hyphen_values = true)]
    pub interface: String,

    /// Request interval in seconds
    #[arg(short = 't', long = "interval")]
    pub interval: Option<u64>,

    /// SNMP community
    #[arg(short = 'c', long)]
    pub community: Option<String>,

    /// Agent UDP port
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Path to the configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn load_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load_from(path)?,
            None => AppConfig::load()?,
        };
        self.apply(&mut config);
        config.validate()?;
        config.validate_session()?;
        Ok(config)
    }

    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(interval) = self.interval {
            config.monitoring.interval_secs = interval;
        }
        if let Some(community) = &self.community {
            config.agent.community = community.clone();
        }
        if let Some(port) = self.port {
            config.agent.port = port;
        }
    }
}

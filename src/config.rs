use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::resolver::DEFAULT_WALK_PAGE_SIZE;
use serde::Deserialize;
use std::path::Path;

/// Used when neither `--config` nor `CONFIG_FILE` names a file.
pub const DEFAULT_CONFIG_PATH: &str = "ifwatch.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub agent: AgentConfig,
    pub monitoring: MonitoringConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub port: u16,
    pub community: String,
    /// Per-attempt response timeout.
    pub timeout_ms: u64,
    /// Retransmissions after the first attempt.
    pub retries: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            port: 161,
            community: String::new(),
            timeout_ms: 3000,
            retries: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub interval_secs: u64,
    /// Samples kept per utilization chart.
    pub history_capacity: usize,
    /// GetBulk max-repetitions when searching ifName.
    pub walk_page_size: u32,
    /// Abort on the first failed tick instead of skipping it.
    pub stop_on_error: bool,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            interval_secs: 1,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            walk_page_size: DEFAULT_WALK_PAGE_SIZE,
            stop_on_error: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file; the dashboard owns the terminal, so without one logs are discarded.
    pub file: Option<String>,
    /// EnvFilter directive used when RUST_LOG is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            filter: "info".into(),
        }
    }
}

impl AppConfig {
    /// Reads `CONFIG_FILE` if set (must exist), else `ifwatch.toml` if present, else defaults.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::load_from(path),
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load_from(DEFAULT_CONFIG_PATH)
            }
            Err(_) => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {}", path.display(), e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.agent.port > 0,
            "agent.port must be between 1 and 65535, got {}",
            self.agent.port
        );
        anyhow::ensure!(
            self.agent.timeout_ms > 0,
            "agent.timeout_ms must be > 0, got {}",
            self.agent.timeout_ms
        );
        anyhow::ensure!(
            self.monitoring.interval_secs > 0,
            "monitoring.interval_secs must be > 0, got {}",
            self.monitoring.interval_secs
        );
        anyhow::ensure!(
            self.monitoring.history_capacity > 0,
            "monitoring.history_capacity must be > 0, got {}",
            self.monitoring.history_capacity
        );
        anyhow::ensure!(
            self.monitoring.walk_page_size > 0,
            "monitoring.walk_page_size must be > 0, got {}",
            self.monitoring.walk_page_size
        );
        anyhow::ensure!(
            !self.logging.filter.is_empty(),
            "logging.filter must be non-empty"
        );
        Ok(())
    }

    /// Checks that only matter once we are about to talk to an agent.
    pub fn validate_session(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.agent.community.is_empty(),
            "an SNMP community is required (-c or agent.community)"
        );
        Ok(())
    }
}

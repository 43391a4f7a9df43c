use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Unit used for the configured slow-mode speed limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedUnit {
    #[serde(rename = "KiB/s")]
    KibPerSecond,
    #[serde(rename = "MiB/s")]
    MibPerSecond,
}

impl Default for SpeedUnit {
    fn default() -> Self {
        SpeedUnit::KibPerSecond
    }
}

/// Configuration for the Transmission backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Slow-mode limit; zero means throttling is not configured.
    #[serde(default, rename = "slowSpeedLimit", alias = "slow_speed_limit")]
    pub slow_speed_limit: u64,

    #[serde(default, rename = "slowSpeedUnit", alias = "slow_speed_unit")]
    pub slow_speed_unit: SpeedUnit,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_reconnect_attempts")]
    pub reconnect_attempts: u32,

    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: String::new(),
            password: String::new(),
            slow_speed_limit: 0,
            slow_speed_unit: SpeedUnit::default(),
            poll_interval_secs: default_poll_interval_secs(),
            reconnect_attempts: default_reconnect_attempts(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9091
}

fn default_poll_interval_secs() -> u64 {
    3
}

fn default_reconnect_attempts() -> u32 {
    5
}

fn default_reconnect_delay_secs() -> u64 {
    2
}

fn default_request_timeout_secs() -> u64 {
    8
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Slow-mode limit in KiB/s as Transmission expects it, if configured.
    pub fn slow_limit_kib(&self) -> Option<u64> {
        if self.slow_speed_limit == 0 {
            return None;
        }
        Some(match self.slow_speed_unit {
            SpeedUnit::KibPerSecond => self.slow_speed_limit,
            SpeedUnit::MibPerSecond => self.slow_speed_limit.saturating_mul(1024),
        })
    }
}

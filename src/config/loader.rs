use std::env;
use std::path::Path;

use tokio::fs;
use tracing::{info, warn};

use crate::types::ClientError;

use super::{paths, Config};

impl Config {
    /// Load configuration from config.json
    /// Falls back to defaults if the file doesn't exist or can't be parsed
    pub async fn load() -> Self {
        let path = paths::get_config_path();
        let mut config = match Self::load_from(&path).await {
            Ok(config) => {
                info!(
                    host = %config.host,
                    port = config.port,
                    poll_secs = config.poll_interval_secs,
                    "Loaded configuration"
                );
                config
            }
            Err(err) => {
                warn!(error = ?err, "Failed to load config.json, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        config
    }

    /// Read a specific config file. A missing file yields the defaults.
    pub async fn load_from(path: &Path) -> Result<Self, ClientError> {
        if !path.exists() {
            warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .await
            .map_err(|err| ClientError::Config(format!("Failed to read config file: {err}")))?;

        serde_json::from_str(&contents)
            .map_err(|err| ClientError::Config(format!("Failed to parse config.json: {err}")))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("TRANSMISSION_RPC_URL") {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                self.host = trimmed.to_string();
            }
        }
        if let Ok(value) = env::var("TRANSMISSION_PASSWORD") {
            if !value.trim().is_empty() {
                self.password = value;
            }
        }
    }
}

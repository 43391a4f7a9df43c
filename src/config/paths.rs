use std::path::PathBuf;
use tracing::{debug, warn};

use super::Config;

/// Overrides where config.json is read from.
const CONFIG_PATH_ENV: &str = "TRANSMISSION_REMOTE_CONFIG";

impl Config {
    /// RPC endpoint derived from host and port.
    /// Any scheme prefix on `host` is honoured, any path on it is dropped,
    /// and a port written into `host` wins over `port`.
    pub fn rpc_url(&self) -> String {
        let trimmed = self.host.trim();
        let (scheme, rest) = if let Some(rest) = trimmed.strip_prefix("https://") {
            ("https", rest)
        } else if let Some(rest) = trimmed.strip_prefix("http://") {
            ("http", rest)
        } else {
            ("http", trimmed)
        };
        let host = rest.split('/').next().unwrap_or(rest);
        let has_port = host
            .rsplit_once(':')
            .is_some_and(|(_, port)| port.parse::<u16>().is_ok());
        if has_port {
            format!("{scheme}://{host}/transmission/rpc")
        } else {
            format!("{scheme}://{host}:{}/transmission/rpc", self.port)
        }
    }
}

/// Get the path to the config.json file
/// Checks the override variable, then the executable's directory, then the
/// working directory.
pub(super) fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            debug!(path = %path, "Using config path from environment");
            return PathBuf::from(path);
        }
    }

    if let Ok(exe_path) = std::env::current_exe() {
        debug!(path = %exe_path.display(), "Executable path detected");

        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.json");
            if config_path.exists() {
                debug!(path = %config_path.display(), "Looking for config");
                return config_path;
            }
        }
    }

    warn!("Using fallback: looking for config.json in current directory");
    PathBuf::from("config.json")
}

use thiserror::Error;

/// Errors surfaced by the Transmission backend.
///
/// `Http` and `Rpc` are the two remote failure classes (the call never
/// completed, or the daemon refused it). Neither is retried automatically.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transmission rejected request: {0}")]
    Rpc(String),

    #[error("File tree out of sync: tree has {actual:?}, request has {expected:?}")]
    Desync { expected: Vec<i64>, actual: Vec<i64> },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid intent: {0}")]
    InvalidIntent(String),

    #[error("No tree node at path {0}")]
    UnknownPath(String),

    #[error("Invalid torrent source: {0}")]
    InvalidTorrent(String),

    #[error("Torrent {0} not found")]
    NotFound(i64),

    #[error("Lost connection to Transmission after {0} reconnect attempts")]
    Disconnected(u32),
}

impl ClientError {
    /// True for failures where the daemon was never reached or never answered.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Http(_))
    }
}

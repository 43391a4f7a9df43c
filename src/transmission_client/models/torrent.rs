use serde::Serialize;

/// Client-side torrent status derived from the daemon's numeric status code.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TorrentStatus {
    Stopped,
    Checking,
    Queued,
    Downloading,
    Seeding,
    Completed,
}

impl TorrentStatus {
    /// Maps a Transmission status code. A stopped torrent that is fully
    /// downloaded is reported as completed.
    pub fn from_rpc(code: i64, percent_done: f64) -> Self {
        match code {
            0 if percent_done >= 1.0 => TorrentStatus::Completed,
            0 => TorrentStatus::Stopped,
            1 | 2 => TorrentStatus::Checking,
            3 | 5 => TorrentStatus::Queued,
            4 => TorrentStatus::Downloading,
            6 => TorrentStatus::Seeding,
            _ => TorrentStatus::Stopped,
        }
    }
}

/// What the daemon reported after `torrent-add`.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct AddedTorrent {
    pub id: i64,
    pub name: String,
    pub hash: String,
    /// The daemon already had this torrent and added nothing.
    pub duplicate: bool,
}

/// One torrent as seen in a single poll.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Torrent {
    pub id: i64,
    pub name: String,
    pub status: TorrentStatus,
    pub progress: f64,
    pub size: u64,
    pub slow_mode: bool,
    pub size_formatted: String,
    pub upload_ratio: f64,
    pub uploaded_bytes: u64,
    pub uploaded_formatted: String,
    pub peers_connected: u32,
    pub seeds_total: u32,
    pub peers_total: u32,
    pub download_speed: u64,
    pub upload_speed: u64,
    pub download_speed_formatted: String,
    pub upload_speed_formatted: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Torrent {
    /// Bare torrent with empty display fields.
    pub fn new(id: i64, name: impl Into<String>, status: TorrentStatus) -> Self {
        Self {
            id,
            name: name.into(),
            status,
            progress: 0.0,
            size: 0,
            slow_mode: false,
            size_formatted: String::new(),
            upload_ratio: 0.0,
            uploaded_bytes: 0,
            uploaded_formatted: String::new(),
            peers_connected: 0,
            seeds_total: 0,
            peers_total: 0,
            download_speed: 0,
            upload_speed: 0,
            download_speed_formatted: String::new(),
            upload_speed_formatted: String::new(),
            error: None,
        }
    }
}

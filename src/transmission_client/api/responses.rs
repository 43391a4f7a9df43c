use serde::Deserialize;

/// Envelope returned by every Transmission RPC call.
#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: String,
    pub arguments: Option<T>,
}

#[derive(Debug, Deserialize, Default)]
pub struct TorrentGetResponse {
    #[serde(default)]
    pub torrents: Vec<RawTorrent>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawTorrent {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub percent_done: Option<f64>,
    #[serde(default)]
    pub size_when_done: Option<u64>,
    #[serde(default)]
    pub downloaded_ever: Option<u64>,
    #[serde(default)]
    pub uploaded_ever: Option<u64>,
    #[serde(default)]
    pub upload_ratio: Option<f64>,
    #[serde(default)]
    pub rate_download: Option<u64>,
    #[serde(default)]
    pub rate_upload: Option<u64>,
    #[serde(default)]
    pub peers_connected: Option<u32>,
    #[serde(default)]
    pub tracker_stats: Vec<TrackerStat>,
    #[serde(default)]
    pub download_limited: Option<bool>,
    #[serde(default)]
    pub upload_limited: Option<bool>,
    #[serde(default)]
    pub error: Option<i64>,
    #[serde(default)]
    pub error_string: Option<String>,
    #[serde(default)]
    pub files: Option<Vec<RawFile>>,
    #[serde(default)]
    pub file_stats: Option<Vec<RawFileStat>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TrackerStat {
    #[serde(default)]
    pub seeder_count: i64,
    #[serde(default)]
    pub leecher_count: i64,
}

/// Static file entry; progress comes from the matching `RawFileStat`.
#[derive(Debug, Deserialize, Clone)]
pub struct RawFile {
    pub name: String,
    pub length: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawFileStat {
    #[serde(default)]
    pub bytes_completed: u64,
    pub wanted: bool,
}

/// The daemon answers with one of the two keys.
#[derive(Debug, Deserialize, Default)]
pub struct TorrentAddResponse {
    #[serde(default, rename = "torrent-added")]
    pub added: Option<AddedTorrentRaw>,
    #[serde(default, rename = "torrent-duplicate")]
    pub duplicate: Option<AddedTorrentRaw>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AddedTorrentRaw {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "hashString")]
    pub hash: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct SessionGetResponse {
    #[serde(default, rename = "download-dir")]
    pub download_dir: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatsResponse {
    #[serde(default)]
    pub download_speed: u64,
    #[serde(default)]
    pub upload_speed: u64,
}

#[derive(Debug, Deserialize, Default)]
pub struct FreeSpaceResponse {
    #[serde(default, rename = "size-bytes")]
    pub size_bytes: i64,
}

use serde::Serialize;

/// Fields requested for the polled torrent list.
pub const TORRENT_FIELDS: &[&str] = &[
    "id",
    "name",
    "status",
    "percentDone",
    "sizeWhenDone",
    "downloadedEver",
    "uploadedEver",
    "uploadRatio",
    "rateDownload",
    "rateUpload",
    "peersConnected",
    "trackerStats",
    "downloadLimited",
    "uploadLimited",
    "error",
    "errorString",
];

/// Fields requested when a torrent's file list is opened.
pub const FILE_FIELDS: &[&str] = &["id", "name", "files", "fileStats"];

/// Envelope for every Transmission RPC call.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, A: Serialize> {
    pub method: &'a str,
    pub arguments: A,
}

#[derive(Debug, Serialize)]
pub struct TorrentGetArgs<'a> {
    pub fields: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<&'a [i64]>,
}

/// Serializes as `{}` for methods without arguments.
#[derive(Debug, Serialize)]
pub struct NoArgs {}

#[derive(Debug, Serialize)]
pub struct IdsArgs<'a> {
    pub ids: &'a [i64],
}

#[derive(Debug, Serialize)]
pub struct TorrentRemoveArgs<'a> {
    pub ids: &'a [i64],
    #[serde(rename = "delete-local-data")]
    pub delete_local_data: bool,
}

/// Exactly one of `filename` (URL or magnet link) and `metainfo` (base64
/// `.torrent` contents) is set.
#[derive(Debug, Serialize)]
pub struct TorrentAddArgs<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metainfo: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WantedArgs<'a> {
    pub ids: [i64; 1],
    #[serde(rename = "files-wanted", skip_serializing_if = "Option::is_none")]
    pub files_wanted: Option<&'a [i64]>,
    #[serde(rename = "files-unwanted", skip_serializing_if = "Option::is_none")]
    pub files_unwanted: Option<&'a [i64]>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedLimitArgs<'a> {
    pub ids: &'a [i64],
    pub download_limited: bool,
    pub upload_limited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct SessionGetArgs<'a> {
    pub fields: &'a [&'a str],
}

#[derive(Debug, Serialize)]
pub struct FreeSpaceArgs<'a> {
    pub path: &'a str,
}

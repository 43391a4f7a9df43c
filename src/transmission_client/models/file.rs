use serde::Serialize;

/// Id carried by synthetic directory records.
pub const DIRECTORY_ID: i64 = -1;

/// One file inside a torrent, keyed by its slash-delimited relative path.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FileRecord {
    pub id: i64,
    pub name: String,
    pub path: String,
    pub size: u64,
    pub progress: f64,
    pub wanted: bool,
}

impl FileRecord {
    pub fn new(id: i64, path: impl Into<String>, size: u64, progress: f64, wanted: bool) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or(path.as_str()).to_string();
        Self {
            id,
            name,
            path,
            size,
            progress,
            wanted,
        }
    }
}

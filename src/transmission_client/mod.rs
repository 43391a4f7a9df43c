mod api;
mod client;
mod core;
mod helpers;
mod models;

pub use client::TransmissionClient;
pub use self::core::SESSION_HEADER;
pub use helpers::format_bytes;
pub use models::{AddedTorrent, FileRecord, SessionStats, Torrent, TorrentStatus, DIRECTORY_ID};

mod file;
mod session;
mod torrent;

pub use file::{FileRecord, DIRECTORY_ID};
pub use session::SessionStats;
pub use torrent::{AddedTorrent, Torrent, TorrentStatus};

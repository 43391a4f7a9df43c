use async_trait::async_trait;

use crate::reconcile::Action;
use crate::transmission_client::{FileRecord, Torrent};
use crate::types::ClientError;

/// Operations the engines consume from the remote daemon.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Fetch the full torrent list; polled on a fixed interval.
    async fn list_items(&self) -> Result<Vec<Torrent>, ClientError>;

    /// Fetch the file list of one torrent, on demand.
    async fn list_files(&self, item_id: i64) -> Result<Vec<FileRecord>, ClientError>;

    /// Issue one command for a set of torrents.
    async fn apply_intent(&self, action: &Action, ids: &[i64]) -> Result<(), ClientError>;

    async fn set_files_wanted(
        &self,
        item_id: i64,
        file_ids: &[i64],
        wanted: bool,
    ) -> Result<(), ClientError>;
}

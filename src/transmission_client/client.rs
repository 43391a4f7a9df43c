use std::path::Path;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::de::IgnoredAny;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::reconcile::Action;
use crate::remote::RemoteService;
use crate::types::ClientError;

use super::api::{
    FreeSpaceArgs, FreeSpaceResponse, IdsArgs, NoArgs, SessionGetArgs, SessionGetResponse,
    SessionStatsResponse, SpeedLimitArgs, TorrentAddArgs, TorrentAddResponse, TorrentGetArgs,
    TorrentGetResponse, TorrentRemoveArgs, WantedArgs, FILE_FIELDS, TORRENT_FIELDS,
};
use super::core::RpcTransport;
use super::helpers::{files_from_raw, torrent_from_raw};
use super::models::{AddedTorrent, FileRecord, SessionStats, Torrent};

/// Client for the Transmission JSON-RPC endpoint.
pub struct TransmissionClient {
    rpc: RpcTransport,
}

impl TransmissionClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let credentials = if config.username.is_empty() {
            None
        } else {
            Some((config.username.clone(), config.password.clone()))
        };
        Self::with_url(config.rpc_url(), credentials, config.request_timeout())
    }

    pub fn with_url(
        url: impl Into<String>,
        credentials: Option<(String, String)>,
        timeout: std::time::Duration,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            rpc: RpcTransport::new(url, credentials, timeout)?,
        })
    }

    /// Build a client and confirm the daemon answers (this also negotiates
    /// the session id).
    pub async fn discover(config: &Config) -> Result<Self, ClientError> {
        let client = Self::new(config)?;
        let session: SessionGetResponse = client
            .rpc
            .call("session-get", SessionGetArgs { fields: &["version"] })
            .await?;
        info!(
            url = %client.rpc.url(),
            version = session.version.as_deref().unwrap_or("unknown"),
            "Connected to Transmission"
        );
        Ok(client)
    }

    pub async fn list_torrents(&self) -> Result<Vec<Torrent>, ClientError> {
        let response: TorrentGetResponse = self
            .rpc
            .call(
                "torrent-get",
                TorrentGetArgs {
                    fields: TORRENT_FIELDS,
                    ids: None,
                },
            )
            .await?;
        Ok(response.torrents.iter().map(torrent_from_raw).collect())
    }

    pub async fn torrent_files(&self, id: i64) -> Result<Vec<FileRecord>, ClientError> {
        let ids = [id];
        let response: TorrentGetResponse = self
            .rpc
            .call(
                "torrent-get",
                TorrentGetArgs {
                    fields: FILE_FIELDS,
                    ids: Some(&ids),
                },
            )
            .await?;

        let torrent = response
            .torrents
            .into_iter()
            .next()
            .ok_or(ClientError::NotFound(id))?;
        let (Some(files), Some(stats)) = (torrent.files, torrent.file_stats) else {
            return Err(ClientError::Rpc(format!(
                "no files information available for torrent {id}"
            )));
        };

        let records = files_from_raw(&files, &stats)?;
        debug!(torrent = id, count = records.len(), "Fetched torrent files");
        Ok(records)
    }

    /// Add a torrent by URL or magnet link. A `data:` URL carries the
    /// base64 `.torrent` contents after the comma and is sent as metainfo.
    pub async fn add_url(&self, url: &str) -> Result<AddedTorrent, ClientError> {
        if let Some(rest) = url.strip_prefix("data:") {
            let (_, encoded) = rest
                .split_once(',')
                .ok_or_else(|| ClientError::InvalidTorrent("data URL without payload".to_string()))?;
            let metainfo = BASE64
                .decode(encoded.trim())
                .map_err(|err| ClientError::InvalidTorrent(format!("bad base64 in data URL: {err}")))?;
            return self.add_metainfo(&metainfo).await;
        }
        self.add(TorrentAddArgs {
            filename: Some(url),
            metainfo: None,
        })
        .await
    }

    /// Add a torrent from raw `.torrent` file contents.
    pub async fn add_metainfo(&self, metainfo: &[u8]) -> Result<AddedTorrent, ClientError> {
        if metainfo.is_empty() {
            return Err(ClientError::InvalidTorrent("empty metainfo".to_string()));
        }
        self.add(TorrentAddArgs {
            filename: None,
            metainfo: Some(BASE64.encode(metainfo)),
        })
        .await
    }

    pub async fn add_file(&self, path: impl AsRef<Path>) -> Result<AddedTorrent, ClientError> {
        let metainfo = tokio::fs::read(path.as_ref()).await?;
        self.add_metainfo(&metainfo).await
    }

    async fn add(&self, args: TorrentAddArgs<'_>) -> Result<AddedTorrent, ClientError> {
        let response: TorrentAddResponse = self.rpc.call("torrent-add", args).await?;
        let (raw, duplicate) = match (response.added, response.duplicate) {
            (Some(raw), _) => (raw, false),
            (None, Some(raw)) => (raw, true),
            (None, None) => return Err(ClientError::Rpc("torrent-add returned no torrent".to_string())),
        };
        if duplicate {
            info!(torrent = raw.id, name = %raw.name, "Torrent already present");
        } else {
            info!(torrent = raw.id, name = %raw.name, "Torrent added");
        }
        Ok(AddedTorrent {
            id: raw.id,
            name: raw.name,
            hash: raw.hash,
            duplicate,
        })
    }

    pub async fn start(&self, ids: &[i64]) -> Result<(), ClientError> {
        self.call_ids("torrent-start", ids).await
    }

    pub async fn stop(&self, ids: &[i64]) -> Result<(), ClientError> {
        self.call_ids("torrent-stop", ids).await
    }

    pub async fn verify(&self, ids: &[i64]) -> Result<(), ClientError> {
        self.call_ids("torrent-verify", ids).await
    }

    pub async fn remove(&self, id: i64, delete_data: bool) -> Result<(), ClientError> {
        let ids = [id];
        let _: IgnoredAny = self
            .rpc
            .call(
                "torrent-remove",
                TorrentRemoveArgs {
                    ids: &ids,
                    delete_local_data: delete_data,
                },
            )
            .await?;
        Ok(())
    }

    pub async fn set_files_wanted(
        &self,
        torrent_id: i64,
        file_ids: &[i64],
        wanted: bool,
    ) -> Result<(), ClientError> {
        let args = WantedArgs {
            ids: [torrent_id],
            files_wanted: wanted.then_some(file_ids),
            files_unwanted: (!wanted).then_some(file_ids),
        };
        let _: IgnoredAny = self.rpc.call("torrent-set", args).await?;
        Ok(())
    }

    /// Slow mode caps both directions at `limit_kib`; normal mode lifts both caps.
    pub async fn set_speed_limit(
        &self,
        ids: &[i64],
        slow: bool,
        limit_kib: u64,
    ) -> Result<(), ClientError> {
        let limit = (slow && limit_kib > 0).then_some(limit_kib);
        let args = SpeedLimitArgs {
            ids,
            download_limited: limit.is_some(),
            upload_limited: limit.is_some(),
            download_limit: limit,
            upload_limit: limit,
        };
        let _: IgnoredAny = self.rpc.call("torrent-set", args).await?;
        Ok(())
    }

    pub async fn session_stats(&self) -> Result<SessionStats, ClientError> {
        let session: SessionGetResponse = self
            .rpc
            .call(
                "session-get",
                SessionGetArgs {
                    fields: &["download-dir", "version"],
                },
            )
            .await?;
        let stats: SessionStatsResponse = self.rpc.call("session-stats", NoArgs {}).await?;

        let mut free_space = 0;
        if let Some(dir) = session.download_dir.as_deref() {
            match self
                .rpc
                .call::<_, FreeSpaceResponse>("free-space", FreeSpaceArgs { path: dir })
                .await
            {
                Ok(response) => free_space = response.size_bytes.max(0) as u64,
                Err(err) => warn!(error = ?err, dir, "Failed to query free space"),
            }
        }

        let version = session.version.unwrap_or_else(|| "unknown".to_string());
        Ok(SessionStats {
            total_download_speed: stats.download_speed,
            total_upload_speed: stats.upload_speed,
            free_space,
            parsed_version: SessionStats::parse_version(&version),
            transmission_version: version,
        })
    }

    async fn call_ids(&self, method: &str, ids: &[i64]) -> Result<(), ClientError> {
        let _: IgnoredAny = self.rpc.call(method, IdsArgs { ids }).await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteService for TransmissionClient {
    async fn list_items(&self) -> Result<Vec<Torrent>, ClientError> {
        self.list_torrents().await
    }

    async fn list_files(&self, item_id: i64) -> Result<Vec<FileRecord>, ClientError> {
        self.torrent_files(item_id).await
    }

    async fn apply_intent(&self, action: &Action, ids: &[i64]) -> Result<(), ClientError> {
        match *action {
            Action::Start => self.start(ids).await,
            Action::Stop => self.stop(ids).await,
            Action::Verify => self.verify(ids).await,
            Action::Throttle { slow, limit_kib } => self.set_speed_limit(ids, slow, limit_kib).await,
            Action::Remove { delete_data } => {
                let mut failed = Vec::new();
                for id in ids {
                    if let Err(err) = self.remove(*id, delete_data).await {
                        warn!(torrent = id, error = %err, "Failed to remove torrent");
                        failed.push((*id, err));
                    }
                }
                let Some((_, first)) = failed.first() else {
                    return Ok(());
                };
                let failed_ids: Vec<String> = failed.iter().map(|(id, _)| id.to_string()).collect();
                Err(ClientError::Rpc(format!(
                    "failed to remove torrents {}: {first}",
                    failed_ids.join(", ")
                )))
            }
        }
    }

    async fn set_files_wanted(
        &self,
        item_id: i64,
        file_ids: &[i64],
        wanted: bool,
    ) -> Result<(), ClientError> {
        TransmissionClient::set_files_wanted(self, item_id, file_ids, wanted).await
    }
}

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::transmission_client::{Torrent, TorrentStatus};

use super::intent::ItemState;

/// One polled view of the remote torrent collection. Never mutated.
#[derive(Debug, Clone)]
pub struct Snapshot {
    sequence: u64,
    taken_at: DateTime<Utc>,
    items: HashMap<i64, Torrent>,
}

impl Snapshot {
    pub fn new(sequence: u64, torrents: Vec<Torrent>) -> Self {
        Self {
            sequence,
            taken_at: Utc::now(),
            items: torrents.into_iter().map(|t| (t.id, t)).collect(),
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    pub fn get(&self, id: i64) -> Option<&Torrent> {
        self.items.get(&id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.items.contains_key(&id)
    }

    pub fn status(&self, id: i64) -> Option<TorrentStatus> {
        self.items.get(&id).map(|t| t.status)
    }

    pub fn state(&self, id: i64) -> Option<ItemState> {
        self.items.get(&id).map(ItemState::of)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Torrents ordered by id.
    pub fn torrents(&self) -> Vec<&Torrent> {
        let mut torrents: Vec<&Torrent> = self.items.values().collect();
        torrents.sort_by_key(|t| t.id);
        torrents
    }
}

/// Keeps only the newest snapshot and hands out arrival sequence numbers.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    latest: Option<Snapshot>,
    issued: u64,
}

impl SnapshotStore {
    /// Reserve the sequence number for a poll about to be dispatched.
    pub fn reserve(&mut self) -> u64 {
        self.issued = self.issued.saturating_add(1);
        self.issued
    }

    /// Returns false (and drops the snapshot) if it is not newer than the
    /// one already held.
    pub fn accept(&mut self, snapshot: Snapshot) -> bool {
        if let Some(current) = &self.latest {
            if snapshot.sequence() <= current.sequence() {
                debug!(
                    stale = snapshot.sequence(),
                    current = current.sequence(),
                    "Discarding stale snapshot"
                );
                return false;
            }
        }
        self.issued = self.issued.max(snapshot.sequence());
        self.latest = Some(snapshot);
        true
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }
}

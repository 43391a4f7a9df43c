use std::collections::HashMap;

use tracing::debug;

use crate::transmission_client::TorrentStatus;

use super::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VerifyPhase {
    /// Dispatched; waiting for the first snapshot taken after `after`.
    Requested { after: u64 },
    Checking,
}

/// Per-torrent verification tracking, keyed by torrent id.
#[derive(Debug, Default)]
pub struct VerifyTracker {
    entries: HashMap<i64, VerifyPhase>,
}

impl VerifyTracker {
    /// Record a successful verify dispatch issued after snapshot `after`.
    pub fn request(&mut self, id: i64, after: u64) {
        self.entries.insert(id, VerifyPhase::Requested { after });
    }

    pub fn clear(&mut self, id: i64) {
        self.entries.remove(&id);
    }

    pub fn is_busy(&self, id: i64) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn is_verifying(&self, id: i64) -> bool {
        matches!(self.entries.get(&id), Some(VerifyPhase::Checking))
    }

    /// A request whose first later snapshot does not show `Checking` is
    /// cleared: the check either finished between polls or never started.
    pub fn observe(&mut self, snapshot: &Snapshot) {
        self.entries.retain(|id, phase| {
            let Some(status) = snapshot.status(*id) else {
                debug!(torrent = id, "Verified torrent disappeared");
                return false;
            };
            let checking = match status {
                TorrentStatus::Checking => true,
                TorrentStatus::Stopped
                | TorrentStatus::Queued
                | TorrentStatus::Downloading
                | TorrentStatus::Seeding
                | TorrentStatus::Completed => false,
            };
            let current = *phase;
            match current {
                VerifyPhase::Requested { after } if snapshot.sequence() <= after => true,
                VerifyPhase::Requested { .. } | VerifyPhase::Checking if checking => {
                    *phase = VerifyPhase::Checking;
                    true
                }
                VerifyPhase::Requested { .. } | VerifyPhase::Checking => {
                    debug!(torrent = id, "Verification finished");
                    false
                }
            }
        });
    }
}

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::transmission_client::{Torrent, TorrentStatus};
use crate::types::ClientError;

use super::snapshot::Snapshot;

/// A command the user can issue against one or more torrents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Start,
    Stop,
    Remove { delete_data: bool },
    Throttle { slow: bool, limit_kib: u64 },
    Verify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionClass {
    Start,
    Stop,
    Remove,
    Throttle,
    Verify,
}

impl ActionClass {
    pub fn verb(&self) -> &'static str {
        match self {
            ActionClass::Start => "start",
            ActionClass::Stop => "stop",
            ActionClass::Remove => "remove",
            ActionClass::Throttle => "set speed limit for",
            ActionClass::Verify => "verify",
        }
    }
}

/// The part of a torrent that intents converge on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemState {
    pub status: TorrentStatus,
    pub slow_mode: bool,
}

impl ItemState {
    pub fn of(torrent: &Torrent) -> Self {
        Self {
            status: torrent.status,
            slow_mode: torrent.slow_mode,
        }
    }
}

impl Action {
    pub fn class(&self) -> ActionClass {
        match self {
            Action::Start => ActionClass::Start,
            Action::Stop => ActionClass::Stop,
            Action::Remove { .. } => ActionClass::Remove,
            Action::Throttle { .. } => ActionClass::Throttle,
            Action::Verify => ActionClass::Verify,
        }
    }

    /// Remove and verify resolve without watching snapshots.
    pub fn converges(&self) -> bool {
        match self {
            Action::Start | Action::Stop | Action::Throttle { .. } => true,
            Action::Remove { .. } | Action::Verify => false,
        }
    }

    /// Whether `state` is what this action is trying to reach.
    pub fn is_target(&self, state: ItemState) -> bool {
        match self {
            Action::Start => match state.status {
                TorrentStatus::Downloading | TorrentStatus::Seeding => true,
                TorrentStatus::Stopped
                | TorrentStatus::Checking
                | TorrentStatus::Queued
                | TorrentStatus::Completed => false,
            },
            Action::Stop => match state.status {
                TorrentStatus::Stopped | TorrentStatus::Completed => true,
                TorrentStatus::Checking
                | TorrentStatus::Queued
                | TorrentStatus::Downloading
                | TorrentStatus::Seeding => false,
            },
            Action::Throttle { slow, .. } => state.slow_mode == *slow,
            Action::Remove { .. } | Action::Verify => false,
        }
    }

    /// Whether the action can still have an effect on a torrent in `state`.
    pub fn is_applicable(&self, state: ItemState) -> bool {
        match self {
            Action::Start => match state.status {
                TorrentStatus::Stopped | TorrentStatus::Completed => true,
                TorrentStatus::Checking
                | TorrentStatus::Queued
                | TorrentStatus::Downloading
                | TorrentStatus::Seeding => false,
            },
            Action::Stop => match state.status {
                TorrentStatus::Downloading | TorrentStatus::Seeding => true,
                TorrentStatus::Stopped
                | TorrentStatus::Checking
                | TorrentStatus::Queued
                | TorrentStatus::Completed => false,
            },
            Action::Throttle { .. } => match state.status {
                TorrentStatus::Stopped
                | TorrentStatus::Checking
                | TorrentStatus::Queued
                | TorrentStatus::Downloading
                | TorrentStatus::Seeding
                | TorrentStatus::Completed => true,
            },
            Action::Remove { .. } => true,
            Action::Verify => match state.status {
                TorrentStatus::Checking => false,
                TorrentStatus::Stopped
                | TorrentStatus::Queued
                | TorrentStatus::Downloading
                | TorrentStatus::Seeding
                | TorrentStatus::Completed => true,
            },
        }
    }
}

/// A dispatched command awaiting observable convergence. Read-only once built.
#[derive(Debug, Clone)]
pub struct Intent {
    action: Action,
    target_ids: BTreeSet<i64>,
    issued_at: u64,
    baseline: HashMap<i64, ItemState>,
}

impl Intent {
    pub fn new(
        action: Action,
        target_ids: impl IntoIterator<Item = i64>,
        issued_at: &Snapshot,
    ) -> Result<Self, ClientError> {
        if !action.converges() {
            return Err(ClientError::InvalidIntent(format!(
                "{:?} does not converge on snapshots",
                action.class()
            )));
        }
        let target_ids: BTreeSet<i64> = target_ids.into_iter().collect();
        if target_ids.is_empty() {
            return Err(ClientError::InvalidIntent("no target torrents".to_string()));
        }

        let mut baseline = HashMap::with_capacity(target_ids.len());
        for id in &target_ids {
            let state = issued_at.state(*id).ok_or_else(|| {
                ClientError::InvalidIntent(format!("torrent {id} is not in the current list"))
            })?;
            baseline.insert(*id, state);
        }

        Ok(Self {
            action,
            target_ids,
            issued_at: issued_at.sequence(),
            baseline,
        })
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn class(&self) -> ActionClass {
        self.action.class()
    }

    pub fn target_ids(&self) -> &BTreeSet<i64> {
        &self.target_ids
    }

    pub fn issued_at(&self) -> u64 {
        self.issued_at
    }

    pub fn baseline(&self, id: i64) -> Option<ItemState> {
        self.baseline.get(&id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(items: &[(i64, TorrentStatus)]) -> Snapshot {
        Snapshot::new(
            1,
            items
                .iter()
                .map(|(id, status)| Torrent::new(*id, "t", *status))
                .collect(),
        )
    }

    #[test]
    fn intent_requires_targets_present_in_snapshot() {
        let snap = snapshot(&[(1, TorrentStatus::Stopped)]);
        assert!(Intent::new(Action::Start, [1], &snap).is_ok());
        assert!(matches!(
            Intent::new(Action::Start, [2], &snap),
            Err(ClientError::InvalidIntent(_))
        ));
        assert!(matches!(
            Intent::new(Action::Start, [], &snap),
            Err(ClientError::InvalidIntent(_))
        ));
    }

    #[test]
    fn remove_is_not_a_converging_intent() {
        let snap = snapshot(&[(1, TorrentStatus::Stopped)]);
        let result = Intent::new(Action::Remove { delete_data: false }, [1], &snap);
        assert!(matches!(result, Err(ClientError::InvalidIntent(_))));
    }

    #[test]
    fn baseline_captures_issue_time_state() {
        let snap = snapshot(&[(1, TorrentStatus::Stopped), (2, TorrentStatus::Seeding)]);
        let intent = Intent::new(Action::Stop, [2], &snap).unwrap();
        assert_eq!(intent.baseline(2).unwrap().status, TorrentStatus::Seeding);
        assert_eq!(intent.baseline(1), None);
        assert_eq!(intent.class(), ActionClass::Stop);
    }

    #[test]
    fn stop_treats_completed_as_reached() {
        let completed = ItemState {
            status: TorrentStatus::Completed,
            slow_mode: false,
        };
        assert!(Action::Stop.is_target(completed));
        assert!(Action::Start.is_applicable(completed));
        assert!(!Action::Stop.is_applicable(completed));
    }
}

use serde::Serialize;
use tracing::{info, warn};

use crate::remote::RemoteService;
use crate::types::ClientError;

use super::intent::{Action, ActionClass, Intent};
use super::reconciler::{IntentPhase, OperationReconciler};
use super::snapshot::{Snapshot, SnapshotStore};
use super::verify::VerifyTracker;

/// What the user asked for; throttle limits come from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkRequest {
    Start,
    Stop,
    Throttle { slow: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    AlreadyInFlight(ActionClass),
    NoSnapshot,
    MissingThrottleLimit,
    VerifyInProgress(i64),
}

/// A remote call the host must perform before calling `finish`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub action: Action,
    pub ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Ready(Ticket),
    NoOp,
    Rejected(Rejection),
}

/// Result of the async conveniences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Dispatched,
    Failed,
    NoOp,
    Rejected(Rejection),
}

/// In-flight indicators for the bulk action bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkFlags {
    pub start: bool,
    pub stop: bool,
    pub remove: bool,
    pub throttle: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RemoveReport {
    pub removed: Vec<i64>,
    pub failed: Vec<(i64, String)>,
}

/// Owns every live intent and the latest snapshot they are checked against.
#[derive(Debug, Default)]
pub struct BulkOperationCoordinator {
    snapshots: SnapshotStore,
    start: Option<OperationReconciler>,
    stop: Option<OperationReconciler>,
    throttle: Option<OperationReconciler>,
    removing: bool,
    verify: VerifyTracker,
    throttle_limit_kib: Option<u64>,
    last_error: Option<String>,
}

impl BulkOperationCoordinator {
    /// A zero limit counts as not configured.
    pub fn new(throttle_limit_kib: Option<u64>) -> Self {
        Self {
            throttle_limit_kib: throttle_limit_kib.filter(|limit| *limit > 0),
            ..Self::default()
        }
    }

    pub fn flags(&self) -> BulkFlags {
        let live = |slot: &Option<OperationReconciler>| slot.as_ref().is_some_and(|r| r.in_flight());
        BulkFlags {
            start: live(&self.start),
            stop: live(&self.stop),
            remove: self.removing,
            throttle: live(&self.throttle),
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn latest_snapshot(&self) -> Option<&Snapshot> {
        self.snapshots.latest()
    }

    pub fn is_verifying(&self, id: i64) -> bool {
        self.verify.is_verifying(id)
    }

    pub fn is_verify_pending(&self, id: i64) -> bool {
        self.verify.is_busy(id)
    }

    pub fn set_throttle_limit(&mut self, limit_kib: Option<u64>) {
        self.throttle_limit_kib = limit_kib.filter(|limit| *limit > 0);
    }

    fn slot_mut(&mut self, class: ActionClass) -> Option<&mut Option<OperationReconciler>> {
        match class {
            ActionClass::Start => Some(&mut self.start),
            ActionClass::Stop => Some(&mut self.stop),
            ActionClass::Throttle => Some(&mut self.throttle),
            ActionClass::Remove | ActionClass::Verify => None,
        }
    }

    /// Feed a freshly polled snapshot. Returns false if it was stale.
    pub fn observe(&mut self, snapshot: Snapshot) -> bool {
        if !self.snapshots.accept(snapshot) {
            return false;
        }
        let Some(latest) = self.snapshots.latest() else {
            return false;
        };

        for slot in [&mut self.start, &mut self.stop, &mut self.throttle] {
            let Some(reconciler) = slot.as_mut() else {
                continue;
            };
            let phase = reconciler.observe(latest);
            if phase.is_terminal() {
                info!(
                    action = ?reconciler.class(),
                    phase = ?phase,
                    targets = reconciler.intent().target_ids().len(),
                    "Bulk operation resolved"
                );
                *slot = None;
            }
        }
        self.verify.observe(latest);
        true
    }

    /// Create the intent for `request` over `selection`.
    pub fn begin(&mut self, request: BulkRequest, selection: &[i64]) -> Dispatch {
        let action = match request {
            BulkRequest::Start => Action::Start,
            BulkRequest::Stop => Action::Stop,
            BulkRequest::Throttle { slow } => match self.throttle_limit_kib {
                Some(limit_kib) => Action::Throttle { slow, limit_kib },
                None => {
                    warn!("Speed limit requested but no slow speed limit is configured");
                    self.last_error = Some("No slow speed limit configured".to_string());
                    return Dispatch::Rejected(Rejection::MissingThrottleLimit);
                }
            },
        };
        let class = action.class();

        if self.flags_for(class) {
            return Dispatch::Rejected(Rejection::AlreadyInFlight(class));
        }
        if selection.is_empty() {
            return Dispatch::NoOp;
        }
        let Some(snapshot) = self.snapshots.latest() else {
            return Dispatch::Rejected(Rejection::NoSnapshot);
        };

        let mut ids: Vec<i64> = selection
            .iter()
            .copied()
            .filter(|id| snapshot.state(*id).is_some_and(|state| action.is_applicable(state)))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Dispatch::NoOp;
        }

        let reconciler = match Intent::new(action, ids.iter().copied(), snapshot) {
            Ok(intent) => OperationReconciler::new(intent, snapshot),
            Err(err) => {
                warn!(error = %err, "Could not build intent");
                return Dispatch::NoOp;
            }
        };

        info!(action = ?class, count = ids.len(), "Dispatching bulk operation");
        if reconciler.in_flight() {
            if let Some(slot) = self.slot_mut(class) {
                *slot = Some(reconciler);
            }
        }
        Dispatch::Ready(Ticket { action, ids })
    }

    fn flags_for(&self, class: ActionClass) -> bool {
        let flags = self.flags();
        match class {
            ActionClass::Start => flags.start,
            ActionClass::Stop => flags.stop,
            ActionClass::Throttle => flags.throttle,
            ActionClass::Remove => flags.remove,
            ActionClass::Verify => false,
        }
    }

    /// Record the transport result of a ticket from `begin`.
    pub fn finish(&mut self, ticket: &Ticket, result: Result<(), ClientError>) {
        let class = ticket.action.class();
        let error = result.err();
        if let Some(err) = &error {
            warn!(action = ?class, error = %err, "Bulk operation failed");
            self.last_error = Some(format!("Failed to {} torrents: {err}", class.verb()));
        }

        let Some(slot) = self.slot_mut(class) else {
            return;
        };
        if let Some(reconciler) = slot.as_mut() {
            match error {
                None => reconciler.acknowledge(),
                Some(_) => reconciler.fail(),
            }
            if reconciler.phase() == IntentPhase::Abandoned {
                *slot = None;
            }
        }
    }

    /// Poll the remote list and feed it through `observe`.
    pub async fn refresh<R>(&mut self, remote: &R) -> Result<(), ClientError>
    where
        R: RemoteService + ?Sized,
    {
        let sequence = self.snapshots.reserve();
        let torrents = remote.list_items().await?;
        self.observe(Snapshot::new(sequence, torrents));
        Ok(())
    }

    async fn refresh_after_dispatch<R>(&mut self, remote: &R)
    where
        R: RemoteService + ?Sized,
    {
        if let Err(err) = self.refresh(remote).await {
            warn!(error = %err, "Failed to refresh torrents after operation");
            self.last_error = Some(format!("Failed to refresh torrents: {err}"));
        }
    }

    /// begin, remote call, finish, then refresh.
    pub async fn run<R>(&mut self, remote: &R, request: BulkRequest, selection: &[i64]) -> Outcome
    where
        R: RemoteService + ?Sized,
    {
        let ticket = match self.begin(request, selection) {
            Dispatch::Ready(ticket) => ticket,
            Dispatch::NoOp => return Outcome::NoOp,
            Dispatch::Rejected(reason) => return Outcome::Rejected(reason),
        };

        let result = remote.apply_intent(&ticket.action, &ticket.ids).await;
        let failed = result.is_err();
        self.finish(&ticket, result);
        if failed {
            return Outcome::Failed;
        }
        self.refresh_after_dispatch(remote).await;
        Outcome::Dispatched
    }

    pub async fn start_selected<R>(&mut self, remote: &R, selection: &[i64]) -> Outcome
    where
        R: RemoteService + ?Sized,
    {
        self.run(remote, BulkRequest::Start, selection).await
    }

    pub async fn stop_selected<R>(&mut self, remote: &R, selection: &[i64]) -> Outcome
    where
        R: RemoteService + ?Sized,
    {
        self.run(remote, BulkRequest::Stop, selection).await
    }

    pub async fn throttle_selected<R>(&mut self, remote: &R, selection: &[i64], slow: bool) -> Outcome
    where
        R: RemoteService + ?Sized,
    {
        self.run(remote, BulkRequest::Throttle { slow }, selection).await
    }

    pub fn begin_remove(&mut self, selection: &[i64], delete_data: bool) -> Dispatch {
        if self.removing {
            return Dispatch::Rejected(Rejection::AlreadyInFlight(ActionClass::Remove));
        }
        if selection.is_empty() {
            return Dispatch::NoOp;
        }
        self.removing = true;
        info!(count = selection.len(), delete_data, "Removing torrents");
        Dispatch::Ready(Ticket {
            action: Action::Remove { delete_data },
            ids: selection.to_vec(),
        })
    }

    pub fn finish_remove(&mut self, report: &RemoveReport) {
        self.removing = false;
        if report.failed.is_empty() {
            return;
        }
        let ids: Vec<String> = report.failed.iter().map(|(id, _)| id.to_string()).collect();
        self.last_error = Some(format!(
            "Failed to remove {} of {} torrents (ids {}): {}",
            report.failed.len(),
            report.failed.len() + report.removed.len(),
            ids.join(", "),
            report.failed[0].1,
        ));
    }

    /// Removes one id at a time; a failure does not stop the rest.
    pub async fn remove_selected<R>(&mut self, remote: &R, selection: &[i64], delete_data: bool) -> Outcome
    where
        R: RemoteService + ?Sized,
    {
        let ticket = match self.begin_remove(selection, delete_data) {
            Dispatch::Ready(ticket) => ticket,
            Dispatch::NoOp => return Outcome::NoOp,
            Dispatch::Rejected(reason) => return Outcome::Rejected(reason),
        };

        let mut report = RemoveReport::default();
        for id in &ticket.ids {
            match remote.apply_intent(&ticket.action, &[*id]).await {
                Ok(()) => report.removed.push(*id),
                Err(err) => {
                    warn!(torrent = id, error = %err, "Failed to remove torrent");
                    report.failed.push((*id, err.to_string()));
                }
            }
        }

        self.refresh_after_dispatch(remote).await;
        self.finish_remove(&report);
        if report.failed.is_empty() {
            Outcome::Dispatched
        } else {
            Outcome::Failed
        }
    }

    pub async fn verify<R>(&mut self, remote: &R, id: i64) -> Outcome
    where
        R: RemoteService + ?Sized,
    {
        if self.verify.is_busy(id) {
            return Outcome::Rejected(Rejection::VerifyInProgress(id));
        }
        let Some(snapshot) = self.snapshots.latest() else {
            return Outcome::Rejected(Rejection::NoSnapshot);
        };
        let applicable = snapshot
            .state(id)
            .is_some_and(|state| Action::Verify.is_applicable(state));
        if !applicable {
            return Outcome::NoOp;
        }
        let after = snapshot.sequence();

        match remote.apply_intent(&Action::Verify, &[id]).await {
            Ok(()) => {
                info!(torrent = id, "Verification requested");
                self.verify.request(id, after);
                self.refresh_after_dispatch(remote).await;
                Outcome::Dispatched
            }
            Err(err) => {
                warn!(torrent = id, error = %err, "Failed to verify torrent");
                self.verify.clear(id);
                self.last_error = Some(format!("Failed to verify torrent: {err}"));
                Outcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::reconcile::PollScheduler;
    use crate::transmission_client::{FileRecord, Torrent, TorrentStatus};

    #[derive(Default)]
    struct FakeRemote {
        torrents: Mutex<Vec<Torrent>>,
        calls: Mutex<Vec<(ActionClass, Vec<i64>)>>,
        failing: HashSet<i64>,
        list_calls: Mutex<usize>,
        /// Commands are accepted but have no visible effect.
        inert: bool,
        offline: AtomicBool,
    }

    /// A real connection-refused error from a port nobody listens on.
    async fn refused() -> ClientError {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let err = reqwest::get(format!("http://127.0.0.1:{port}/"))
            .await
            .unwrap_err();
        ClientError::Http(err)
    }

    impl FakeRemote {
        fn with(items: &[(i64, TorrentStatus)]) -> Self {
            Self {
                torrents: Mutex::new(
                    items
                        .iter()
                        .map(|(id, status)| Torrent::new(*id, format!("t{id}"), *status))
                        .collect(),
                ),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<(ActionClass, Vec<i64>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RemoteService for FakeRemote {
        async fn list_items(&self) -> Result<Vec<Torrent>, ClientError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(refused().await);
            }
            *self.list_calls.lock().unwrap() += 1;
            Ok(self.torrents.lock().unwrap().clone())
        }

        async fn list_files(&self, item_id: i64) -> Result<Vec<FileRecord>, ClientError> {
            Err(ClientError::NotFound(item_id))
        }

        async fn apply_intent(&self, action: &Action, ids: &[i64]) -> Result<(), ClientError> {
            self.calls.lock().unwrap().push((action.class(), ids.to_vec()));
            if ids.iter().any(|id| self.failing.contains(id)) {
                return Err(ClientError::Rpc("torrent is busy".to_string()));
            }
            if self.inert {
                return Ok(());
            }
            let mut torrents = self.torrents.lock().unwrap();
            match *action {
                Action::Remove { .. } => torrents.retain(|t| !ids.contains(&t.id)),
                Action::Start => torrents
                    .iter_mut()
                    .filter(|t| ids.contains(&t.id))
                    .for_each(|t| t.status = TorrentStatus::Downloading),
                Action::Stop => torrents
                    .iter_mut()
                    .filter(|t| ids.contains(&t.id))
                    .for_each(|t| t.status = TorrentStatus::Stopped),
                Action::Throttle { slow, .. } => torrents
                    .iter_mut()
                    .filter(|t| ids.contains(&t.id))
                    .for_each(|t| t.slow_mode = slow),
                Action::Verify => torrents
                    .iter_mut()
                    .filter(|t| ids.contains(&t.id))
                    .for_each(|t| t.status = TorrentStatus::Checking),
            }
            Ok(())
        }

        async fn set_files_wanted(&self, _: i64, _: &[i64], _: bool) -> Result<(), ClientError> {
            Ok(())
        }
    }

    fn snapshot(sequence: u64, items: &[(i64, TorrentStatus)]) -> Snapshot {
        Snapshot::new(
            sequence,
            items
                .iter()
                .map(|(id, status)| Torrent::new(*id, "t", *status))
                .collect(),
        )
    }

    #[test]
    fn start_targets_only_startable_torrents_and_clears_on_convergence() {
        let mut coordinator = BulkOperationCoordinator::new(None);
        coordinator.observe(snapshot(
            1,
            &[(1, TorrentStatus::Stopped), (2, TorrentStatus::Downloading)],
        ));

        let Dispatch::Ready(ticket) = coordinator.begin(BulkRequest::Start, &[1, 2]) else {
            panic!("expected a dispatch");
        };
        assert_eq!(ticket.ids, vec![1]);
        assert!(coordinator.flags().start);

        coordinator.finish(&ticket, Ok(()));
        assert!(coordinator.flags().start);

        coordinator.observe(snapshot(2, &[(1, TorrentStatus::Downloading)]));
        assert!(!coordinator.flags().start);
        assert_eq!(coordinator.last_error(), None);
    }

    #[test]
    fn second_start_while_in_flight_is_rejected() {
        let mut coordinator = BulkOperationCoordinator::new(None);
        coordinator.observe(snapshot(1, &[(1, TorrentStatus::Stopped)]));

        assert!(matches!(
            coordinator.begin(BulkRequest::Start, &[1]),
            Dispatch::Ready(_)
        ));
        assert_eq!(
            coordinator.begin(BulkRequest::Start, &[1]),
            Dispatch::Rejected(Rejection::AlreadyInFlight(ActionClass::Start))
        );
        // A different class is independent.
        assert_eq!(coordinator.begin(BulkRequest::Stop, &[1]), Dispatch::NoOp);
    }

    #[test]
    fn nothing_eligible_is_a_noop() {
        let mut coordinator = BulkOperationCoordinator::new(None);
        coordinator.observe(snapshot(1, &[(1, TorrentStatus::Seeding)]));
        assert_eq!(coordinator.begin(BulkRequest::Start, &[1]), Dispatch::NoOp);
        assert_eq!(coordinator.begin(BulkRequest::Stop, &[]), Dispatch::NoOp);
        assert_eq!(coordinator.flags(), BulkFlags::default());
    }

    #[test]
    fn begin_needs_a_snapshot() {
        let mut coordinator = BulkOperationCoordinator::new(None);
        assert_eq!(
            coordinator.begin(BulkRequest::Stop, &[1]),
            Dispatch::Rejected(Rejection::NoSnapshot)
        );
    }

    #[test]
    fn throttle_without_limit_is_rejected() {
        let mut coordinator = BulkOperationCoordinator::new(None);
        coordinator.observe(snapshot(1, &[(1, TorrentStatus::Downloading)]));
        assert_eq!(
            coordinator.begin(BulkRequest::Throttle { slow: true }, &[1]),
            Dispatch::Rejected(Rejection::MissingThrottleLimit)
        );
        assert!(coordinator.last_error().is_some());
        assert!(!coordinator.flags().throttle);
    }

    #[test]
    fn zero_throttle_limit_counts_as_missing() {
        let mut coordinator = BulkOperationCoordinator::new(Some(0));
        coordinator.observe(snapshot(1, &[(1, TorrentStatus::Downloading)]));
        assert_eq!(
            coordinator.begin(BulkRequest::Throttle { slow: true }, &[1]),
            Dispatch::Rejected(Rejection::MissingThrottleLimit)
        );

        coordinator.set_throttle_limit(Some(50));
        coordinator.set_throttle_limit(Some(0));
        assert_eq!(
            coordinator.begin(BulkRequest::Throttle { slow: true }, &[1]),
            Dispatch::Rejected(Rejection::MissingThrottleLimit)
        );
        assert!(!coordinator.flags().throttle);
    }

    #[test]
    fn failed_dispatch_clears_flag_and_records_error() {
        let mut coordinator = BulkOperationCoordinator::new(None);
        coordinator.observe(snapshot(1, &[(1, TorrentStatus::Seeding)]));
        let Dispatch::Ready(ticket) = coordinator.begin(BulkRequest::Stop, &[1]) else {
            panic!("expected a dispatch");
        };

        coordinator.finish(&ticket, Err(ClientError::Rpc("no".to_string())));
        assert!(!coordinator.flags().stop);
        assert!(coordinator
            .last_error()
            .unwrap()
            .starts_with("Failed to stop torrents"));

        coordinator.clear_error();
        assert_eq!(coordinator.last_error(), None);
    }

    #[test]
    fn stale_snapshot_does_not_resolve_intent() {
        let mut coordinator = BulkOperationCoordinator::new(None);
        coordinator.observe(snapshot(4, &[(1, TorrentStatus::Stopped)]));
        let Dispatch::Ready(ticket) = coordinator.begin(BulkRequest::Start, &[1]) else {
            panic!("expected a dispatch");
        };
        coordinator.finish(&ticket, Ok(()));

        assert!(!coordinator.observe(snapshot(3, &[(1, TorrentStatus::Downloading)])));
        assert!(coordinator.flags().start);
    }

    #[tokio::test]
    async fn start_selected_dispatches_and_refreshes() {
        let remote = FakeRemote::with(&[(1, TorrentStatus::Stopped), (2, TorrentStatus::Seeding)]);
        let mut coordinator = BulkOperationCoordinator::new(None);
        coordinator.refresh(&remote).await.unwrap();

        let outcome = coordinator.start_selected(&remote, &[1, 2]).await;

        assert_eq!(outcome, Outcome::Dispatched);
        assert_eq!(remote.calls(), vec![(ActionClass::Start, vec![1])]);
        assert!(!coordinator.flags().start);
        let latest = coordinator.latest_snapshot().unwrap();
        assert_eq!(latest.status(1), Some(TorrentStatus::Downloading));
    }

    #[tokio::test]
    async fn converging_intent_survives_suspended_polling() {
        let mut remote = FakeRemote::with(&[(1, TorrentStatus::Stopped)]);
        remote.inert = true;
        let mut coordinator = BulkOperationCoordinator::new(None);
        let mut scheduler = PollScheduler::new(Duration::from_secs(3), 3);
        scheduler.start();

        coordinator.refresh(&remote).await.unwrap();
        assert_eq!(coordinator.start_selected(&remote, &[1]).await, Outcome::Dispatched);
        assert!(coordinator.flags().start);

        remote.offline.store(true, Ordering::SeqCst);
        let err = coordinator.refresh(&remote).await.unwrap_err();
        assert!(err.is_transport());
        scheduler.suspend();
        assert!(!scheduler.is_polling());
        assert!(coordinator.flags().start);

        remote.offline.store(false, Ordering::SeqCst);
        assert_eq!(scheduler.next_attempt(), Some(1));
        coordinator.refresh(&remote).await.unwrap();
        scheduler.resume();
        assert!(scheduler.is_polling());
        // Reconnected, but the torrent has not started yet.
        assert!(coordinator.flags().start);

        remote.torrents.lock().unwrap()[0].status = TorrentStatus::Downloading;
        coordinator.refresh(&remote).await.unwrap();
        assert!(!coordinator.flags().start);
    }

    #[tokio::test]
    async fn throttle_selected_converges_on_slow_mode() {
        let remote = FakeRemote::with(&[(1, TorrentStatus::Downloading)]);
        let mut coordinator = BulkOperationCoordinator::new(Some(100));
        coordinator.refresh(&remote).await.unwrap();

        let outcome = coordinator.throttle_selected(&remote, &[1], true).await;

        assert_eq!(outcome, Outcome::Dispatched);
        assert!(!coordinator.flags().throttle);
        assert!(coordinator.latest_snapshot().unwrap().get(1).unwrap().slow_mode);
    }

    #[tokio::test]
    async fn remove_continues_past_failures_and_refreshes() {
        let mut remote = FakeRemote::with(&[
            (1, TorrentStatus::Stopped),
            (2, TorrentStatus::Seeding),
            (3, TorrentStatus::Downloading),
        ]);
        remote.failing.insert(2);
        let mut coordinator = BulkOperationCoordinator::new(None);
        coordinator.refresh(&remote).await.unwrap();
        let polls_before = *remote.list_calls.lock().unwrap();

        let outcome = coordinator.remove_selected(&remote, &[1, 2, 3], false).await;

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(
            remote.calls(),
            vec![
                (ActionClass::Remove, vec![1]),
                (ActionClass::Remove, vec![2]),
                (ActionClass::Remove, vec![3]),
            ]
        );
        assert_eq!(*remote.list_calls.lock().unwrap(), polls_before + 1);
        assert!(!coordinator.flags().remove);

        let error = coordinator.last_error().unwrap();
        assert!(error.contains("Failed to remove 1 of 3 torrents"));
        let latest = coordinator.latest_snapshot().unwrap();
        assert!(!latest.contains(1));
        assert!(latest.contains(2));
        assert!(!latest.contains(3));
    }

    #[tokio::test]
    async fn verify_tracks_checking_status() {
        let remote = FakeRemote::with(&[(1, TorrentStatus::Seeding)]);
        let mut coordinator = BulkOperationCoordinator::new(None);
        coordinator.refresh(&remote).await.unwrap();

        assert_eq!(coordinator.verify(&remote, 1).await, Outcome::Dispatched);
        assert!(coordinator.is_verifying(1));
        assert_eq!(
            coordinator.verify(&remote, 1).await,
            Outcome::Rejected(Rejection::VerifyInProgress(1))
        );

        remote.torrents.lock().unwrap()[0].status = TorrentStatus::Seeding;
        coordinator.refresh(&remote).await.unwrap();
        assert!(!coordinator.is_verify_pending(1));
    }
}

use serde::Serialize;
use tracing::debug;

use super::intent::{ActionClass, Intent};
use super::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentPhase {
    Issued,
    Converging,
    Satisfied,
    /// Superseded: the targets left the state the action applies to, or vanished.
    Moot,
    Abandoned,
}

impl IntentPhase {
    pub fn is_terminal(&self) -> bool {
        match self {
            IntentPhase::Issued | IntentPhase::Converging => false,
            IntentPhase::Satisfied | IntentPhase::Moot | IntentPhase::Abandoned => true,
        }
    }
}

/// Tracks one intent until snapshots show it took effect.
#[derive(Debug, Clone)]
pub struct OperationReconciler {
    intent: Intent,
    phase: IntentPhase,
}

impl OperationReconciler {
    pub fn new(intent: Intent, issuing: &Snapshot) -> Self {
        let phase = match evaluate(&intent, issuing) {
            Some(resolved) => resolved,
            None => IntentPhase::Issued,
        };
        Self { intent, phase }
    }

    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    pub fn class(&self) -> ActionClass {
        self.intent.class()
    }

    pub fn phase(&self) -> IntentPhase {
        self.phase
    }

    pub fn in_flight(&self) -> bool {
        !self.phase.is_terminal()
    }

    /// The remote call returned success.
    pub fn acknowledge(&mut self) {
        if self.phase == IntentPhase::Issued {
            self.phase = IntentPhase::Converging;
        }
    }

    /// The remote call failed; the intent will never converge.
    pub fn fail(&mut self) {
        if self.phase == IntentPhase::Issued {
            self.phase = IntentPhase::Abandoned;
        }
    }

    pub fn observe(&mut self, snapshot: &Snapshot) -> IntentPhase {
        if self.phase != IntentPhase::Converging {
            return self.phase;
        }
        if snapshot.sequence() <= self.intent.issued_at() {
            debug!(
                sequence = snapshot.sequence(),
                issued_at = self.intent.issued_at(),
                "Ignoring snapshot taken before dispatch"
            );
            return self.phase;
        }
        if let Some(resolved) = evaluate(&self.intent, snapshot) {
            self.phase = resolved;
        }
        self.phase
    }
}

/// `None` while the intent still has work to observe.
fn evaluate(intent: &Intent, snapshot: &Snapshot) -> Option<IntentPhase> {
    let action = intent.action();
    let mut present = 0usize;
    let mut satisfied = true;
    let mut applicable = false;

    for id in intent.target_ids() {
        let (Some(baseline), Some(current)) = (intent.baseline(*id), snapshot.state(*id)) else {
            continue;
        };
        present += 1;

        let reached =
            action.is_target(baseline) || (current != baseline && action.is_target(current));
        if !reached {
            satisfied = false;
            applicable |= action.is_applicable(current);
        }
    }

    if present == 0 {
        Some(IntentPhase::Moot)
    } else if satisfied {
        Some(IntentPhase::Satisfied)
    } else if !applicable {
        Some(IntentPhase::Moot)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::Action;
    use crate::transmission_client::{Torrent, TorrentStatus};

    fn snapshot(sequence: u64, items: &[(i64, TorrentStatus)]) -> Snapshot {
        Snapshot::new(
            sequence,
            items
                .iter()
                .map(|(id, status)| Torrent::new(*id, "t", *status))
                .collect(),
        )
    }

    fn issued(action: Action, ids: &[i64], snap: &Snapshot) -> OperationReconciler {
        let intent = Intent::new(action, ids.iter().copied(), snap).unwrap();
        OperationReconciler::new(intent, snap)
    }

    #[test]
    fn already_satisfied_targets_resolve_at_issue() {
        let snap = snapshot(1, &[(1, TorrentStatus::Seeding), (2, TorrentStatus::Downloading)]);
        let reconciler = issued(Action::Start, &[1, 2], &snap);
        assert_eq!(reconciler.phase(), IntentPhase::Satisfied);
        assert!(!reconciler.in_flight());
    }

    #[test]
    fn inapplicable_targets_are_moot_at_issue() {
        let snap = snapshot(1, &[(1, TorrentStatus::Queued)]);
        let reconciler = issued(Action::Start, &[1], &snap);
        assert_eq!(reconciler.phase(), IntentPhase::Moot);
    }

    #[test]
    fn unchanged_polls_keep_converging() {
        let first = snapshot(1, &[(1, TorrentStatus::Stopped)]);
        let mut reconciler = issued(Action::Start, &[1], &first);
        assert_eq!(reconciler.phase(), IntentPhase::Issued);
        reconciler.acknowledge();

        for sequence in 2..12 {
            let phase = reconciler.observe(&snapshot(sequence, &[(1, TorrentStatus::Stopped)]));
            assert_eq!(phase, IntentPhase::Converging);
        }
        assert!(reconciler.in_flight());
    }

    #[test]
    fn snapshots_from_before_dispatch_are_ignored() {
        let issuing = snapshot(5, &[(1, TorrentStatus::Stopped)]);
        let mut reconciler = issued(Action::Start, &[1], &issuing);
        reconciler.acknowledge();

        let early = snapshot(5, &[(1, TorrentStatus::Downloading)]);
        assert_eq!(reconciler.observe(&early), IntentPhase::Converging);

        let later = snapshot(6, &[(1, TorrentStatus::Downloading)]);
        assert_eq!(reconciler.observe(&later), IntentPhase::Satisfied);
    }

    #[test]
    fn observation_waits_for_acknowledge() {
        let issuing = snapshot(1, &[(1, TorrentStatus::Seeding)]);
        let mut reconciler = issued(Action::Stop, &[1], &issuing);
        let phase = reconciler.observe(&snapshot(2, &[(1, TorrentStatus::Stopped)]));
        assert_eq!(phase, IntentPhase::Issued);
    }

    #[test]
    fn failure_abandons_the_intent() {
        let issuing = snapshot(1, &[(1, TorrentStatus::Seeding)]);
        let mut reconciler = issued(Action::Stop, &[1], &issuing);
        reconciler.fail();
        assert_eq!(reconciler.phase(), IntentPhase::Abandoned);
        assert!(!reconciler.in_flight());
    }

    #[test]
    fn vanished_targets_count_as_resolved() {
        let issuing = snapshot(1, &[(1, TorrentStatus::Stopped), (2, TorrentStatus::Stopped)]);
        let mut reconciler = issued(Action::Start, &[1, 2], &issuing);
        reconciler.acknowledge();

        let phase = reconciler.observe(&snapshot(2, &[(1, TorrentStatus::Downloading)]));
        assert_eq!(phase, IntentPhase::Satisfied);
    }

    #[test]
    fn all_targets_vanishing_is_moot() {
        let issuing = snapshot(1, &[(1, TorrentStatus::Stopped)]);
        let mut reconciler = issued(Action::Start, &[1], &issuing);
        reconciler.acknowledge();
        assert_eq!(reconciler.observe(&snapshot(2, &[])), IntentPhase::Moot);
    }

    #[test]
    fn superseded_state_is_moot() {
        let issuing = snapshot(1, &[(1, TorrentStatus::Seeding)]);
        let mut reconciler = issued(Action::Stop, &[1], &issuing);
        reconciler.acknowledge();
        let phase = reconciler.observe(&snapshot(2, &[(1, TorrentStatus::Checking)]));
        assert_eq!(phase, IntentPhase::Moot);
    }

    #[test]
    fn throttle_converges_on_slow_mode() {
        let issuing = snapshot(1, &[(1, TorrentStatus::Downloading)]);
        let action = Action::Throttle {
            slow: true,
            limit_kib: 50,
        };
        let mut reconciler = issued(action, &[1], &issuing);
        reconciler.acknowledge();
        assert_eq!(
            reconciler.observe(&snapshot(2, &[(1, TorrentStatus::Downloading)])),
            IntentPhase::Converging
        );

        let mut slowed = Torrent::new(1, "t", TorrentStatus::Downloading);
        slowed.slow_mode = true;
        let phase = reconciler.observe(&Snapshot::new(3, vec![slowed]));
        assert_eq!(phase, IntentPhase::Satisfied);
    }
}

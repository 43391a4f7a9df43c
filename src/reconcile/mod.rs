//! Tracks user commands against polled torrent snapshots until they take effect.

mod coordinator;
mod intent;
mod reconciler;
mod scheduler;
mod snapshot;
mod verify;

pub use coordinator::{
    BulkFlags, BulkOperationCoordinator, BulkRequest, Dispatch, Outcome, Rejection, RemoveReport,
    Ticket,
};
pub use intent::{Action, ActionClass, Intent, ItemState};
pub use reconciler::{IntentPhase, OperationReconciler};
pub use scheduler::{ConnectionMode, PollScheduler};
pub use snapshot::{Snapshot, SnapshotStore};
pub use verify::VerifyTracker;

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::reconcile::{BulkFlags, BulkOperationCoordinator, ConnectionMode, Outcome, PollScheduler};
use crate::remote::RemoteService;
use crate::transmission_client::{format_bytes, TransmissionClient};
use crate::types::ClientError;

/// Drives polling against a remote and feeds snapshots to the coordinator.
pub struct Monitor<R> {
    remote: R,
    coordinator: BulkOperationCoordinator,
    scheduler: PollScheduler,
    reconnect_delay: Duration,
    last_flags: BulkFlags,
}

impl Monitor<TransmissionClient> {
    pub async fn connect(config: &Config) -> Result<Self, ClientError> {
        let client = TransmissionClient::discover(config).await?;
        match client.session_stats().await {
            Ok(stats) => info!(
                version = %stats.transmission_version,
                free_space = %format_bytes(stats.free_space),
                download = %format!("{}/s", format_bytes(stats.total_download_speed)),
                upload = %format!("{}/s", format_bytes(stats.total_upload_speed)),
                "Session stats"
            ),
            Err(err) => warn!(error = %err, "Failed to fetch session stats"),
        }
        Ok(Self::with_remote(client, config))
    }
}

impl<R: RemoteService> Monitor<R> {
    pub fn with_remote(remote: R, config: &Config) -> Self {
        Self {
            remote,
            coordinator: BulkOperationCoordinator::new(config.slow_limit_kib()),
            scheduler: PollScheduler::new(config.poll_interval(), config.reconnect_attempts),
            reconnect_delay: config.reconnect_delay(),
            last_flags: BulkFlags::default(),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn coordinator(&self) -> &BulkOperationCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut BulkOperationCoordinator {
        &mut self.coordinator
    }

    pub fn connection(&self) -> ConnectionMode {
        self.scheduler.mode()
    }

    pub async fn poll_once(&mut self) -> Result<(), ClientError> {
        self.coordinator.refresh(&self.remote).await?;
        let flags = self.coordinator.flags();
        if flags != self.last_flags {
            info!(?flags, "Operation state changed");
            self.last_flags = flags;
        }
        if let Some(snapshot) = self.coordinator.latest_snapshot() {
            debug!(
                sequence = snapshot.sequence(),
                torrents = snapshot.len(),
                "Polled torrents"
            );
        }
        Ok(())
    }

    pub async fn start_selected(&mut self, selection: &[i64]) -> Outcome {
        self.coordinator.start_selected(&self.remote, selection).await
    }

    pub async fn stop_selected(&mut self, selection: &[i64]) -> Outcome {
        self.coordinator.stop_selected(&self.remote, selection).await
    }

    pub async fn throttle_selected(&mut self, selection: &[i64], slow: bool) -> Outcome {
        self.coordinator
            .throttle_selected(&self.remote, selection, slow)
            .await
    }

    pub async fn remove_selected(&mut self, selection: &[i64], delete_data: bool) -> Outcome {
        self.coordinator
            .remove_selected(&self.remote, selection, delete_data)
            .await
    }

    pub async fn verify(&mut self, id: i64) -> Outcome {
        self.coordinator.verify(&self.remote, id).await
    }

    /// Poll until `shutdown` resolves or reconnecting gives up.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<(), ClientError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        self.scheduler.start();
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    self.scheduler.stop();
                    return Ok(());
                }
                result = self.step() => result?,
            }
        }
    }

    async fn step(&mut self) -> Result<(), ClientError> {
        if !self.scheduler.tick().await {
            return self.reconnect().await;
        }
        match self.poll_once().await {
            Ok(()) => Ok(()),
            Err(err) if err.is_transport() => {
                warn!(error = %err, "Lost connection to Transmission");
                self.scheduler.suspend();
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Poll failed");
                Ok(())
            }
        }
    }

    async fn reconnect(&mut self) -> Result<(), ClientError> {
        while let Some(attempt) = self.scheduler.next_attempt() {
            tokio::time::sleep(self.reconnect_delay).await;
            match self.poll_once().await {
                Ok(()) => {
                    info!(attempt, "Reconnected to Transmission");
                    self.scheduler.resume();
                    return Ok(());
                }
                Err(err) => warn!(attempt, error = %err, "Reconnect attempt failed"),
            }
        }
        Err(ClientError::Disconnected(self.scheduler.max_attempts()))
    }
}

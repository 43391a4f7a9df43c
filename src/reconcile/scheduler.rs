use std::time::Duration;

use serde::Serialize;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionMode {
    Connected,
    Reconnecting { attempt: u32 },
    Disconnected,
}

/// Owns the poll timer. The timer only exists while connected.
#[derive(Debug)]
pub struct PollScheduler {
    period: Duration,
    max_attempts: u32,
    timer: Option<Interval>,
    mode: ConnectionMode,
}

impl PollScheduler {
    pub fn new(period: Duration, max_attempts: u32) -> Self {
        Self {
            period,
            max_attempts,
            timer: None,
            mode: ConnectionMode::Disconnected,
        }
    }

    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn is_polling(&self) -> bool {
        self.timer.is_some()
    }

    /// Begin polling. The first tick fires immediately.
    pub fn start(&mut self) {
        let mut timer = interval(self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.timer = Some(timer);
        self.mode = ConnectionMode::Connected;
        info!(period_secs = self.period.as_secs_f64(), "Polling started");
    }

    pub fn resume(&mut self) {
        self.start();
    }

    /// Drop the timer while the connection is re-established.
    pub fn suspend(&mut self) {
        if self.timer.take().is_some() {
            debug!("Polling suspended");
        }
        self.mode = ConnectionMode::Reconnecting { attempt: 0 };
    }

    pub fn stop(&mut self) {
        self.timer = None;
        self.mode = ConnectionMode::Disconnected;
        info!("Polling stopped");
    }

    /// Claim the next reconnect attempt number, or `None` once they are used
    /// up, which leaves the scheduler disconnected.
    pub fn next_attempt(&mut self) -> Option<u32> {
        let attempt = match self.mode {
            ConnectionMode::Reconnecting { attempt } => attempt + 1,
            ConnectionMode::Connected | ConnectionMode::Disconnected => return None,
        };
        if attempt > self.max_attempts {
            warn!(attempts = self.max_attempts, "Reconnect attempts exhausted");
            self.stop();
            return None;
        }
        self.mode = ConnectionMode::Reconnecting { attempt };
        Some(attempt)
    }

    /// Wait for the next poll. Returns false without waiting when not polling.
    pub async fn tick(&mut self) -> bool {
        match self.timer.as_mut() {
            Some(timer) => {
                timer.tick().await;
                true
            }
            None => false,
        }
    }
}

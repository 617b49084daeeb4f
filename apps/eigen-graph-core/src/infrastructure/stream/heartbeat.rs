//! Heartbeat Idle Timer
//!
//! Tracks connection liveness as message arrival. The stream endpoint
//! sends no explicit pings; a connection that stays silent past the
//! timeout is considered dead and is closed so the reconnect path can
//! take over. Every inbound frame, valid or not, feeds the timer.

use std::time::Duration;

use tokio::time::Instant;

/// Deadline-based idle timer for a single connection.
#[derive(Debug)]
pub struct IdleTimeout {
    timeout: Duration,
    deadline: Instant,
}

impl IdleTimeout {
    /// Start a timer for a fresh connection.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            deadline: Instant::now() + timeout,
        }
    }

    /// Push the deadline out; called on every inbound frame.
    pub fn reset(&mut self) {
        self.deadline = Instant::now() + self.timeout;
    }

    /// Instant at which the connection is considered dead.
    #[must_use]
    pub const fn deadline(&self) -> Instant {
        self.deadline
    }
}

//! Live Price Streaming Types
//!
//! Core domain types for the live price stream: the delivered point, the
//! consumer-visible connection status, and the bounded point buffer with
//! batch-coalesced, drop-oldest delivery.

use std::collections::VecDeque;
use std::fmt;

/// Default bound on the consumer-visible point sequence.
pub const DEFAULT_MAX_POINTS: usize = 3000;

/// One accepted price observation.
///
/// Within one subscription's lifetime the delivered sequence is strictly
/// increasing in `timestamp_millis`; out-of-order and duplicate
/// timestamps are dropped before a point is ever constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamPoint {
    /// Observation time, milliseconds since the Unix epoch.
    pub timestamp_millis: i64,
    /// Observed price.
    pub price: f64,
}

/// Consumer-visible status of a live price stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiveStatus {
    /// Not yet activated.
    #[default]
    Idle,
    /// A connection attempt is in flight (or scheduled after backoff).
    Connecting,
    /// At least one valid in-order message has arrived on the current
    /// connection.
    Live,
    /// The transport failed; a reconnect is pending.
    Error,
    /// No stream exists for the current selection (symbol unset).
    Unavailable,
}

impl LiveStatus {
    /// Status name as rendered by the status indicator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Live => "live",
            Self::Error => "error",
            Self::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for LiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounded point sequence with drop-oldest eviction.
///
/// Accepted points accumulate in a pending batch elsewhere and arrive
/// here one batch per flush tick; eviction happens on flush, so the
/// buffer always holds the most recent `max_points` in arrival order.
#[derive(Debug)]
pub struct PointBuffer {
    points: VecDeque<StreamPoint>,
    max_points: usize,
}

impl PointBuffer {
    /// Create an empty buffer capped at `max_points` (clamped to 1).
    #[must_use]
    pub fn new(max_points: usize) -> Self {
        Self {
            points: VecDeque::new(),
            max_points: max_points.max(1),
        }
    }

    /// Append a flushed batch, evicting the oldest points past the cap.
    ///
    /// Eviction never reorders the remaining points.
    pub fn extend_batch(&mut self, batch: impl IntoIterator<Item = StreamPoint>) {
        self.points.extend(batch);
        while self.points.len() > self.max_points {
            self.points.pop_front();
        }
    }

    /// Drop all points (new activation).
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Number of buffered points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the buffer holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Copy of the current sequence, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<StreamPoint> {
        self.points.iter().copied().collect()
    }
}

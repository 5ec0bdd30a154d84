//! Outstanding-message limiter and throughput sampling.
//!
//! The limiter is a bucket of capacity `mps`: every submit takes a token and
//! every transport poll refills it with the messages the broker acknowledged
//! since the last poll. Waiting is left to the caller, so the limiter itself
//! is a plain state machine.

use tokio::time::Instant;

/// Tracks the outstanding-message estimate against a fixed ceiling.
#[derive(Debug, Clone)]
pub struct OutstandingLimiter {
    capacity: usize,
    outstanding: usize,
}

impl OutstandingLimiter {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            outstanding: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Count one more potentially unacknowledged message.
    pub fn record_submit(&mut self) {
        self.outstanding += 1;
    }

    /// Submission must pause until a poll brings the count below capacity.
    pub fn is_saturated(&self) -> bool {
        self.outstanding >= self.capacity
    }

    /// Replace the estimate with the count the transport reported, returning
    /// how many messages drained since the previous observation.
    pub fn refill(&mut self, observed: usize) -> usize {
        let drained = self.outstanding.saturating_sub(observed);
        self.outstanding = observed;
        drained
    }
}

/// Measures delivery throughput over windows that restart on every sample.
#[derive(Debug)]
pub struct ThroughputWindow {
    started: Instant,
}

impl ThroughputWindow {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Messages per second since the window started, then restart the window.
    pub fn sample(&mut self, sent: usize) -> f64 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.started).as_secs_f64();
        self.started = now;
        if elapsed > 0.0 {
            sent as f64 / elapsed
        } else {
            0.0
        }
    }
}

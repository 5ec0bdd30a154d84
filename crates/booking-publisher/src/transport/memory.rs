//! Deterministic in-memory transport.

use super::PublisherTransport;
use crate::error::{SubmitError, TransportError};
use async_trait::async_trait;
use std::time::Duration;

/// A message accepted by [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub key: Option<Vec<u8>>,
    pub payload: Vec<u8>,
}

/// Transport that keeps every accepted message in memory.
///
/// Accepted messages stay outstanding until a poll or flush acknowledges
/// them. By default a poll acknowledges everything; [`with_drain_per_poll`]
/// makes the broker slower, and [`with_queue_capacity`] makes submits fail
/// with `QueueFull` while too many messages are outstanding.
///
/// [`with_drain_per_poll`]: MemoryTransport::with_drain_per_poll
/// [`with_queue_capacity`]: MemoryTransport::with_queue_capacity
#[derive(Debug, Default)]
pub struct MemoryTransport {
    messages: Vec<PublishedMessage>,
    outstanding: usize,
    drain_per_poll: Option<usize>,
    queue_capacity: Option<usize>,
    fail_at_submit: Option<usize>,
    submit_attempts: usize,
    queue_full_rejections: usize,
    poll_calls: usize,
    flush_calls: usize,
    max_outstanding: usize,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acknowledge at most `n` messages per poll.
    pub fn with_drain_per_poll(mut self, n: usize) -> Self {
        self.drain_per_poll = Some(n);
        self
    }

    /// Reject submits while `capacity` messages are outstanding.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    /// Fail the `n`th submit attempt (1-based) with a fatal error.
    pub fn with_fatal_error_at_submit(mut self, n: usize) -> Self {
        self.fail_at_submit = Some(n);
        self
    }

    pub fn messages(&self) -> &[PublishedMessage] {
        &self.messages
    }

    /// Number of accepted submits.
    pub fn submit_count(&self) -> usize {
        self.messages.len()
    }

    pub fn queue_full_rejections(&self) -> usize {
        self.queue_full_rejections
    }

    pub fn poll_calls(&self) -> usize {
        self.poll_calls
    }

    pub fn flush_calls(&self) -> usize {
        self.flush_calls
    }

    /// Highest outstanding count ever reached right after a submit.
    pub fn max_outstanding(&self) -> usize {
        self.max_outstanding
    }

    fn acknowledge(&mut self, limit: Option<usize>) {
        let n = limit.map_or(self.outstanding, |l| l.min(self.outstanding));
        self.outstanding -= n;
    }
}

#[async_trait]
impl PublisherTransport for MemoryTransport {
    fn submit(
        &mut self,
        topic: &str,
        key: Option<&[u8]>,
        payload: &[u8],
    ) -> Result<(), SubmitError> {
        self.submit_attempts += 1;
        if self.fail_at_submit == Some(self.submit_attempts) {
            return Err(SubmitError::Fatal(TransportError::Fatal(
                "broker connection lost".to_string(),
            )));
        }
        if let Some(capacity) = self.queue_capacity {
            if self.outstanding >= capacity {
                self.queue_full_rejections += 1;
                return Err(SubmitError::QueueFull);
            }
        }

        self.messages.push(PublishedMessage {
            topic: topic.to_string(),
            key: key.map(<[u8]>::to_vec),
            payload: payload.to_vec(),
        });
        self.outstanding += 1;
        self.max_outstanding = self.max_outstanding.max(self.outstanding);
        Ok(())
    }

    async fn poll(&mut self, _timeout: Duration) -> Result<usize, TransportError> {
        self.poll_calls += 1;
        self.acknowledge(self.drain_per_poll);
        Ok(self.outstanding)
    }

    async fn flush(&mut self, _timeout: Duration) -> Result<usize, TransportError> {
        self.flush_calls += 1;
        self.acknowledge(None);
        Ok(self.outstanding)
    }

    fn outstanding(&self) -> usize {
        self.outstanding
    }
}

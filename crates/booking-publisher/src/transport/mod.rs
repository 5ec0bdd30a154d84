//! Broker transports the publisher can drive.

mod kafka;
mod memory;

pub use kafka::KafkaTransport;
pub use memory::{MemoryTransport, PublishedMessage};

use crate::error::{SubmitError, TransportError};
use async_trait::async_trait;
use std::time::Duration;

/// The capabilities the publisher needs from a message broker client.
///
/// Submission only enqueues; delivery happens in the background and is
/// visible to the publisher solely through the outstanding count.
#[async_trait]
pub trait PublisherTransport: Send {
    /// Enqueue one message. Returns [`SubmitError::QueueFull`] when the
    /// transport's local queue has no room.
    fn submit(&mut self, topic: &str, key: Option<&[u8]>, payload: &[u8])
        -> Result<(), SubmitError>;

    /// Let the transport drain for at most `timeout` and report how many
    /// messages are still unacknowledged.
    async fn poll(&mut self, timeout: Duration) -> Result<usize, TransportError>;

    /// Wait up to `timeout` for every outstanding message to be acknowledged,
    /// returning the number still outstanding.
    async fn flush(&mut self, timeout: Duration) -> Result<usize, TransportError>;

    /// Last known number of unacknowledged messages, without waiting.
    fn outstanding(&self) -> usize;
}

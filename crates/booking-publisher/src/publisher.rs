//! Rate-controlled publishing loop.
//!
//! Each batch is generated up front, then every event is encoded and
//! submitted. After each submit the outstanding estimate is compared with
//! the `mps` ceiling; at the ceiling the loop sleeps, polls the transport and
//! logs the delivery rate until the estimate drops below it again.
//!
//! The check runs after the submit, so the outstanding count can touch the
//! ceiling but the next submit only happens once a poll reports less. New
//! acknowledgements that arrive between polls are not seen until the next
//! poll, so the bound is an approximation, not a real-time guarantee.

use crate::config::PublisherConfig;
use crate::error::{ConfigurationError, PublisherError, SubmitError};
use crate::throttle::{OutstandingLimiter, ThroughputWindow};
use crate::transport::PublisherTransport;
use booking_generator::EventGenerator;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Metrics from a publish run.
#[derive(Debug, Clone, Default)]
pub struct PublishMetrics {
    /// Messages accepted by the transport.
    pub messages_submitted: u64,
    /// Batches fully submitted and flushed.
    pub batches_completed: u64,
    /// Sleep-and-poll rounds spent at the ceiling.
    pub throttle_polls: u64,
    /// End-of-batch flushes.
    pub full_flushes: u64,
    /// Submits retried because the transport queue was full.
    pub queue_full_retries: u64,
    /// Messages still outstanding after the last flush.
    pub remaining_after_flush: usize,
    /// Total time taken.
    pub total_duration: Duration,
}

impl PublishMetrics {
    /// Calculate messages per second.
    pub fn messages_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.messages_submitted as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// State of one run. Created when the run starts and dropped when it ends.
struct PublishSession {
    limiter: OutstandingLimiter,
    window: ThroughputWindow,
    metrics: PublishMetrics,
}

/// Publishes generated booking events through a [`PublisherTransport`].
///
/// # Example
///
/// ```ignore
/// let config = PublisherConfig::from_args(&args)?;
/// let transport = KafkaTransport::connect(&config.broker).await?;
/// let mut publisher = Publisher::new(config, transport)?;
/// let metrics = publisher.run().await?;
/// ```
pub struct Publisher<T: PublisherTransport> {
    config: PublisherConfig,
    transport: T,
    generator: EventGenerator,
}

impl<T: PublisherTransport> Publisher<T> {
    /// Create a publisher, rejecting an invalid configuration.
    pub fn new(config: PublisherConfig, transport: T) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let generator = match config.seed {
            Some(seed) => EventGenerator::new(seed),
            None => EventGenerator::from_entropy(),
        }
        .with_utc(config.utc);

        Ok(Self {
            config,
            transport,
            generator,
        })
    }

    /// Replace the event generator (e.g. with a fixed seed).
    pub fn with_generator(mut self, generator: EventGenerator) -> Self {
        self.generator = generator.with_utc(self.config.utc);
        self
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Publish `repeat` batches of `sample` events.
    pub async fn run(&mut self) -> Result<PublishMetrics, PublisherError> {
        let start_time = Instant::now();
        let mut session = PublishSession {
            limiter: OutstandingLimiter::new(self.config.mps),
            window: ThroughputWindow::start(),
            metrics: PublishMetrics::default(),
        };

        info!(
            "Publishing {} x {} events to topic '{}' (mps: {}, sleep: {:?})",
            self.config.repeat,
            self.config.sample,
            self.config.topic,
            self.config.mps,
            self.config.sleep
        );

        for iteration in 1..=self.config.repeat {
            self.publish_batch(&mut session).await?;

            let remaining = self.transport.flush(self.config.flush_timeout).await?;
            session.limiter.refill(remaining);
            session.metrics.full_flushes += 1;
            session.metrics.remaining_after_flush = remaining;
            if remaining > 0 {
                warn!(
                    "{} messages still outstanding after flushing for {:?}",
                    remaining, self.config.flush_timeout
                );
            }

            if !self.config.sleep.is_zero() {
                tokio::time::sleep(self.config.sleep).await;
            }

            session.metrics.batches_completed += 1;
            info!(
                "{} sent! {} of {}",
                self.config.sample, iteration, self.config.repeat
            );
        }

        let mut metrics = session.metrics;
        metrics.total_duration = start_time.elapsed();

        info!(
            "Publishing complete: {} messages in {:?} ({:.2} msg/sec)",
            metrics.messages_submitted,
            metrics.total_duration,
            metrics.messages_per_second()
        );

        Ok(metrics)
    }

    async fn publish_batch(&mut self, session: &mut PublishSession) -> Result<(), PublisherError> {
        let sample = self.config.sample;
        let batch = self.generator.generate_batch(sample);

        for (i, record) in batch.iter().enumerate() {
            let payload = record.to_json_bytes()?;
            let key = self.config.key.key_for(record);

            self.submit(session, key.as_deref().map(str::as_bytes), &payload)
                .await?;
            session.limiter.record_submit();
            session.metrics.messages_submitted += 1;

            while session.limiter.is_saturated() {
                tokio::time::sleep(self.config.sleep).await;
                let observed = self.transport.poll(self.config.poll_timeout).await?;
                let sent = session.limiter.refill(observed);
                let rate = session.window.sample(sent);
                session.metrics.throttle_polls += 1;
                info!(
                    "Uploading rate: {} messages/second. {} of {}",
                    rate as u64,
                    i + 1,
                    sample
                );
            }
        }
        Ok(())
    }

    /// Submit one message, waiting out a full transport queue.
    async fn submit(
        &mut self,
        session: &mut PublishSession,
        key: Option<&[u8]>,
        payload: &[u8],
    ) -> Result<(), PublisherError> {
        loop {
            match self.transport.submit(&self.config.topic, key, payload) {
                Ok(()) => return Ok(()),
                Err(SubmitError::QueueFull) => {
                    session.metrics.queue_full_retries += 1;
                    debug!(
                        "Transport queue full, retrying in {:?}",
                        self.config.queue_full_backoff
                    );
                    tokio::time::sleep(self.config.queue_full_backoff).await;
                    let observed = self
                        .transport
                        .poll(self.config.queue_full_backoff)
                        .await?;
                    session.limiter.refill(observed);
                }
                Err(SubmitError::Fatal(err)) => return Err(err.into()),
            }
        }
    }
}

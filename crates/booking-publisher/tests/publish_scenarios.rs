//! End-to-end publish runs against the in-memory transport.
//!
//! All tests run on a paused tokio clock, so throttle sleeps complete
//! instantly while keeping their ordering.

use booking_generator::EventRecord;
use booking_publisher::{
    BrokerConfig, ConfigurationError, Credentials, MemoryTransport, MessageKey, Publisher,
    PublisherConfig, PublisherError, PublisherTransport, SecurityProtocol, TransportError,
};
use std::collections::HashSet;
use std::time::Duration;

fn config(sample: usize, mps: usize, repeat: usize) -> PublisherConfig {
    let mut config = PublisherConfig::new("bookings_topic", BrokerConfig::plaintext("mem:9092"));
    config.sample = sample;
    config.mps = mps;
    config.repeat = repeat;
    config.sleep = Duration::from_secs(1);
    config.seed = Some(7);
    config
}

#[tokio::test(start_paused = true)]
async fn test_single_batch_hits_ceiling_twice() -> anyhow::Result<()> {
    let mut publisher = Publisher::new(config(5, 2, 1), MemoryTransport::new())?;
    let metrics = publisher.run().await?;

    let transport = publisher.transport();
    assert_eq!(transport.submit_count(), 5);
    assert!(transport.poll_calls() >= 2, "polls: {}", transport.poll_calls());
    assert_eq!(transport.flush_calls(), 1);
    assert_eq!(transport.outstanding(), 0);
    assert_eq!(metrics.messages_submitted, 5);
    assert_eq!(metrics.remaining_after_flush, 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_one_flush_per_batch() -> anyhow::Result<()> {
    let mut publisher = Publisher::new(config(3, 200, 2), MemoryTransport::new())?;
    let metrics = publisher.run().await?;

    assert_eq!(publisher.transport().submit_count(), 6);
    assert_eq!(publisher.transport().flush_calls(), 2);
    assert_eq!(metrics.full_flushes, 2);
    assert_eq!(metrics.batches_completed, 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_outstanding_never_exceeds_ceiling() -> anyhow::Result<()> {
    // A slow broker: each poll acknowledges a single message.
    let transport = MemoryTransport::new().with_drain_per_poll(1);
    let mut publisher = Publisher::new(config(40, 3, 1), transport)?;
    let metrics = publisher.run().await?;

    let transport = publisher.transport();
    assert_eq!(transport.submit_count(), 40);
    assert_eq!(transport.max_outstanding(), 3);
    assert!(metrics.throttle_polls >= 37);
    assert_eq!(transport.outstanding(), 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_queue_full_is_retried_not_dropped() -> anyhow::Result<()> {
    let transport = MemoryTransport::new()
        .with_queue_capacity(2)
        .with_drain_per_poll(1);
    let mut publisher = Publisher::new(config(10, 50, 1), transport)?;
    let metrics = publisher.run().await?;

    let transport = publisher.transport();
    assert_eq!(transport.submit_count(), 10);
    assert!(transport.queue_full_rejections() > 0);
    assert_eq!(
        metrics.queue_full_retries,
        transport.queue_full_rejections() as u64
    );

    let ids: HashSet<_> = transport
        .messages()
        .iter()
        .map(|m| serde_json::from_slice::<EventRecord>(&m.payload).map(|r| r.event_id))
        .collect::<Result<_, _>>()?;
    assert_eq!(ids.len(), 10);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_fatal_transport_error_aborts_run() {
    let transport = MemoryTransport::new().with_fatal_error_at_submit(3);
    let mut publisher = Publisher::new(config(10, 50, 2), transport).unwrap();

    let result = publisher.run().await;

    assert!(matches!(
        result,
        Err(PublisherError::Transport(TransportError::Fatal(_)))
    ));
    assert_eq!(publisher.transport().submit_count(), 2);
    assert_eq!(publisher.transport().flush_calls(), 0);
}

#[test]
fn test_missing_credentials_rejected_before_publishing() {
    let mut broker = BrokerConfig::plaintext("broker:9092");
    broker.security_protocol = SecurityProtocol::SaslSsl;
    let err = Publisher::new(config_with(broker), MemoryTransport::new()).err();

    assert!(matches!(
        err,
        Some(ConfigurationError::MissingCredentials {
            protocol: "SASL_SSL"
        })
    ));
}

#[test]
fn test_credentials_accepted_for_sasl() {
    let mut broker = BrokerConfig::plaintext("broker:9092");
    broker.security_protocol = SecurityProtocol::SaslPlaintext;
    broker.credentials = Some(Credentials {
        username: "user".to_string(),
        password: "secret".to_string(),
    });

    assert!(Publisher::new(config_with(broker), MemoryTransport::new()).is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_payloads_and_keys() -> anyhow::Result<()> {
    let mut config = config(4, 200, 1);
    config.key = MessageKey::EventId;
    let mut publisher = Publisher::new(config, MemoryTransport::new())?;
    publisher.run().await?;

    for message in publisher.transport().messages() {
        assert_eq!(message.topic, "bookings_topic");

        let record: EventRecord = serde_json::from_slice(&message.payload)?;
        assert!(record.end_datetime > record.start_datetime);
        assert_eq!(
            message.key.as_deref(),
            Some(record.event_id.to_string().as_bytes())
        );

        let text = std::str::from_utf8(&message.payload)?;
        assert!(text.starts_with(r#"{"event_time":""#));
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_seeded_runs_publish_same_categories() -> anyhow::Result<()> {
    let mut first = Publisher::new(config(20, 5, 1), MemoryTransport::new())?;
    let mut second = Publisher::new(config(20, 5, 1), MemoryTransport::new())?;
    first.run().await?;
    second.run().await?;

    let decode = |transport: &MemoryTransport| -> anyhow::Result<Vec<_>> {
        transport
            .messages()
            .iter()
            .map(|m| -> anyhow::Result<_> {
                let r: EventRecord = serde_json::from_slice(&m.payload)?;
                Ok((r.event_type, r.device, r.browser, r.user_id, r.currency))
            })
            .collect()
    };

    assert_eq!(decode(first.transport())?, decode(second.transport())?);
    Ok(())
}

fn config_with(broker: BrokerConfig) -> PublisherConfig {
    let mut config = config(5, 2, 1);
    config.broker = broker;
    config
}

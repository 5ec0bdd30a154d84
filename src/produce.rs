//! Handler for the `produce` command.

use anyhow::Context;
use booking_generator::EventGenerator;
use booking_publisher::{KafkaTransport, ProduceArgs, Publisher, PublisherConfig};

pub async fn run_produce(args: ProduceArgs, dry_run: bool) -> anyhow::Result<()> {
    let config = PublisherConfig::from_args(&args).context("Invalid producer configuration")?;

    if dry_run {
        let mut generator = match config.seed {
            Some(seed) => EventGenerator::new(seed),
            None => EventGenerator::from_entropy(),
        }
        .with_utc(config.utc);
        let sample = generator.next_record().to_json_bytes()?;

        tracing::info!("[DRY-RUN] Configuration validated");
        tracing::info!(
            "[DRY-RUN] Would publish {} x {} events to '{}' at {} ({}, client id '{}')",
            config.repeat,
            config.sample,
            config.topic,
            config.broker.bootstrap_servers,
            config.broker.security_protocol.as_str(),
            config.broker.client_id
        );
        println!("{}", String::from_utf8_lossy(&sample));
        return Ok(());
    }

    tracing::info!(
        "Connecting to Kafka at {} ({})",
        config.broker.bootstrap_servers,
        config.broker.security_protocol.as_str()
    );
    let transport = KafkaTransport::connect(&config.broker)
        .await
        .context("Failed to connect to Kafka")?;

    if let Some(partitions) = args.create_topic_partitions {
        transport
            .create_topic_if_not_exists(&config.topic, partitions)
            .await
            .with_context(|| format!("Failed to create topic '{}'", config.topic))?;
    }

    let mut publisher = Publisher::new(config, transport)?;
    let metrics = publisher
        .run()
        .await
        .context("Publishing booking events failed")?;

    let context = publisher.transport().context();
    tracing::info!(
        "Done: {} submitted, {} delivered, {} failed, {} throttle polls, {} queue-full retries",
        metrics.messages_submitted,
        context.delivered(),
        context.failed(),
        metrics.throttle_polls,
        metrics.queue_full_retries
    );

    Ok(())
}

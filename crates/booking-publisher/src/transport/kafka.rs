//! Kafka transport backed by an rdkafka `ThreadedProducer`.
//!
//! The producer's background thread serves delivery reports, so outstanding
//! counts fall without the publisher polling. `poll` and `flush` block the
//! calling worker thread and therefore need a multi-threaded tokio runtime.

use super::PublisherTransport;
use crate::config::BrokerConfig;
use crate::error::{SubmitError, TransportError};
use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::{ClientContext, DefaultClientContext};
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::producer::{BaseRecord, DeliveryResult, Producer, ProducerContext, ThreadedProducer};
use rdkafka::ClientConfig;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Bound for the metadata request made while connecting.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Producer context that counts delivery reports and remembers the first
/// error the run cannot recover from.
#[derive(Debug, Default)]
pub struct DeliveryContext {
    delivered: AtomicU64,
    failed: AtomicU64,
    fatal: OnceLock<String>,
}

impl DeliveryContext {
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    fn record_fatal(&self, error: &KafkaError, reason: &str) {
        if self.fatal.set(format!("{error}: {reason}")).is_ok() {
            error!("Fatal Kafka error: {error}: {reason}");
        }
    }
}

/// Error codes that mean the broker cannot be reached or will not accept us.
fn is_fatal(error: &KafkaError) -> bool {
    matches!(
        error.rdkafka_error_code(),
        Some(
            RDKafkaErrorCode::Fatal
                | RDKafkaErrorCode::AllBrokersDown
                | RDKafkaErrorCode::Authentication
                | RDKafkaErrorCode::SaslAuthenticationFailed
                | RDKafkaErrorCode::TopicAuthorizationFailed
                | RDKafkaErrorCode::ClusterAuthorizationFailed
        )
    )
}

impl ClientContext for DeliveryContext {
    fn error(&self, error: KafkaError, reason: &str) {
        if is_fatal(&error) {
            self.record_fatal(&error, reason);
        } else {
            warn!("Kafka client error: {error}: {reason}");
        }
    }
}

impl ProducerContext for DeliveryContext {
    type DeliveryOpaque = ();

    fn delivery(&self, delivery_result: &DeliveryResult<'_>, _delivery_opaque: Self::DeliveryOpaque) {
        match delivery_result {
            Ok(_) => {
                self.delivered.fetch_add(1, Ordering::Relaxed);
            }
            Err((err, _)) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                if is_fatal(err) {
                    self.record_fatal(err, "delivery failed");
                } else {
                    debug!("Message delivery failed: {err}");
                }
            }
        }
    }
}

/// [`PublisherTransport`] over a Kafka cluster.
pub struct KafkaTransport {
    producer: ThreadedProducer<DeliveryContext>,
    client_config: ClientConfig,
}

impl KafkaTransport {
    /// Create the producer and confirm the cluster answers a metadata request.
    pub async fn connect(broker: &BrokerConfig) -> Result<Self, TransportError> {
        let client_config = client_config(broker);
        let producer: ThreadedProducer<DeliveryContext> = client_config
            .clone()
            .set("message.timeout.ms", "30000")
            .set("compression.type", &broker.compression)
            .create_with_context(DeliveryContext::default())?;

        let metadata = tokio::task::block_in_place(|| {
            producer.client().fetch_metadata(None, CONNECT_TIMEOUT)
        })?;
        info!(
            "Connected to Kafka at {} ({} brokers)",
            broker.bootstrap_servers,
            metadata.brokers().len()
        );

        let transport = Self {
            producer,
            client_config,
        };
        transport.check_fatal()?;
        Ok(transport)
    }

    /// Delivery reports seen so far.
    pub fn context(&self) -> &DeliveryContext {
        self.producer.context()
    }

    /// Create a Kafka topic if it doesn't exist.
    pub async fn create_topic_if_not_exists(
        &self,
        topic: &str,
        partitions: i32,
    ) -> Result<(), TransportError> {
        let admin_client: AdminClient<DefaultClientContext> = self.client_config.create()?;

        let new_topic = NewTopic::new(topic, partitions, TopicReplication::Fixed(1));
        let opts = AdminOptions::new().operation_timeout(Some(Duration::from_secs(10)));

        let results = admin_client
            .create_topics(&[new_topic], &opts)
            .await
            .map_err(|e| TransportError::TopicCreation(format!("Failed to create topic: {e}")))?;

        for result in results {
            match result {
                Ok(topic_name) => info!("Topic '{}' created successfully", topic_name),
                Err((topic_name, RDKafkaErrorCode::TopicAlreadyExists)) => {
                    info!("Topic '{}' already exists", topic_name)
                }
                Err((topic_name, err)) => {
                    return Err(TransportError::TopicCreation(format!(
                        "Failed to create topic {topic_name}: {err}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_fatal(&self) -> Result<(), TransportError> {
        if let Some((code, reason)) = self.producer.client().fatal_error() {
            return Err(TransportError::Fatal(format!("{code}: {reason}")));
        }
        if let Some(reason) = self.context().fatal.get() {
            return Err(TransportError::Fatal(reason.clone()));
        }
        Ok(())
    }

    /// Block until the queue drains or `timeout` passes. A timeout is not an
    /// error; the caller reads the remaining count instead.
    fn drain(&self, timeout: Duration) -> Result<usize, TransportError> {
        let producer = &self.producer;
        match tokio::task::block_in_place(|| producer.flush(timeout)) {
            Ok(()) | Err(KafkaError::Flush(RDKafkaErrorCode::OperationTimedOut)) => {}
            Err(err) => return Err(err.into()),
        }
        self.check_fatal()?;
        Ok(self.outstanding())
    }
}

/// Connection settings shared by the producer and the admin client.
fn client_config(broker: &BrokerConfig) -> ClientConfig {
    let mut config = ClientConfig::new();
    config
        .set("bootstrap.servers", &broker.bootstrap_servers)
        .set("client.id", &broker.client_id)
        .set("security.protocol", broker.security_protocol.as_str());
    if let Some(credentials) = &broker.credentials {
        config
            .set("sasl.mechanism", &broker.sasl_mechanism)
            .set("sasl.username", &credentials.username)
            .set("sasl.password", &credentials.password);
    }
    config
}

#[async_trait]
impl PublisherTransport for KafkaTransport {
    fn submit(
        &mut self,
        topic: &str,
        key: Option<&[u8]>,
        payload: &[u8],
    ) -> Result<(), SubmitError> {
        self.check_fatal()?;

        let mut record: BaseRecord<'_, [u8], [u8]> = BaseRecord::to(topic).payload(payload);
        if let Some(key) = key {
            record = record.key(key);
        }

        match self.producer.send(record) {
            Ok(()) => Ok(()),
            Err((KafkaError::MessageProduction(RDKafkaErrorCode::QueueFull), _)) => {
                Err(SubmitError::QueueFull)
            }
            Err((err, _)) => Err(SubmitError::Fatal(err.into())),
        }
    }

    async fn poll(&mut self, timeout: Duration) -> Result<usize, TransportError> {
        self.drain(timeout)
    }

    async fn flush(&mut self, timeout: Duration) -> Result<usize, TransportError> {
        let remaining = self.drain(timeout)?;
        let context = self.context();
        debug!(
            "Flushed: {} delivered, {} failed, {} outstanding",
            context.delivered(),
            context.failed(),
            remaining
        );
        Ok(remaining)
    }

    fn outstanding(&self) -> usize {
        self.producer.in_flight_count().max(0) as usize
    }
}

//! Error types for the publisher.

use thiserror::Error;

/// Invalid or missing configuration, detected before anything is published.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("missing bootstrap servers: set --bootstrap-servers or BOOTSTRAP_SERVERS")]
    MissingBootstrapServers,

    #[error(
        "missing SASL credentials required by {protocol}: set SASL_PLAIN_USERNAME and SASL_PLAIN_PASSWORD"
    )]
    MissingCredentials { protocol: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Errors reported by the broker transport. These are terminal for a run.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("fatal transport error: {0}")]
    Fatal(String),

    #[error("Topic creation error: {0}")]
    TopicCreation(String),
}

/// Outcome of a rejected submit.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The transport's local queue is full; retry after letting it drain.
    #[error("transport queue is full")]
    QueueFull,

    #[error(transparent)]
    Fatal(#[from] TransportError),
}

/// Errors that abort a publish run.
#[derive(Error, Debug)]
pub enum PublisherError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to encode event: {0}")]
    Serialization(#[from] serde_json::Error),
}

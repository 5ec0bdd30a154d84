//! Rate-controlled Kafka publisher for synthetic booking events.
//!
//! This crate provides the `Publisher` which pulls batches from the
//! `booking-generator` crate, encodes every event as JSON and submits it to a
//! [`PublisherTransport`]. Submission pauses whenever the number of
//! unacknowledged messages reaches the configured `mps` ceiling.
//!
//! # Architecture
//!
//! ```text
//!  ProduceArgs (CLI + env)
//!        │ PublisherConfig::from_args
//!        ▼
//! ┌─────────────────┐      ┌──────────────────────┐
//! │    Publisher    │─────▶│  PublisherTransport  │
//! │                 │      │                      │
//! │ - generator     │      │ - KafkaTransport     │
//! │ - limiter (mps) │◀─────│ - MemoryTransport    │
//! └─────────────────┘ poll └──────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use booking_publisher::{BrokerConfig, KafkaTransport, Publisher, PublisherConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let broker = BrokerConfig::plaintext("localhost:9092");
//!     let mut config = PublisherConfig::new("bookings_topic", broker);
//!     config.sample = 1000;
//!
//!     let transport = KafkaTransport::connect(&config.broker).await?;
//!     let mut publisher = Publisher::new(config, transport)?;
//!     let metrics = publisher.run().await?;
//!     println!("Published {} messages", metrics.messages_submitted);
//!     Ok(())
//! }
//! ```

pub mod args;
pub mod config;
pub mod error;
pub mod publisher;
pub mod throttle;
pub mod transport;

// Re-exports for convenience
pub use args::ProduceArgs;
pub use config::{BrokerConfig, Credentials, MessageKey, PublisherConfig, SecurityProtocol};
pub use error::{ConfigurationError, PublisherError, SubmitError, TransportError};
pub use publisher::{PublishMetrics, Publisher};
pub use transport::{KafkaTransport, MemoryTransport, PublishedMessage, PublisherTransport};

//! CLI argument definitions for the publisher.

use crate::config::{MessageKey, SecurityProtocol};
use clap::Args;

/// Arguments for the `produce` command.
///
/// Broker endpoint and credentials fall back to environment variables, which
/// may come from a `.env` file.
#[derive(Args, Clone, Debug)]
pub struct ProduceArgs {
    /// Kafka topic to publish to
    #[arg(long, default_value = "bookings_topic")]
    pub topic: String,

    /// Number of events generated per batch
    #[arg(long, default_value = "10000")]
    pub sample: usize,

    /// Seconds to sleep between throttle polls and after each batch
    #[arg(long, default_value = "1")]
    pub sleep: f64,

    /// Messages per sleep: outstanding messages allowed before throttling
    #[arg(long, default_value = "200")]
    pub mps: usize,

    /// Number of batches to publish
    #[arg(long, default_value = "1")]
    pub repeat: usize,

    /// Kafka bootstrap servers (comma-separated)
    #[arg(long, env = "BOOTSTRAP_SERVERS")]
    pub bootstrap_servers: Option<String>,

    /// Broker security protocol
    #[arg(long, value_enum, default_value = "SASL_SSL")]
    pub security_protocol: SecurityProtocol,

    /// SASL mechanism
    #[arg(long, default_value = "PLAIN")]
    pub sasl_mechanism: String,

    /// SASL username
    #[arg(long, env = "SASL_PLAIN_USERNAME")]
    pub sasl_plain_username: Option<String>,

    /// SASL password
    #[arg(long, env = "SASL_PLAIN_PASSWORD", hide_env_values = true)]
    pub sasl_plain_password: Option<String>,

    /// Render event_time in UTC (`--utc false` for local time)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub utc: bool,

    /// Field used as the message key
    #[arg(long, value_enum, default_value = "none")]
    pub key: MessageKey,

    /// Producer compression codec
    #[arg(long, default_value = "lz4")]
    pub compression: String,

    /// Kafka client id (defaults to the host name)
    #[arg(long)]
    pub client_id: Option<String>,

    /// Seconds each throttle poll may block while the producer drains
    #[arg(long, default_value = "2")]
    pub poll_timeout: f64,

    /// Seconds the end-of-batch flush may block
    #[arg(long, default_value = "30")]
    pub flush_timeout: f64,

    /// Create the topic with this many partitions if it does not exist
    #[arg(long)]
    pub create_topic_partitions: Option<i32>,

    /// Random seed for a reproducible event stream (entropy when omitted)
    #[arg(long)]
    pub seed: Option<u64>,
}

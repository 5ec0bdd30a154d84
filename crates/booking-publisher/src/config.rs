//! Validated publisher configuration.

use crate::args::ProduceArgs;
use crate::error::ConfigurationError;
use booking_generator::EventRecord;
use clap::ValueEnum;
use std::fmt;
use std::time::Duration;

/// Backoff before retrying a submit rejected with a full local queue.
pub const DEFAULT_QUEUE_FULL_BACKOFF: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SecurityProtocol {
    #[value(name = "PLAINTEXT", alias = "plaintext")]
    Plaintext,
    #[value(name = "SSL", alias = "ssl")]
    Ssl,
    #[value(name = "SASL_PLAINTEXT", alias = "sasl-plaintext")]
    SaslPlaintext,
    #[value(name = "SASL_SSL", alias = "sasl-ssl")]
    SaslSsl,
}

impl SecurityProtocol {
    /// The librdkafka `security.protocol` value.
    pub fn as_str(self) -> &'static str {
        match self {
            SecurityProtocol::Plaintext => "PLAINTEXT",
            SecurityProtocol::Ssl => "SSL",
            SecurityProtocol::SaslPlaintext => "SASL_PLAINTEXT",
            SecurityProtocol::SaslSsl => "SASL_SSL",
        }
    }

    pub fn requires_sasl(self) -> bool {
        matches!(
            self,
            SecurityProtocol::SaslPlaintext | SecurityProtocol::SaslSsl
        )
    }
}

/// Which event field, if any, becomes the Kafka message key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MessageKey {
    #[default]
    None,
    EventId,
    UserId,
}

impl MessageKey {
    pub fn key_for(self, record: &EventRecord) -> Option<String> {
        match self {
            MessageKey::None => None,
            MessageKey::EventId => Some(record.event_id.to_string()),
            MessageKey::UserId => Some(record.user_id.to_string()),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Broker connection parameters.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub bootstrap_servers: String,
    pub security_protocol: SecurityProtocol,
    pub sasl_mechanism: String,
    pub credentials: Option<Credentials>,
    pub client_id: String,
    pub compression: String,
}

impl BrokerConfig {
    /// Plaintext connection without credentials, for local brokers.
    pub fn plaintext(bootstrap_servers: impl Into<String>) -> Self {
        Self {
            bootstrap_servers: bootstrap_servers.into(),
            security_protocol: SecurityProtocol::Plaintext,
            sasl_mechanism: "PLAIN".to_string(),
            credentials: None,
            client_id: default_client_id(),
            compression: "lz4".to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.bootstrap_servers.trim().is_empty() {
            return Err(ConfigurationError::MissingBootstrapServers);
        }
        if self.security_protocol.requires_sasl() {
            match &self.credentials {
                Some(c) if !c.username.is_empty() && !c.password.is_empty() => {}
                _ => {
                    return Err(ConfigurationError::MissingCredentials {
                        protocol: self.security_protocol.as_str(),
                    })
                }
            }
        }
        Ok(())
    }
}

/// Everything a publish run needs, checked by [`PublisherConfig::validate`].
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub topic: String,
    /// Events generated and submitted per batch.
    pub sample: usize,
    /// Pause before each throttle poll and after each batch.
    pub sleep: Duration,
    /// Outstanding messages allowed before submission pauses.
    pub mps: usize,
    /// Number of batches.
    pub repeat: usize,
    pub utc: bool,
    pub key: MessageKey,
    /// Upper bound for one throttle poll.
    pub poll_timeout: Duration,
    /// Upper bound for the end-of-batch flush.
    pub flush_timeout: Duration,
    pub queue_full_backoff: Duration,
    pub seed: Option<u64>,
    pub broker: BrokerConfig,
}

impl PublisherConfig {
    /// Defaults matching the CLI, publishing to `topic` over `broker`.
    pub fn new(topic: impl Into<String>, broker: BrokerConfig) -> Self {
        Self {
            topic: topic.into(),
            sample: 10_000,
            sleep: Duration::from_secs(1),
            mps: 200,
            repeat: 1,
            utc: true,
            key: MessageKey::None,
            poll_timeout: Duration::from_secs(2),
            flush_timeout: Duration::from_secs(30),
            queue_full_backoff: DEFAULT_QUEUE_FULL_BACKOFF,
            seed: None,
            broker,
        }
    }

    /// Build and validate a configuration from command-line arguments.
    pub fn from_args(args: &ProduceArgs) -> Result<Self, ConfigurationError> {
        let credentials = match (&args.sasl_plain_username, &args.sasl_plain_password) {
            (Some(username), Some(password)) => Some(Credentials {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        };

        let broker = BrokerConfig {
            bootstrap_servers: args.bootstrap_servers.clone().unwrap_or_default(),
            security_protocol: args.security_protocol,
            sasl_mechanism: args.sasl_mechanism.clone(),
            credentials,
            client_id: args.client_id.clone().unwrap_or_else(default_client_id),
            compression: args.compression.clone(),
        };

        let config = Self {
            topic: args.topic.clone(),
            sample: args.sample,
            sleep: seconds("sleep", args.sleep)?,
            mps: args.mps,
            repeat: args.repeat,
            utc: args.utc,
            key: args.key,
            poll_timeout: seconds("poll-timeout", args.poll_timeout)?,
            flush_timeout: seconds("flush-timeout", args.flush_timeout)?,
            queue_full_backoff: DEFAULT_QUEUE_FULL_BACKOFF,
            seed: args.seed,
            broker,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.broker.validate()?;
        if self.topic.trim().is_empty() {
            return Err(invalid("topic", "must not be empty"));
        }
        if self.sample == 0 {
            return Err(invalid("sample", "must be at least 1"));
        }
        // A zero ceiling would throttle forever.
        if self.mps == 0 {
            return Err(invalid("mps", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

fn seconds(field: &'static str, value: f64) -> Result<Duration, ConfigurationError> {
    Duration::try_from_secs_f64(value).map_err(|e| invalid(field, &e.to_string()))
}

/// The host name, or a fixed fallback when it cannot be read.
pub fn default_client_id() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "booking-events".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ProduceArgs,
    }

    fn parse(argv: &[&str]) -> ProduceArgs {
        let mut full = vec!["test"];
        full.extend_from_slice(argv);
        TestCli::try_parse_from(full).unwrap().args
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[
            "--bootstrap-servers",
            "broker:9092",
            "--sasl-plain-username",
            "user",
            "--sasl-plain-password",
            "secret",
        ]);
        let config = PublisherConfig::from_args(&args).unwrap();

        assert_eq!(config.topic, "bookings_topic");
        assert_eq!(config.sample, 10_000);
        assert_eq!(config.sleep, Duration::from_secs(1));
        assert_eq!(config.mps, 200);
        assert_eq!(config.repeat, 1);
        assert!(config.utc);
        assert_eq!(config.key, MessageKey::None);
        assert_eq!(config.broker.security_protocol, SecurityProtocol::SaslSsl);
        assert_eq!(config.broker.sasl_mechanism, "PLAIN");
        assert_eq!(config.broker.compression, "lz4");
        assert!(!config.broker.client_id.is_empty());
    }

    #[test]
    fn test_missing_credentials_is_rejected() {
        let args = parse(&["--bootstrap-servers", "broker:9092"]);
        let err = PublisherConfig::from_args(&args).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::MissingCredentials {
                protocol: "SASL_SSL"
            }
        ));
    }

    #[test]
    fn test_missing_bootstrap_servers_is_rejected() {
        let args = parse(&["--security-protocol", "PLAINTEXT"]);
        let err = PublisherConfig::from_args(&args).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingBootstrapServers));
    }

    #[test]
    fn test_plaintext_needs_no_credentials() {
        let args = parse(&[
            "--bootstrap-servers",
            "localhost:9092",
            "--security-protocol",
            "plaintext",
            "--utc",
            "false",
            "--key",
            "user-id",
            "--sleep",
            "0.5",
        ]);
        let config = PublisherConfig::from_args(&args).unwrap();
        assert!(!config.utc);
        assert_eq!(config.key, MessageKey::UserId);
        assert_eq!(config.sleep, Duration::from_millis(500));
        assert!(config.broker.credentials.is_none());
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let base = ["--bootstrap-servers", "b:9092", "--security-protocol", "PLAINTEXT"];

        let mut argv = base.to_vec();
        argv.extend(["--mps", "0"]);
        assert!(matches!(
            PublisherConfig::from_args(&parse(&argv)),
            Err(ConfigurationError::InvalidValue { field: "mps", .. })
        ));

        let mut argv = base.to_vec();
        argv.extend(["--sample", "0"]);
        assert!(matches!(
            PublisherConfig::from_args(&parse(&argv)),
            Err(ConfigurationError::InvalidValue { field: "sample", .. })
        ));

        let mut argv = base.to_vec();
        argv.extend(["--sleep=-1"]);
        assert!(matches!(
            PublisherConfig::from_args(&parse(&argv)),
            Err(ConfigurationError::InvalidValue { field: "sleep", .. })
        ));
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let credentials = Credentials {
            username: "user".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("user"));
        assert!(!rendered.contains("hunter2"));
    }
}

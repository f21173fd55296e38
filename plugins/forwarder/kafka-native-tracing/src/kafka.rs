use relay_api::error::PluginError;

fn default_client_id() -> String {
    "relay".to_string()
}

fn default_required_acks() -> String {
    "all".to_string()
}

fn default_message_timeout_ms() -> u64 {
    5_000
}

/// Settings for the bundled Kafka client connection.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct KafkaClientConfig {
    /// Comma-separated `host:port` bootstrap list.
    pub brokers: String,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// `0`, `1` or `all`.
    #[serde(default = "default_required_acks")]
    pub required_acks: String,
    #[serde(default = "default_message_timeout_ms")]
    pub message_timeout_ms: u64,
}

impl KafkaClientConfig {
    /// Parse from the host's connection config value.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, PluginError> {
        let config: Self = serde_json::from_value(value.clone())?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), KafkaClientError> {
        if self.brokers.trim().is_empty() {
            return Err(KafkaClientError::Config("brokers must not be empty".into()));
        }
        if !matches!(self.required_acks.as_str(), "0" | "1" | "all" | "-1") {
            return Err(KafkaClientError::Config(format!(
                "required_acks must be one of 0, 1, all (got '{}')",
                self.required_acks
            )));
        }
        Ok(())
    }

    /// Client properties in librdkafka naming.
    pub fn properties(&self) -> Vec<(&'static str, String)> {
        vec![
            ("bootstrap.servers", self.brokers.clone()),
            ("client.id", self.client_id.clone()),
            ("acks", self.required_acks.clone()),
            ("message.timeout.ms", self.message_timeout_ms.to_string()),
        ]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KafkaClientError {
    #[error("invalid kafka client config: {0}")]
    Config(String),

    #[error("create kafka producer: {0}")]
    Create(String),

    #[error("enqueue message for topic '{topic}': {reason}")]
    Enqueue { topic: String, reason: String },

    #[error("deliver message to topic '{topic}': {reason}")]
    Delivery { topic: String, reason: String },

    #[error("delivery to topic '{topic}' canceled")]
    Canceled { topic: String },
}

impl From<KafkaClientError> for PluginError {
    fn from(e: KafkaClientError) -> Self {
        match e {
            KafkaClientError::Config(_) => PluginError::config(e.to_string()),
            _ => PluginError::io(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use relay_api::error::ErrorKind;
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_applied() {
        let config = KafkaClientConfig::from_json(&json!({ "brokers": "kafka:9092" })).unwrap();
        assert_eq!(config.client_id, "relay");
        assert_eq!(config.required_acks, "all");
        assert_eq!(config.message_timeout_ms, 5_000);
        assert_eq!(config.properties()[0], ("bootstrap.servers", "kafka:9092".to_string()));
    }

    #[test]
    fn missing_brokers_is_config_error() {
        let err = KafkaClientConfig::from_json(&json!({})).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Config);
    }

    #[test]
    fn bad_acks_rejected() {
        let err = KafkaClientConfig::from_json(&json!({
            "brokers": "kafka:9092",
            "required_acks": "most",
        }))
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Config);
        assert!(err.message.contains("required_acks"));
    }

    #[test]
    fn transport_errors_map_to_io() {
        let err = PluginError::from(KafkaClientError::Canceled { topic: "t".into() });
        assert_eq!(err.kind, ErrorKind::Io);
        assert_eq!(err.message, "delivery to topic 't' canceled");
    }
}

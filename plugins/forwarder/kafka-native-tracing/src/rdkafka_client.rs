use std::sync::Arc;

use futures::executor::block_on;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{DeliveryFuture, FutureProducer, FutureRecord};

use relay_api::client::{KafkaClient, ProducerMessage, SyncProducer};
use relay_api::error::PluginError;

use crate::kafka::{KafkaClientConfig, KafkaClientError};

/// Kafka client connection backed by librdkafka.
pub struct RdKafkaClient {
    config: ClientConfig,
}

impl RdKafkaClient {
    pub fn new(settings: &KafkaClientConfig) -> Result<Self, PluginError> {
        settings.validate()?;
        let mut config = ClientConfig::new();
        for (key, value) in settings.properties() {
            config.set(key, value);
        }
        tracing::info!(brokers = %settings.brokers, "kafka client configured");
        Ok(Self { config })
    }
}

impl KafkaClient for RdKafkaClient {
    fn sync_producer(&self) -> Result<Arc<dyn SyncProducer>, PluginError> {
        let producer: FutureProducer = self
            .config
            .create()
            .map_err(|e| KafkaClientError::Create(e.to_string()))?;
        Ok(Arc::new(RdKafkaSyncProducer { producer }))
    }
}

/// Enqueues the whole set, then blocks until every delivery report is in.
/// Reports the first failure; messages enqueued before it may still be delivered.
pub struct RdKafkaSyncProducer {
    producer: FutureProducer,
}

impl SyncProducer for RdKafkaSyncProducer {
    fn send_messages(&self, messages: Vec<ProducerMessage>) -> Result<(), PluginError> {
        let mut deliveries: Vec<(&str, DeliveryFuture)> = Vec::with_capacity(messages.len());
        for message in &messages {
            let mut record: FutureRecord<'_, str, [u8]> =
                FutureRecord::to(&message.topic).payload(message.value.as_slice());
            if let Some(key) = message.key.as_deref() {
                record = record.key(key);
            }
            let delivery = self.producer.send_result(record).map_err(|(e, _)| {
                KafkaClientError::Enqueue {
                    topic: message.topic.clone(),
                    reason: e.to_string(),
                }
            })?;
            deliveries.push((message.topic.as_str(), delivery));
        }

        for (topic, delivery) in deliveries {
            match block_on(delivery) {
                Ok(Ok(_)) => {}
                Ok(Err((e, _))) => {
                    return Err(KafkaClientError::Delivery {
                        topic: topic.to_string(),
                        reason: e.to_string(),
                    }
                    .into());
                }
                Err(_) => {
                    return Err(KafkaClientError::Canceled {
                        topic: topic.to_string(),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use relay_api::client::Connection;
    use relay_api::error::ErrorKind;

    use super::*;

    #[test]
    fn invalid_settings_rejected_before_connecting() {
        let settings = KafkaClientConfig {
            brokers: String::new(),
            client_id: "relay".into(),
            required_acks: "all".into(),
            message_timeout_ms: 1_000,
        };
        let err = RdKafkaClient::new(&settings).err().unwrap();
        assert_eq!(err.kind, ErrorKind::Config);
    }

    #[test]
    fn client_wraps_into_kafka_connection() {
        let settings = KafkaClientConfig {
            brokers: "localhost:9092".into(),
            client_id: "relay".into(),
            required_acks: "1".into(),
            message_timeout_ms: 1_000,
        };
        let client: Arc<dyn KafkaClient> = Arc::new(RdKafkaClient::new(&settings).unwrap());
        let conn = Connection::kafka(client);
        assert!(conn.downcast_ref::<Arc<dyn KafkaClient>>().is_some());
    }
}

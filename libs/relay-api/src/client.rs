use std::any::Any;
use std::sync::Arc;

use crate::error::PluginError;

/// A broker-ready message: topic, optional key and opaque value bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerMessage {
    pub topic: String,
    pub key: Option<String>,
    pub value: Vec<u8>,
}

/// Blocking producer. `send_messages` returns once the broker acknowledged
/// every message at the configured durability level, or with the first failure.
///
/// Shared across concurrent forward calls, so implementations must be safe for
/// concurrent use.
pub trait SyncProducer: Send + Sync {
    fn send_messages(&self, messages: Vec<ProducerMessage>) -> Result<(), PluginError>;
}

/// Kafka client connection owned by the host.
pub trait KafkaClient: Send + Sync {
    /// Build a synchronous producer bound to this connection.
    fn sync_producer(&self) -> Result<Arc<dyn SyncProducer>, PluginError>;
}

/// Opaque connection handle passed to plugins at prepare time.
///
/// The host wraps whatever client a plugin is wired to; the plugin checks the
/// concrete type with [`Connection::downcast_ref`].
pub struct Connection {
    inner: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Connection {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Wrap a Kafka client.
    pub fn kafka(client: Arc<dyn KafkaClient>) -> Self {
        Self::new(client)
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Name of the wrapped concrete type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection").field("type", &self.type_name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopClient;

    impl KafkaClient for NoopClient {
        fn sync_producer(&self) -> Result<Arc<dyn SyncProducer>, PluginError> {
            Err(PluginError::io("not connected"))
        }
    }

    #[test]
    fn kafka_connection_downcasts_to_client() {
        let conn = Connection::kafka(Arc::new(NoopClient));
        let client = conn.downcast_ref::<Arc<dyn KafkaClient>>().unwrap();
        assert_eq!(client.sync_producer().err().unwrap().message, "not connected");
        assert!(conn.type_name().contains("KafkaClient"));
    }

    #[test]
    fn other_types_do_not_downcast() {
        let conn = Connection::new(String::from("grpc://collector:11800"));
        assert!(conn.downcast_ref::<Arc<dyn KafkaClient>>().is_none());
        assert_eq!(conn.type_name(), "alloc::string::String");
    }
}

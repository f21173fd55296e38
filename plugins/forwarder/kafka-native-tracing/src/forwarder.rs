use std::any::type_name;
use std::sync::Arc;

use prost::Message;

use relay_api::client::{Connection, KafkaClient, ProducerMessage, SyncProducer};
use relay_api::config::{CommonFields, ConfigValues};
use relay_api::diagnostics::{Diagnostics, TracingDiagnostics};
use relay_api::error::PluginError;
use relay_api::event::{BatchEvents, SniffData, SniffType, sniff_data};
use relay_api::forwarder::Forwarder;
use relay_api::trace::SegmentObject;

use crate::config::NativeTracingKafkaConfig;

pub const NAME: &str = "native-tracing-kafka-forwarder";
pub const SHOW_NAME: &str = "Native Tracing Kafka Forwarder";

const DESCRIPTION: &str =
    "This is a synchronization Kafka forwarder with the SkyWalking native tracing protocol.";

const DEFAULT_CONFIG: &str = r#"
# The remote topic.
topic = "skywalking-segments"
"#;

const SPAN_ATTACHED_EVENT_DISCARDED: &str = "native-tracing-kafka-forwarder does not support \
     messages of type SpanAttachedEvent and has discarded them. Please choose \
     native-tracing-grpc-forwarder as a replacement.";

/// Publishes trace segments to a Kafka topic, keyed by segment id.
///
/// Segment bytes are forwarded verbatim; they are decoded only to read the key.
/// Span-attached events (from the eBPF agent) cannot be carried on this
/// transport and are dropped with a warning. Everything else is ignored.
pub struct NativeTracingKafkaForwarder {
    common: CommonFields,
    topic: String,
    producer: Option<Arc<dyn SyncProducer>>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl NativeTracingKafkaForwarder {
    pub fn new(common: CommonFields, config: NativeTracingKafkaConfig) -> Self {
        Self {
            common,
            topic: config.topic,
            producer: None,
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    /// Build from host-supplied values (declared params plus common fields).
    pub fn from_config(values: &ConfigValues) -> Result<Self, PluginError> {
        let config = NativeTracingKafkaConfig::load(values)?;
        Ok(Self::new(CommonFields::from_config(values), config))
    }

    /// Replace the sink that receives non-fatal warnings.
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn is_prepared(&self) -> bool {
        self.producer.is_some()
    }

    /// Translate a batch into outbound messages, preserving order.
    ///
    /// The first segment that fails to decode aborts the whole batch.
    fn build_messages(&self, batch: &BatchEvents) -> Result<Vec<ProducerMessage>, PluginError> {
        let mut messages = Vec::new();
        for event in batch {
            match &event.data {
                Some(sniff_data::Data::Segment(bytes)) => {
                    let segment = SegmentObject::decode(bytes.as_slice()).map_err(|e| {
                        PluginError::from(e).with_context(format!("decode segment '{}'", event.name))
                    })?;
                    messages.push(ProducerMessage {
                        topic: self.topic.clone(),
                        key: Some(segment.trace_segment_id),
                        value: bytes.clone(),
                    });
                }
                Some(sniff_data::Data::SpanAttachedEvent(_)) => {
                    self.diagnostics
                        .warn(&self.common.pipe_name, SPAN_ATTACHED_EVENT_DISCARDED);
                }
                _ => continue,
            }
        }
        Ok(messages)
    }
}

impl Forwarder for NativeTracingKafkaForwarder {
    fn name(&self) -> &'static str {
        NAME
    }

    fn show_name(&self) -> &'static str {
        SHOW_NAME
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn default_config(&self) -> &'static str {
        DEFAULT_CONFIG
    }

    fn prepare(&mut self, connection: &Connection) -> Result<(), PluginError> {
        let client = connection
            .downcast_ref::<Arc<dyn KafkaClient>>()
            .ok_or_else(|| {
                PluginError::config(format!(
                    "the {} only accepts a kafka client ({}), but received a {}",
                    self.name(),
                    type_name::<Arc<dyn KafkaClient>>(),
                    connection.type_name()
                ))
            })?;
        let producer = client.sync_producer()?;
        self.producer = Some(producer);
        tracing::info!(
            pipe = %self.common.pipe_name,
            topic = %self.topic,
            "{} prepared", self.name()
        );
        Ok(())
    }

    fn forward(&self, batch: &BatchEvents) -> Result<(), PluginError> {
        let producer = self
            .producer
            .as_ref()
            .ok_or_else(|| PluginError::logic(format!("{} is not prepared", self.name())))?;

        let messages = self.build_messages(batch)?;
        if messages.is_empty() {
            return Ok(());
        }

        let count = messages.len();
        producer.send_messages(messages)?;
        tracing::debug!(
            pipe = %self.common.pipe_name,
            topic = %self.topic,
            batch = batch.len(),
            sent = count,
            "segments forwarded"
        );
        Ok(())
    }

    fn forward_type(&self) -> SniffType {
        SniffType::TracingType
    }

    fn sync_forward(&self, _data: &SniffData) -> Result<SniffData, PluginError> {
        Err(PluginError::unsupported(format!(
            "{} does not support sync forward",
            self.name()
        )))
    }

    fn supported_sync_invoke(&self) -> bool {
        false
    }
}

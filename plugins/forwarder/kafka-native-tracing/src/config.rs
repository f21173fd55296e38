use relay_api::ConfigParams;
use relay_api::config::ConfigValues;
use relay_api::error::PluginError;

pub const DEFAULT_TOPIC: &str = "skywalking-segments";

/// Forwarder configuration.
#[derive(Debug, Clone, PartialEq, Eq, ConfigParams)]
pub struct NativeTracingKafkaConfig {
    #[param(context = "startup", description = "The remote topic.")]
    pub topic: String,
}

impl Default for NativeTracingKafkaConfig {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
        }
    }
}

impl NativeTracingKafkaConfig {
    /// Read and validate host-supplied values.
    pub fn load(values: &ConfigValues) -> Result<Self, PluginError> {
        let config = Self::from_config(values)?;
        if config.topic.trim().is_empty() {
            return Err(PluginError::config("topic must not be empty"));
        }
        Ok(config)
    }
}

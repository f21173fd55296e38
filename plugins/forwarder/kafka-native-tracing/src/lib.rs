//! Native tracing Kafka forwarder plugin.
//!
//! Publishes trace segments from a pipe to a Kafka topic through a synchronous
//! producer supplied by the host connection.

pub mod config;
pub mod forwarder;
pub mod kafka;
#[cfg(feature = "rdkafka")]
pub mod rdkafka_client;

pub use config::{DEFAULT_TOPIC, NativeTracingKafkaConfig};
pub use forwarder::{NAME, NativeTracingKafkaForwarder, SHOW_NAME};

use relay_api::forwarder::Forwarder;

// ---------------------------------------------------------------------------
// FFI exports for dynamic (.so) loading
// ---------------------------------------------------------------------------

relay_api::qs_abi_version_fn!();
relay_api::qs_config_params_fn!(NativeTracingKafkaConfig);
relay_api::qs_destroy_fn!(qs_destroy_forwarder, relay_api::forwarder::Forwarder);

/// # Safety
///
/// `config_ptr` must point to a valid `ConfigValues` owned by the host.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn qs_create_forwarder(
    config_ptr: *const (),
) -> relay_api::ffi::PluginCreateResult {
    let config = unsafe { relay_api::ffi::config_from_ptr(config_ptr) };
    match NativeTracingKafkaForwarder::from_config(config) {
        Ok(forwarder) => {
            relay_api::ffi::plugin_ok(Box::new(Box::new(forwarder) as Box<dyn Forwarder>))
        }
        Err(e) => relay_api::ffi::plugin_err(&e.to_string()),
    }
}

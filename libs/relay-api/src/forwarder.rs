use crate::client::Connection;
use crate::error::PluginError;
use crate::event::{BatchEvents, SniffData, SniffType};

/// Output plugin at the end of a pipe.
///
/// Lifecycle: the host creates the plugin from validated config, calls
/// `prepare()` once with the connection the plugin is wired to, then calls
/// `forward()` for every scheduled batch. Each forward call is independent;
/// the host treats any returned error as "the whole batch was not forwarded".
pub trait Forwarder: Send + Sync {
    /// Stable identity name.
    fn name(&self) -> &'static str;

    /// Human-readable name.
    fn show_name(&self) -> &'static str;

    /// One-line description.
    fn description(&self) -> &'static str;

    /// Default configuration document (TOML).
    fn default_config(&self) -> &'static str;

    /// Wire the plugin to its connection. Called once before any forward.
    fn prepare(&mut self, connection: &Connection) -> Result<(), PluginError>;

    /// Forward one batch. Blocks until the transport returns.
    fn forward(&self, batch: &BatchEvents) -> Result<(), PluginError>;

    /// The single category of data this forwarder accepts.
    fn forward_type(&self) -> SniffType;

    /// Request/response forwarding of a single envelope.
    fn sync_forward(&self, data: &SniffData) -> Result<SniffData, PluginError>;

    /// Whether `sync_forward` may be used at all.
    fn supported_sync_invoke(&self) -> bool;
}

use std::fmt;

/// Error kind for plugin errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid configuration or wiring (wrong connection type, bad config document).
    Config,
    /// Broker or network failure reported by a client/producer.
    Io,
    /// Payload could not be decoded.
    Format,
    /// Called out of order (e.g. forward before prepare).
    Logic,
    /// Operation the plugin declares it does not support.
    Unsupported,
}

/// Plugin error — returned by all plugin trait methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginError {
    pub kind: ErrorKind,
    pub message: String,
}

impl PluginError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Config, message: msg.into() }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Io, message: msg.into() }
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Format, message: msg.into() }
    }

    pub fn logic(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Logic, message: msg.into() }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Unsupported, message: msg.into() }
    }

    /// Add context to the error, preserving the original ErrorKind.
    ///
    /// Produces: `"context: original message"`.
    pub fn with_context(self, ctx: impl fmt::Display) -> Self {
        Self {
            kind: self.kind,
            message: format!("{ctx}: {}", self.message),
        }
    }
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for PluginError {}

// ---------------------------------------------------------------------------
// From impls: library error types → PluginError with correct ErrorKind
// ---------------------------------------------------------------------------

impl From<prost::DecodeError> for PluginError {
    fn from(e: prost::DecodeError) -> Self {
        Self::format(e.to_string())
    }
}

impl From<serde_json::Error> for PluginError {
    fn from(e: serde_json::Error) -> Self {
        Self::config(e.to_string())
    }
}

impl From<toml::de::Error> for PluginError {
    fn from(e: toml::de::Error) -> Self {
        Self::config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use prost::Message;

    use super::*;
    use crate::trace::SegmentObject;

    #[test]
    fn with_context_keeps_kind() {
        let err = PluginError::io("broker down").with_context("send");
        assert_eq!(err.kind, ErrorKind::Io);
        assert_eq!(err.message, "send: broker down");
        assert_eq!(err.to_string(), "Io: send: broker down");
    }

    #[test]
    fn decode_error_maps_to_format() {
        let decode_err = SegmentObject::decode(&[0x0a, 0xff][..]).unwrap_err();
        let err = PluginError::from(decode_err);
        assert_eq!(err.kind, ErrorKind::Format);
        assert!(!err.message.is_empty());
    }
}

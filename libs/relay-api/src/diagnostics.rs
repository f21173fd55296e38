use std::sync::Mutex;

/// Sink for non-fatal observations a plugin makes while processing a batch.
///
/// Injected into plugins so hosts can route warnings and tests can assert on them.
pub trait Diagnostics: Send + Sync {
    fn warn(&self, pipe: &str, message: &str);
}

/// Default sink: structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, pipe: &str, message: &str) {
        tracing::warn!(pipe = %pipe, "{message}");
    }
}

/// Keeps every warning in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    warnings: Mutex<Vec<(String, String)>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(pipe, message)` pairs recorded so far.
    pub fn warnings(&self) -> Vec<(String, String)> {
        match self.warnings.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn warn(&self, pipe: &str, message: &str) {
        let mut guard = match self.warnings.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push((pipe.to_string(), message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_keeps_order() {
        let sink = RecordingDiagnostics::new();
        sink.warn("p1", "first");
        sink.warn("p2", "second");
        assert_eq!(
            sink.warnings(),
            vec![
                ("p1".to_string(), "first".to_string()),
                ("p2".to_string(), "second".to_string()),
            ]
        );
    }
}

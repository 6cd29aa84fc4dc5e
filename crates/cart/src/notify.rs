//! User-facing error notifications.
//!
//! A notifier is fire-and-forget: the store calls it once per failed
//! operation and never looks at the outcome.

use std::sync::{Arc, Mutex, PoisonError};

/// Receives human-readable error messages for the shopper.
pub trait Notifier {
    /// Show an error message.
    fn error(&self, message: &str);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn error(&self, message: &str) {
        (**self).error(message);
    }
}

/// Sends messages to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(target: "rocketshoes_cart::notify", "{message}");
    }
}

/// Keeps every message in memory, in call order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return the messages received so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = Arc::new(RecordingNotifier::new());
        let shared = Arc::clone(&notifier);

        shared.error("first");
        shared.error("second");

        assert_eq!(notifier.messages(), vec!["first", "second"]);
        assert_eq!(notifier.take().len(), 2);
        assert!(notifier.messages().is_empty());
    }

    #[test]
    fn test_tracing_notifier_logs_warning() {
        let (logs, _guard) = crate::test_support::capture_logs(tracing::Level::WARN);

        TracingNotifier.error("Requested quantity is out of stock");

        let output = logs.contents();
        assert!(output.contains("WARN"));
        assert!(output.contains("rocketshoes_cart::notify"));
        assert!(output.contains("Requested quantity is out of stock"));
    }
}

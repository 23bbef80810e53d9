//! Human-readable audit messages.
//!
//! Components receive a [`Logger`] explicitly rather than reaching for a
//! global. [`MessageLog`] keeps every message in memory so a front end can
//! show them, and mirrors each one to `tracing`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Fire-and-forget message sink.
pub trait Logger {
    /// Record one message. Never fails the caller.
    fn add(&self, message: String);
}

/// In-memory message collector.
///
/// Cloning shares the underlying buffer.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages recorded so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether any recorded message contains `needle`.
    #[cfg(test)]
    pub fn contains(&self, needle: &str) -> bool {
        self.lock().iter().any(|m| m.contains(needle))
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Logger for MessageLog {
    fn add(&self, message: String) {
        tracing::info!(target: "transit_cascade::messages", "{message}");
        self.lock().push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_messages() {
        let log = MessageLog::new();
        let other = log.clone();

        log.add("Selected route id = Red".to_string());
        other.add("fetched stops".to_string());

        assert_eq!(
            log.messages(),
            ["Selected route id = Red", "fetched stops"]
        );
        assert!(other.contains("route id = Red"));
    }

    #[test]
    fn clear_empties_log() {
        let log = MessageLog::new();
        log.add("one".to_string());
        assert_eq!(log.len(), 1);

        log.clear();
        assert!(log.is_empty());
    }
}

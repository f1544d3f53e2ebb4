//! Deferred (pushed) event buffer

use std::collections::HashMap;

use serde_json::Value;

/// Payloads pushed under an event name, awaiting a flush.
///
/// Independent of the listener registry; each pushed value is an
/// individual item so a flush dispatches them one by one, in push order.
#[derive(Default)]
pub(crate) struct DeferredEvents {
    pushed: HashMap<String, Vec<Value>>,
}

impl DeferredEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer each payload value as an independent item
    pub fn push(&mut self, event_name: &str, payload: Vec<Value>) {
        self.pushed
            .entry(event_name.to_string())
            .or_default()
            .extend(payload);
    }

    /// Remove and return the buffered items for an event
    pub fn take(&mut self, event_name: &str) -> Option<Vec<Value>> {
        self.pushed.remove(event_name)
    }

    /// Number of items buffered under an event name
    #[cfg(test)]
    pub fn len(&self, event_name: &str) -> usize {
        self.pushed.get(event_name).map_or(0, Vec::len)
    }
}

#[cfg(test)]
#[path = "deferred_tests.rs"]
mod tests;

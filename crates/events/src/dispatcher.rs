// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatch coordination

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use serde_json::Value;

use crate::deferred::DeferredEvents;
use crate::error::EventError;
use crate::event::{Event, Payload};
use crate::listener::{Handler, Listener, QueueableHandler};
use crate::queue::{queue_listener, Queue};
use crate::registry::ListenerRegistry;
use crate::subscriber::Subscriber;
use crate::task::EventTask;

struct Shared {
    registry: RwLock<ListenerRegistry>,
    deferred: Mutex<DeferredEvents>,
    // Typed-event registration table: event name -> queue-capable listeners
    events: RwLock<HashMap<String, Vec<Arc<dyn QueueableHandler>>>>,
    queue: Arc<dyn Queue>,
}

/// The event dispatcher: listener registry, wildcard resolution,
/// queue-or-sync execution, and the deferred event buffer.
///
/// The instance is the unit of ownership: constructed once with its queue
/// collaborator and shared by reference or clone (`Clone` shares state).
/// All operations are internally synchronized; listener invocation happens
/// with no registry lock held, so listeners may re-enter the dispatcher.
pub struct EventDispatcher {
    shared: Arc<Shared>,
}

impl Clone for EventDispatcher {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl EventDispatcher {
    pub fn new(queue: Arc<dyn Queue>) -> Self {
        Self {
            shared: Arc::new(Shared {
                registry: RwLock::new(ListenerRegistry::new()),
                deferred: Mutex::new(DeferredEvents::new()),
                events: RwLock::new(HashMap::new()),
                queue,
            }),
        }
    }

    /// Register listeners for an event name or wildcard pattern.
    ///
    /// Appends to the existing list; registration order is invocation
    /// order. Fails on an empty name or an empty listener list, leaving
    /// the registry unchanged.
    pub fn listen(&self, event: &str, listeners: Vec<Listener>) -> Result<(), EventError> {
        let count = listeners.len();
        {
            let mut registry = self
                .shared
                .registry
                .write()
                .unwrap_or_else(|e| e.into_inner());
            registry.listen(event, listeners)?;
        }
        tracing::debug!(event = %event, count, "listeners registered");
        Ok(())
    }

    /// True if the event has exact-name listeners or any wildcard pattern
    /// matches it
    pub fn has_listeners(&self, event_name: &str) -> bool {
        self.shared
            .registry
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .has_listeners(event_name)
    }

    /// Remove the listeners registered under an exact name or a wildcard
    /// pattern
    pub fn forget(&self, event_name: &str) {
        {
            let mut registry = self
                .shared
                .registry
                .write()
                .unwrap_or_else(|e| e.into_inner());
            registry.forget(event_name);
        }
        tracing::debug!(event = %event_name, "listeners forgotten");
    }

    /// Register every event/listener pair a subscriber declares.
    ///
    /// Fails fast on the first bad pair; already-registered pairs stay
    /// registered.
    pub fn subscribe(&self, subscriber: &dyn Subscriber) -> Result<(), EventError> {
        for (event, listeners) in subscriber.subscribe(self) {
            self.listen(&event, listeners)?;
        }
        Ok(())
    }

    /// Fire an event and run its listeners synchronously, collecting every
    /// non-queued listener's response in invocation order
    pub fn dispatch(&self, event: &str, payload: Payload) -> Result<Vec<Value>, EventError> {
        self.invoke_listeners(event, &payload, false)
    }

    /// Fire a typed event, wrapping it as the sole payload element
    pub fn dispatch_event<E: Event>(&self, event: &E) -> Result<Vec<Value>, EventError> {
        let (name, payload) = typed_event(event)?;
        self.invoke_listeners(&name, &payload, false)
    }

    /// Fire an event until the first listener returns a non-null response
    pub fn until(&self, event: &str, payload: Payload) -> Result<Value, EventError> {
        let responses = self.invoke_listeners(event, &payload, true)?;
        Ok(responses.into_iter().next().unwrap_or(Value::Null))
    }

    /// `until` for a typed event
    pub fn until_event<E: Event>(&self, event: &E) -> Result<Value, EventError> {
        let (name, payload) = typed_event(event)?;
        let responses = self.invoke_listeners(&name, &payload, true)?;
        Ok(responses.into_iter().next().unwrap_or(Value::Null))
    }

    /// Buffer payloads under an event name for a later flush.
    /// Each payload value is stored as an independent item.
    pub fn push(&self, event_name: &str, payload: Payload) {
        let mut deferred = self
            .shared
            .deferred
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        deferred.push(event_name, payload);
    }

    /// Dispatch everything pushed under an event name, in push order.
    ///
    /// The buffer entry is removed before iteration begins; a failing
    /// dispatch aborts and the not-yet-processed remainder is dropped.
    /// Flushing an event with no buffered items is a no-op.
    pub fn flush(&self, event_name: &str) -> Result<(), EventError> {
        let items = {
            let mut deferred = self
                .shared
                .deferred
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            deferred.take(event_name)
        };

        let Some(items) = items else {
            return Ok(());
        };

        for item in items {
            self.dispatch(event_name, vec![item])?;
        }

        Ok(())
    }

    /// Register typed events and pre-register their listeners with the
    /// queue backend, deduplicated by signature in first-seen order
    pub fn register(
        &self,
        events: Vec<(String, Vec<Arc<dyn QueueableHandler>>)>,
    ) -> Result<(), EventError> {
        let mut jobs: Vec<Arc<dyn Handler>> = Vec::new();
        let mut signatures: Vec<String> = Vec::new();

        {
            let mut table = self
                .shared
                .events
                .write()
                .unwrap_or_else(|e| e.into_inner());
            for (event, listeners) in events {
                for listener in &listeners {
                    let signature = listener.signature();
                    if !signatures.contains(&signature) {
                        signatures.push(signature);
                        let job: Arc<dyn Handler> = listener.clone();
                        jobs.push(job);
                    }
                }
                table.insert(event, listeners);
            }
        }

        self.shared.queue.register(jobs)
    }

    /// Names of all registered typed events, sorted
    pub fn registered_events(&self) -> Vec<String> {
        let table = self
            .shared
            .events
            .read()
            .unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = table.keys().cloned().collect();
        names.sort();
        names
    }

    /// Build a task that dispatches a registered typed event with the
    /// given arguments, after passing them through the event's `handle`
    pub fn task<E: Event>(&self, event: &E, args: Payload) -> Result<EventTask, EventError> {
        let name = event.event_name();
        let args = event.handle(args)?;
        let listeners = {
            let table = self
                .shared
                .events
                .read()
                .unwrap_or_else(|e| e.into_inner());
            table.get(&name).cloned().unwrap_or_default()
        };
        Ok(EventTask::new(
            Arc::clone(&self.shared.queue),
            name,
            args,
            listeners,
        ))
    }

    /// One dispatch pass over the gathered listeners.
    ///
    /// The queue decision comes first for each listener, against the
    /// current payload; queued listeners contribute no response. A failed
    /// invocation or queue submission aborts the pass. With `halt`, the
    /// first non-null response is returned alone. A `false` response stops
    /// propagation in either mode and is not collected.
    fn invoke_listeners(
        &self,
        event_name: &str,
        payload: &[Value],
        halt: bool,
    ) -> Result<Vec<Value>, EventError> {
        let listeners = self.listeners_for_event(event_name);
        let mut responses = Vec::new();

        for listener in listeners {
            if listener.wants_queue(payload) {
                queue_listener(self.shared.queue.as_ref(), &listener, event_name, payload)?;
                continue;
            }

            let response = listener.invoke(event_name, payload)?;

            if halt && !response.is_null() {
                return Ok(vec![response]);
            }

            if response == Value::Bool(false) {
                break;
            }

            responses.push(response);
        }

        Ok(responses)
    }

    /// Exact-name listeners followed by wildcard listeners, via the cache.
    ///
    /// Listeners are cloned out of the registry so no lock is held during
    /// invocation. A cache miss upgrades to the write lock and re-checks
    /// before rebuilding, so readers never see a stale entry.
    fn listeners_for_event(&self, event_name: &str) -> Vec<Listener> {
        {
            let registry = self
                .shared
                .registry
                .read()
                .unwrap_or_else(|e| e.into_inner());
            if let Some(listeners) = registry.lookup(event_name) {
                return listeners;
            }
        }

        let mut registry = self
            .shared
            .registry
            .write()
            .unwrap_or_else(|e| e.into_inner());
        registry.resolve(event_name)
    }
}

/// Resolve a typed event into its canonical name and single-element payload
fn typed_event<E: Event>(event: &E) -> Result<(String, Payload), EventError> {
    let name = event.event_name();
    let value = serde_json::to_value(event)?;
    Ok((name, vec![value]))
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;

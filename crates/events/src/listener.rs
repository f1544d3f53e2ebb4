// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener shapes and invocation

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::error::EventError;

/// Boxed callable listener
pub type CallableFn = Arc<dyn Fn(&[Value]) -> Result<Value, EventError> + Send + Sync>;

/// A structured listener with a stable identity.
pub trait Handler: Send + Sync {
    /// Unique identifier, used for queue job registration
    fn signature(&self) -> String;

    /// Handle the event payload
    fn handle(&self, payload: &[Value]) -> Result<(), EventError>;
}

/// A handler that may defer its execution to the work queue.
///
/// `should_queue` is consulted once per dispatch with the first payload
/// element; it is never memoized across dispatches. The remaining methods
/// configure the submitted job and default to the backend's defaults.
pub trait QueueableHandler: Handler {
    /// Whether this dispatch should be deferred to the queue
    fn should_queue(&self, event: Option<&Value>) -> bool {
        let _ = event;
        true
    }

    /// Connection to submit the job on
    fn via_connection(&self) -> Option<String> {
        None
    }

    /// Queue name to submit the job on
    fn via_queue(&self) -> Option<String> {
        None
    }

    /// Delay before the job becomes available
    fn with_delay(&self) -> Duration {
        Duration::ZERO
    }
}

/// A registered listener.
///
/// The shape is fixed at registration time: a closure that may return a
/// response, a structured handler, or a handler that can elect queueing
/// per dispatch.
#[derive(Clone)]
pub enum Listener {
    Callable(CallableFn),
    Handler(Arc<dyn Handler>),
    Queueable(Arc<dyn QueueableHandler>),
}

impl Listener {
    /// Wrap a closure returning a response value
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, EventError> + Send + Sync + 'static,
    {
        Self::Callable(Arc::new(f))
    }

    /// Wrap a structured handler
    pub fn handler(handler: Arc<dyn Handler>) -> Self {
        Self::Handler(handler)
    }

    /// Wrap a queue-capable handler
    pub fn queueable(handler: Arc<dyn QueueableHandler>) -> Self {
        Self::Queueable(handler)
    }

    /// Invoke the listener synchronously.
    ///
    /// Handler-backed listeners carry no return value; the response is
    /// always `Null` on that path.
    pub(crate) fn invoke(&self, event_name: &str, payload: &[Value]) -> Result<Value, EventError> {
        tracing::trace!(event = %event_name, listener = ?self, "invoking listener");
        match self {
            Self::Callable(f) => f(payload),
            Self::Handler(h) => {
                h.handle(payload)?;
                Ok(Value::Null)
            }
            Self::Queueable(h) => {
                h.handle(payload)?;
                Ok(Value::Null)
            }
        }
    }

    /// Whether this dispatch should hand the listener to the queue.
    /// Evaluated against the current payload on every dispatch.
    pub(crate) fn wants_queue(&self, payload: &[Value]) -> bool {
        match self {
            Self::Queueable(h) => h.should_queue(payload.first()),
            _ => false,
        }
    }

    /// Queue submission options, present only for queue-capable listeners
    pub(crate) fn queue_options(&self) -> Option<QueueOptions> {
        match self {
            Self::Queueable(h) => Some(QueueOptions {
                connection: h.via_connection(),
                queue: h.via_queue(),
                delay: h.with_delay(),
            }),
            _ => None,
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callable(_) => f.write_str("Callable"),
            Self::Handler(h) => write!(f, "Handler({})", h.signature()),
            Self::Queueable(h) => write!(f, "Queueable({})", h.signature()),
        }
    }
}

/// Per-listener queue submission options
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QueueOptions {
    pub connection: Option<String>,
    pub queue: Option<String>,
    pub delay: Duration,
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event tasks for registered typed events

use std::sync::Arc;

use crate::error::EventError;
use crate::event::Payload;
use crate::listener::{Listener, QueueableHandler};
use crate::queue::{queue_listener, Queue};

/// A pending dispatch of a registered typed event.
///
/// Each listener either goes to the queue (per its own `should_queue`
/// against the task arguments) or runs synchronously on the calling
/// thread, failing fast on the first error.
pub struct EventTask {
    queue: Arc<dyn Queue>,
    event_name: String,
    args: Payload,
    listeners: Vec<Arc<dyn QueueableHandler>>,
}

impl EventTask {
    pub(crate) fn new(
        queue: Arc<dyn Queue>,
        event_name: String,
        args: Payload,
        listeners: Vec<Arc<dyn QueueableHandler>>,
    ) -> Self {
        Self {
            queue,
            event_name,
            args,
            listeners,
        }
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Run every listener registered for the event
    pub fn dispatch(&self) -> Result<(), EventError> {
        for handler in &self.listeners {
            let listener = Listener::Queueable(handler.clone());
            if listener.wants_queue(&self.args) {
                queue_listener(
                    self.queue.as_ref(),
                    &listener,
                    &self.event_name,
                    &self.args,
                )?;
            } else {
                handler.handle(&self.args)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;

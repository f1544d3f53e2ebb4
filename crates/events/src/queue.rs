// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Work queue contract and the queued listener job

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::error::EventError;
use crate::event::Payload;
use crate::listener::{Handler, Listener};

/// External work queue collaborator.
///
/// The dispatcher only describes work and returns immediately; execution,
/// ordering, retries, and backpressure are the backend's concern.
pub trait Queue: Send + Sync {
    /// Create a pending job for a queued listener
    fn job(&self, job: QueuedListenerJob) -> Box<dyn PendingJob>;

    /// Pre-register known listener jobs with the backend
    fn register(&self, jobs: Vec<Arc<dyn Handler>>) -> Result<(), EventError>;
}

/// A job accepted by the queue but not yet submitted.
/// All configuration is optional and chainable.
pub trait PendingJob: Send {
    /// Submit on a named connection
    fn on_connection(self: Box<Self>, connection: &str) -> Box<dyn PendingJob>;

    /// Submit on a named queue
    fn on_queue(self: Box<Self>, queue: &str) -> Box<dyn PendingJob>;

    /// Hold the job until the given instant
    fn delay(self: Box<Self>, available_at: DateTime<Utc>) -> Box<dyn PendingJob>;

    /// Hand the job to the backend
    fn dispatch(self: Box<Self>) -> Result<(), EventError>;
}

/// A queued listener invocation: the listener, the event name it matched,
/// and the payload it was dispatched with.
pub struct QueuedListenerJob {
    id: Uuid,
    listener: Listener,
    event_name: String,
    payload: Payload,
}

impl QueuedListenerJob {
    pub fn new(listener: Listener, event_name: impl Into<String>, payload: Payload) -> Self {
        Self {
            id: Uuid::new_v4(),
            listener,
            event_name: event_name.into(),
            payload,
        }
    }

    /// Unique id of this submission
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Job identity, stable per event name
    pub fn signature(&self) -> String {
        format!("queued_listener:{}", self.event_name)
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Execute the wrapped listener.
    ///
    /// The response, if any, is discarded: queued listeners never
    /// contribute to the triggering dispatch's result set.
    pub fn handle(&self) -> Result<(), EventError> {
        self.listener
            .invoke(&self.event_name, &self.payload)
            .map(|_| ())
    }
}

/// Submit a listener to the queue, applying only the options the listener
/// actually configures
pub(crate) fn queue_listener(
    queue: &dyn Queue,
    listener: &Listener,
    event_name: &str,
    payload: &[Value],
) -> Result<(), EventError> {
    let job = QueuedListenerJob::new(listener.clone(), event_name, payload.to_vec());
    let job_id = job.id();
    let mut pending = queue.job(job);

    if let Some(options) = listener.queue_options() {
        if let Some(connection) = options.connection {
            pending = pending.on_connection(&connection);
        }
        if let Some(queue_name) = options.queue {
            pending = pending.on_queue(&queue_name);
        }
        if !options.delay.is_zero() {
            pending = pending.delay(Utc::now() + options.delay);
        }
    }

    tracing::debug!(event = %event_name, job = %job_id, "listener handed to queue");
    pending
        .dispatch()
        .map_err(|e| EventError::Queue(Box::new(e)))
}

/// Queue driver that executes jobs inline at submission time.
///
/// Plays the role of the framework's sync driver: `dispatch` runs the job
/// on the calling thread and connection/queue/delay options are accepted
/// and ignored.
#[derive(Debug, Default, Clone)]
pub struct SyncQueue;

impl SyncQueue {
    pub fn new() -> Self {
        Self
    }
}

impl Queue for SyncQueue {
    fn job(&self, job: QueuedListenerJob) -> Box<dyn PendingJob> {
        Box::new(SyncPendingJob { job })
    }

    fn register(&self, _jobs: Vec<Arc<dyn Handler>>) -> Result<(), EventError> {
        Ok(())
    }
}

struct SyncPendingJob {
    job: QueuedListenerJob,
}

impl PendingJob for SyncPendingJob {
    fn on_connection(self: Box<Self>, _connection: &str) -> Box<dyn PendingJob> {
        self
    }

    fn on_queue(self: Box<Self>, _queue: &str) -> Box<dyn PendingJob> {
        self
    }

    fn delay(self: Box<Self>, _available_at: DateTime<Utc>) -> Box<dyn PendingJob> {
        self
    }

    fn dispatch(self: Box<Self>) -> Result<(), EventError> {
        self.job.handle()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;

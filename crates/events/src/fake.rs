// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake queue collaborator for tests

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::error::EventError;
use crate::listener::Handler;
use crate::queue::{PendingJob, Queue, QueuedListenerJob};

/// A recorded queue submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeSubmission {
    pub signature: String,
    pub event_name: String,
    pub connection: Option<String>,
    pub queue: Option<String>,
    pub delayed: bool,
}

/// Queue collaborator that records submissions without executing them.
///
/// Clones share state, so a test can hand one clone to the dispatcher and
/// inspect the other.
#[derive(Default, Clone)]
pub struct FakeQueue {
    submissions: Arc<Mutex<Vec<FakeSubmission>>>,
    registered: Arc<Mutex<Vec<String>>>,
}

impl FakeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submissions dispatched so far, in submission order
    pub fn submissions(&self) -> Vec<FakeSubmission> {
        self.submissions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Signatures pre-registered via `register`, in order
    pub fn registered(&self) -> Vec<String> {
        self.registered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Queue for FakeQueue {
    fn job(&self, job: QueuedListenerJob) -> Box<dyn PendingJob> {
        Box::new(FakePendingJob {
            submissions: Arc::clone(&self.submissions),
            submission: FakeSubmission {
                signature: job.signature(),
                event_name: job.event_name().to_string(),
                connection: None,
                queue: None,
                delayed: false,
            },
        })
    }

    fn register(&self, jobs: Vec<Arc<dyn Handler>>) -> Result<(), EventError> {
        let mut registered = self.registered.lock().unwrap_or_else(|e| e.into_inner());
        registered.extend(jobs.iter().map(|job| job.signature()));
        Ok(())
    }
}

struct FakePendingJob {
    submissions: Arc<Mutex<Vec<FakeSubmission>>>,
    submission: FakeSubmission,
}

impl PendingJob for FakePendingJob {
    fn on_connection(mut self: Box<Self>, connection: &str) -> Box<dyn PendingJob> {
        self.submission.connection = Some(connection.to_string());
        self
    }

    fn on_queue(mut self: Box<Self>, queue: &str) -> Box<dyn PendingJob> {
        self.submission.queue = Some(queue.to_string());
        self
    }

    fn delay(mut self: Box<Self>, _available_at: DateTime<Utc>) -> Box<dyn PendingJob> {
        self.submission.delayed = true;
        self
    }

    fn dispatch(self: Box<Self>) -> Result<(), EventError> {
        let mut submissions = self.submissions.lock().unwrap_or_else(|e| e.into_inner());
        submissions.push(self.submission);
        Ok(())
    }
}

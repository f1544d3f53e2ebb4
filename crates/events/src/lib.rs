//! rill-events: event dispatch engine for the rill framework
//!
//! This crate provides:
//! - A listener registry with exact-name and wildcard registrations
//! - Synchronous dispatch with collect-all (`dispatch`) and
//!   halt-on-first-response (`until`) modes
//! - A per-listener queue-or-sync execution policy backed by an external
//!   work queue collaborator
//! - A deferred (push/flush) event buffer
//!
//! The dispatcher is an in-process registry: it does not persist queued
//! jobs, drain the queue, or deliver events across processes.

pub mod error;
pub mod event;
pub mod fake;
pub mod listener;
pub mod pattern;
pub mod queue;
pub mod subscriber;
pub mod task;

mod deferred;
mod dispatcher;
mod registry;

// Re-exports
pub use dispatcher::EventDispatcher;
pub use error::EventError;
pub use event::{Event, Payload};
pub use fake::{FakeQueue, FakeSubmission};
pub use listener::{CallableFn, Handler, Listener, QueueableHandler};
pub use pattern::EventPattern;
pub use queue::{PendingJob, Queue, QueuedListenerJob, SyncQueue};
pub use subscriber::Subscriber;
pub use task::EventTask;

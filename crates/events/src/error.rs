// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for event dispatch

use thiserror::Error;

/// Errors surfaced by the event dispatcher
#[derive(Debug, Error)]
pub enum EventError {
    #[error("event name cannot be empty")]
    EmptyEventName,
    #[error("at least one listener is required")]
    NoListeners,
    #[error("event payload cannot be serialized: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("listener error: {0}")]
    Listener(String),
    #[error("failed to queue listener: {0}")]
    Queue(Box<EventError>),
}

impl EventError {
    /// Build a listener-raised error from any displayable cause
    pub fn listener(message: impl Into<String>) -> Self {
        Self::Listener(message.into())
    }
}

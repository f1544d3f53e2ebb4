// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed events and the payload envelope

use serde::Serialize;
use serde_json::Value;

use crate::error::EventError;

/// Ordered payload values handed to listeners
pub type Payload = Vec<Value>;

/// A typed event dispatched by value.
///
/// The canonical name defaults to the type name with the module path
/// stripped, so `events::UserRegistered` dispatches as `"UserRegistered"`.
/// `handle` can rewrite task arguments before listeners see them and is the
/// identity by default.
pub trait Event: Serialize {
    /// Canonical name used to resolve listeners
    fn event_name(&self) -> String {
        short_type_name(std::any::type_name::<Self>()).to_string()
    }

    /// Transform task arguments before they reach listeners
    fn handle(&self, args: Payload) -> Result<Payload, EventError> {
        Ok(args)
    }
}

/// Strip the module path (and any generic arguments) from a fully
/// qualified type name
pub(crate) fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;

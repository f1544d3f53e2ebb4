// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener registry with a wildcard resolution cache

use std::collections::HashMap;

use crate::error::EventError;
use crate::listener::Listener;
use crate::pattern::EventPattern;

/// Exact-name and wildcard listener lists plus a per-event-name cache of
/// resolved wildcard listeners.
///
/// Pure data structure; the dispatcher owns the lock around it. Listener
/// order is insertion order, and wildcard patterns are kept in registration
/// order so gathered listeners are deterministic.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    listeners: HashMap<String, Vec<Listener>>,
    wildcards: Vec<(EventPattern, Vec<Listener>)>,
    wildcard_cache: HashMap<String, Vec<Listener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append listeners under an exact name or wildcard pattern.
    ///
    /// Any wildcard-side mutation drops the whole cache; entries are never
    /// patched in place.
    pub fn listen(&mut self, event: &str, listeners: Vec<Listener>) -> Result<(), EventError> {
        if event.is_empty() {
            return Err(EventError::EmptyEventName);
        }
        if listeners.is_empty() {
            return Err(EventError::NoListeners);
        }

        let pattern = EventPattern::new(event);
        if pattern.is_wildcard() {
            match self.wildcards.iter_mut().find(|(p, _)| *p == pattern) {
                Some((_, existing)) => existing.extend(listeners),
                None => self.wildcards.push((pattern, listeners)),
            }
            self.wildcard_cache.clear();
        } else {
            self.listeners
                .entry(event.to_string())
                .or_default()
                .extend(listeners);
        }

        Ok(())
    }

    /// True if the exact-name list is non-empty or any wildcard matches
    pub fn has_listeners(&self, event_name: &str) -> bool {
        if self
            .listeners
            .get(event_name)
            .is_some_and(|listeners| !listeners.is_empty())
        {
            return true;
        }

        self.wildcards
            .iter()
            .any(|(pattern, _)| pattern.matches(event_name))
    }

    /// Remove an exact-name entry, or a wildcard pattern plus the cache
    pub fn forget(&mut self, event_name: &str) {
        if event_name.contains('*') {
            self.wildcards
                .retain(|(pattern, _)| pattern.as_str() != event_name);
            self.wildcard_cache.clear();
        } else {
            self.listeners.remove(event_name);
        }
    }

    /// Gathered listeners for an event: exact-name first, then cached
    /// wildcard listeners. Returns `None` on a cache miss so the caller can
    /// upgrade to a write lock and call `resolve`.
    pub fn lookup(&self, event_name: &str) -> Option<Vec<Listener>> {
        let cached = self.wildcard_cache.get(event_name)?;

        let mut all = self
            .listeners
            .get(event_name)
            .cloned()
            .unwrap_or_default();
        all.extend(cached.iter().cloned());
        Some(all)
    }

    /// Gathered listeners for an event, filling the wildcard cache on miss
    pub fn resolve(&mut self, event_name: &str) -> Vec<Listener> {
        if let Some(all) = self.lookup(event_name) {
            return all;
        }

        let resolved: Vec<Listener> = self
            .wildcards
            .iter()
            .filter(|(pattern, _)| pattern.matches(event_name))
            .flat_map(|(_, listeners)| listeners.iter().cloned())
            .collect();
        self.wildcard_cache
            .insert(event_name.to_string(), resolved.clone());

        let mut all = self
            .listeners
            .get(event_name)
            .cloned()
            .unwrap_or_default();
        all.extend(resolved);
        all
    }

    #[cfg(test)]
    pub fn cached_wildcards(&self, event_name: &str) -> Option<usize> {
        self.wildcard_cache.get(event_name).map(Vec::len)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

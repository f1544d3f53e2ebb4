// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event name pattern matching

/// Pattern for matching event names.
///
/// A pattern without `*` matches by exact string equality. A pattern
/// containing `*` matches any name carrying the text before the first `*`
/// as a prefix and the text after the last `*` as a suffix; matching is
/// purely prefix/suffix based, so `user.*` also matches `user` and `userx`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventPattern(String);

impl EventPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// True if the pattern contains a wildcard
    pub fn is_wildcard(&self) -> bool {
        self.0.contains('*')
    }

    /// Check if this pattern matches an event name
    pub fn matches(&self, event_name: &str) -> bool {
        if !self.is_wildcard() {
            return self.0 == event_name;
        }

        let parts: Vec<&str> = self.0.split('*').collect();

        if let Some(prefix) = parts.first() {
            if !prefix.is_empty() && !event_name.starts_with(prefix) {
                return false;
            }
        }

        if parts.len() > 1 {
            if let Some(suffix) = parts.last() {
                if !suffix.is_empty() && !event_name.ends_with(suffix) {
                    return false;
                }
            }
        }

        true
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;

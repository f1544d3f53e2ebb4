// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event subscribers

use crate::dispatcher::EventDispatcher;
use crate::listener::Listener;

/// A value that registers multiple event/listener mappings at once.
///
/// `subscribe` returns ordered pairs; the dispatcher registers each pair
/// through `listen`, failing fast on the first bad pair with no rollback of
/// the pairs already registered.
pub trait Subscriber {
    fn subscribe(&self, dispatcher: &EventDispatcher) -> Vec<(String, Vec<Listener>)>;
}

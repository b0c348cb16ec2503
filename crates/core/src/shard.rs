// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shard: one partition of the in-flight key space
//!
//! A shard maps each in-flight key to the call that owns it. The map holds
//! an entry for a key exactly while an operation for that key is running.

use crate::stats::Stats;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A call that can be left behind by an owner that never finished
pub trait InFlight {
    /// Mark the call abandoned and wake its waiters.
    ///
    /// Returns false when the call had already completed.
    fn abandon(&self) -> bool;
}

/// Outcome of registering interest in a key
pub enum Registration<C> {
    /// The caller inserted the call and must execute the operation
    Owner(Arc<C>),
    /// Another caller owns the in-flight call; wait on it
    Waiter(Arc<C>),
}

/// A lock-protected map from key to in-flight call
pub struct Shard<C> {
    calls: RwLock<HashMap<String, Arc<C>>>,
}

impl<C> Shard<C> {
    pub fn new() -> Self {
        Self {
            calls: RwLock::new(HashMap::new()),
        }
    }

    /// Find the in-flight call for a key under the shared lock
    pub fn lookup(&self, key: &str) -> Option<Arc<C>> {
        self.calls
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    /// Insert a new call for `key` unless one is already registered.
    ///
    /// The existence check is repeated under the exclusive lock, so two
    /// callers racing past `lookup` cannot both become owners.
    pub fn register(&self, key: &str, make: impl FnOnce() -> C) -> Registration<C> {
        let mut calls = self.calls.write().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = calls.get(key) {
            return Registration::Waiter(Arc::clone(existing));
        }

        let call = Arc::new(make());
        calls.insert(key.to_string(), Arc::clone(&call));
        Registration::Owner(call)
    }

    /// Fast path followed by the slow path: the whole join step of a request
    pub fn join(&self, key: &str, make: impl FnOnce() -> C) -> Registration<C> {
        match self.lookup(key) {
            Some(call) => Registration::Waiter(call),
            None => self.register(key, make),
        }
    }

    /// Remove the entry for `key` if it still belongs to `call`.
    ///
    /// Returns true when an entry was removed.
    pub fn remove(&self, key: &str, call: &Arc<C>) -> bool {
        let mut calls = self.calls.write().unwrap_or_else(|e| e.into_inner());
        match calls.get(key) {
            Some(current) if Arc::ptr_eq(current, call) => {
                calls.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Number of keys currently in flight
    pub fn len(&self) -> usize {
        self.calls.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C> Default for Shard<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cleanup held by the owner of a call while its operation runs.
///
/// Dropping the guard removes the shard entry. If the call never completed
/// (the operation panicked or the owning future was dropped) the entry is
/// removed first and the call is then abandoned, so woken waiters start a
/// fresh generation instead of finding the dead call again.
pub(crate) struct OwnerGuard<'a, C: InFlight> {
    shard: &'a Shard<C>,
    key: &'a str,
    call: Arc<C>,
    stats: &'a Stats,
}

impl<'a, C: InFlight> OwnerGuard<'a, C> {
    pub(crate) fn new(shard: &'a Shard<C>, key: &'a str, call: Arc<C>, stats: &'a Stats) -> Self {
        Self {
            shard,
            key,
            call,
            stats,
        }
    }
}

impl<C: InFlight> Drop for OwnerGuard<'_, C> {
    fn drop(&mut self) {
        self.shard.remove(self.key, &self.call);
        if self.call.abandon() {
            self.stats.record_abandoned();
            tracing::warn!(key = self.key, "owner exited before completing, waiters released");
        }
    }
}

#[cfg(test)]
#[path = "shard_tests.rs"]
mod tests;

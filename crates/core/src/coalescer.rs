// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blocking single-flight coalescer
//!
//! Concurrent [`Coalescer::run`] calls for the same key share one execution
//! of the operation. The first caller to register the key becomes the owner
//! and runs it with no lock held; everyone arriving while it runs blocks on
//! the call and receives a clone of the owner's result. Once the owner has
//! published the result the key is released, and the next caller starts a
//! new generation. Nothing is cached between generations.

use crate::call::Call;
use crate::config::{CoalescerConfig, ConfigError};
use crate::routing::{shard_index, DEFAULT_SHARD_COUNT};
use crate::shard::{OwnerGuard, Registration, Shard};
use crate::stats::{Stats, StatsSnapshot};
use std::sync::Arc;
use std::time::Instant;

/// Sharded single-flight coalescer for blocking callers
pub struct Coalescer<T, E> {
    shards: Box<[Shard<Call<T, E>>]>,
    stats: Stats,
}

impl<T: Clone, E: Clone> Coalescer<T, E> {
    /// Create a coalescer with the default shard count
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARD_COUNT)
    }

    /// Create a coalescer from validated configuration
    pub fn with_config(config: &CoalescerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_shards(config.shards))
    }

    fn with_shards(count: usize) -> Self {
        Self {
            shards: (0..count.max(1)).map(|_| Shard::new()).collect(),
            stats: Stats::default(),
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Run `f` for `key`, or wait for the run already in flight.
    ///
    /// Every caller that overlaps the owner's execution gets the same
    /// `Ok` or `Err`. Failures are passed through untouched. If the owner
    /// panics, its waiters are released and retry as a new generation.
    pub fn run<F>(&self, key: &str, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let index = shard_index(key, self.shards.len());
        let shard = &self.shards[index];

        let call = loop {
            match shard.join(key, Call::new) {
                Registration::Owner(call) => break call,
                Registration::Waiter(call) => {
                    tracing::trace!(key, shard = index, "joining in-flight call");
                    if let Some(result) = call.wait() {
                        self.stats.record_coalesced();
                        return result;
                    }
                    tracing::debug!(key, shard = index, "in-flight call abandoned, retrying");
                }
            }
        };

        self.stats.record_execution();
        let guard = OwnerGuard::new(shard, key, Arc::clone(&call), &self.stats);

        tracing::debug!(key, shard = index, "executing");
        let start = Instant::now();
        let result = call.complete(f());
        drop(guard);

        tracing::debug!(
            key,
            shard = index,
            ok = result.is_ok(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "completed"
        );
        result
    }

    /// Number of keys currently in flight across all shards
    pub fn in_flight(&self) -> usize {
        self.shards.iter().map(Shard::len).sum()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl<T: Clone, E: Clone> Default for Coalescer<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "coalescer_tests.rs"]
mod tests;

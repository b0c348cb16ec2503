// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-flight coalescer for async callers
//!
//! Same protocol as [`crate::Coalescer`], but waiters suspend on a
//! `tokio::sync::watch` channel instead of blocking their thread. Dropping
//! the owner's future before it finishes releases the key and wakes the
//! waiters, which then start a new generation.

use crate::config::{CoalescerConfig, ConfigError};
use crate::routing::{shard_index, DEFAULT_SHARD_COUNT};
use crate::shard::{InFlight, OwnerGuard, Registration, Shard};
use crate::stats::{Stats, StatsSnapshot};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

enum Slot<T, E> {
    Pending,
    Done(Result<T, E>),
    Abandoned,
}

/// One in-flight generation whose result is broadcast over a watch channel
pub struct AsyncCall<T, E> {
    tx: watch::Sender<Slot<T, E>>,
}

impl<T: Clone, E: Clone> AsyncCall<T, E> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Slot::Pending);
        Self { tx }
    }

    /// Publish the owner's result to every waiter and hand it back
    pub fn complete(&self, result: Result<T, E>) -> Result<T, E> {
        self.tx.send_if_modified(|slot| {
            if matches!(slot, Slot::Pending) {
                *slot = Slot::Done(result.clone());
                true
            } else {
                false
            }
        });
        result
    }

    /// Wait until the call settles; `None` if the owner went away
    pub async fn wait(&self) -> Option<Result<T, E>> {
        let mut rx = self.tx.subscribe();
        let slot = rx
            .wait_for(|slot| !matches!(slot, Slot::Pending))
            .await
            .ok()?;
        if let Slot::Done(result) = &*slot {
            return Some(result.clone());
        }
        None
    }
}

impl<T: Clone, E: Clone> Default for AsyncCall<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> InFlight for AsyncCall<T, E> {
    fn abandon(&self) -> bool {
        self.tx.send_if_modified(|slot| {
            if matches!(slot, Slot::Pending) {
                *slot = Slot::Abandoned;
                true
            } else {
                false
            }
        })
    }
}

/// Sharded single-flight coalescer for async callers
pub struct AsyncCoalescer<T, E> {
    shards: Box<[Shard<AsyncCall<T, E>>]>,
    stats: Stats,
}

impl<T: Clone, E: Clone> AsyncCoalescer<T, E> {
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARD_COUNT)
    }

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

    /// Run the future produced by `f` for `key`, or await the one in flight.
    ///
    /// The shard lock is never held across an await point.
    pub async fn run<F, Fut>(&self, key: &str, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let index = shard_index(key, self.shards.len());
        let shard = &self.shards[index];

        let call = loop {
            match shard.join(key, AsyncCall::new) {
                Registration::Owner(call) => break call,
                Registration::Waiter(call) => {
                    tracing::trace!(key, shard = index, "joining in-flight call");
                    if let Some(result) = call.wait().await {
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
        let result = call.complete(f().await);
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

    pub fn in_flight(&self) -> usize {
        self.shards.iter().map(Shard::len).sum()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl<T: Clone, E: Clone> Default for AsyncCoalescer<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "async_coalescer_tests.rs"]
mod tests;

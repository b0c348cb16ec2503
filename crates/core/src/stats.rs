// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coalescer counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by every caller of a coalescer
#[derive(Debug, Default)]
pub(crate) struct Stats {
    executions: AtomicU64,
    coalesced: AtomicU64,
    abandoned: AtomicU64,
}

impl Stats {
    pub(crate) fn record_execution(&self) {
        self.executions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_coalesced(&self) {
        self.coalesced.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_abandoned(&self) {
        self.abandoned.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        let executions = self.executions.load(Ordering::Relaxed);
        let coalesced = self.coalesced.load(Ordering::Relaxed);
        StatsSnapshot {
            calls: executions + coalesced,
            executions,
            coalesced,
            abandoned: self.abandoned.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a coalescer's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Calls that returned a result, executed or coalesced
    pub calls: u64,
    /// Operations actually executed by an owner
    pub executions: u64,
    /// Callers served a result they did not execute
    pub coalesced: u64,
    /// Generations whose owner exited without a result
    pub abandoned: u64,
}

impl std::fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "calls: {}, executions: {}, coalesced: {}, abandoned: {}",
            self.calls, self.executions, self.coalesced, self.abandoned
        )
    }
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;

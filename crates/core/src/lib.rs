// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! herd-core: single-flight request coalescing
//!
//! This crate provides:
//! - A sharded index of in-flight calls keyed by string
//! - A blocking coalescer for thread-based callers
//! - An async coalescer for tokio-based callers
//! - Configuration and counters shared by both

pub mod config;

mod async_coalescer;
mod call;
mod coalescer;
mod routing;
mod shard;
mod stats;

pub use async_coalescer::{AsyncCall, AsyncCoalescer};
pub use call::Call;
pub use coalescer::Coalescer;
pub use config::{CoalescerConfig, ConfigError, HerdConfig};
pub use routing::{shard_index, DEFAULT_SHARD_COUNT};
pub use shard::{InFlight, Registration, Shard};
pub use stats::StatsSnapshot;

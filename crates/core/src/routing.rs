// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Key to shard routing

/// Number of shards a coalescer allocates unless configured otherwise
pub const DEFAULT_SHARD_COUNT: usize = 32;

/// Map a key to a shard index in `0..shards`.
///
/// Uses CRC-32 over the key bytes, so the mapping is the same in every
/// process and never changes for a given shard count. A shard count of
/// zero is treated as one.
pub fn shard_index(key: &str, shards: usize) -> usize {
    crc32fast::hash(key.as_bytes()) as usize % shards.max(1)
}

#[cfg(test)]
#[path = "routing_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One in-flight execution and its completion latch

use crate::shard::InFlight;
use std::sync::{Condvar, Mutex};

enum CallState<T, E> {
    Pending,
    Done(Result<T, E>),
    Abandoned,
}

/// The shared state of one generation for a key.
///
/// Only the owner writes the result, exactly once. Waiters block on the
/// condvar until the state leaves `Pending`, so a result is never read
/// before it is published.
pub struct Call<T, E> {
    state: Mutex<CallState<T, E>>,
    settled: Condvar,
}

impl<T: Clone, E: Clone> Call<T, E> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CallState::Pending),
            settled: Condvar::new(),
        }
    }

    /// Publish the owner's result to every waiter and hand it back
    pub fn complete(&self, result: Result<T, E>) -> Result<T, E> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if matches!(*state, CallState::Pending) {
            *state = CallState::Done(result.clone());
            self.settled.notify_all();
        }
        result
    }

    /// Block until the call settles.
    ///
    /// Returns `None` if the owner exited without producing a result.
    pub fn wait(&self) -> Option<Result<T, E>> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let state = self
            .settled
            .wait_while(state, |s| matches!(s, CallState::Pending))
            .unwrap_or_else(|e| e.into_inner());

        match &*state {
            CallState::Done(result) => Some(result.clone()),
            CallState::Pending | CallState::Abandoned => None,
        }
    }

    /// Whether the call has left the pending state
    pub fn is_settled(&self) -> bool {
        !matches!(
            *self.state.lock().unwrap_or_else(|e| e.into_inner()),
            CallState::Pending
        )
    }
}

impl<T: Clone, E: Clone> Default for Call<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> InFlight for Call<T, E> {
    fn abandon(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !matches!(*state, CallState::Pending) {
            return false;
        }
        *state = CallState::Abandoned;
        self.settled.notify_all();
        true
    }
}

#[cfg(test)]
#[path = "call_tests.rs"]
mod tests;

/*
 * signal.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Staffetta, a format-agnostic request/response layer.
 *
 * Staffetta is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Staffetta is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Staffetta.  If not, see <http://www.gnu.org/licenses/>.
 */

//! One-shot completion signal bridging asynchronous delivery to an optional
//! blocking wait. Exactly one resolution wins; later attempts are no-ops.
//! The waiter is a plain calling thread, so this is a condvar-guarded
//! optional value rather than a task-oriented channel.

use std::sync::{Condvar, Mutex, MutexGuard};

use crate::transport::NetworkError;

/// Terminal state of one request.
#[derive(Debug, Clone)]
pub enum SignalOutcome {
    /// Delivery completed. `None` is the cancellation sentinel: a cancelled
    /// request resolves with no value instead of raising, so a blocked
    /// caller always unblocks.
    Success(Option<String>),
    /// Delivery failed.
    Error(NetworkError),
}

impl SignalOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SignalOutcome::Success(None))
    }
}

/// Single-assignment signal. `resolve_success`/`resolve_error` may be
/// called from any thread; the first call fixes the outcome and wakes all
/// waiters, every later call is a logged no-op.
pub struct CompletionSignal {
    outcome: Mutex<Option<SignalOutcome>>,
    resolved: Condvar,
}

impl CompletionSignal {
    pub fn new() -> Self {
        Self {
            outcome: Mutex::new(None),
            resolved: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<SignalOutcome>> {
        // A waiter holds no state across the lock, so a poisoned mutex is
        // still safe to read through.
        self.outcome
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn resolve(&self, outcome: SignalOutcome) {
        let mut slot = self.lock();
        if slot.is_some() {
            log::debug!("completion signal already resolved, ignoring late resolution");
            return;
        }
        *slot = Some(outcome);
        self.resolved.notify_all();
    }

    pub fn resolve_success(&self, value: Option<String>) {
        self.resolve(SignalOutcome::Success(value));
    }

    pub fn resolve_error(&self, error: NetworkError) {
        self.resolve(SignalOutcome::Error(error));
    }

    /// Block the calling thread until the signal resolves.
    pub fn wait(&self) -> SignalOutcome {
        let mut slot = self.lock();
        loop {
            if let Some(outcome) = slot.as_ref() {
                return outcome.clone();
            }
            slot = self
                .resolved
                .wait(slot)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Outcome if already resolved, without blocking.
    pub fn try_outcome(&self) -> Option<SignalOutcome> {
        self.lock().clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.lock().is_some()
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use crate::transport::NetworkErrorKind;

    #[test]
    fn first_resolution_wins() {
        let signal = CompletionSignal::new();
        signal.resolve_success(Some("one".to_string()));
        signal.resolve_success(Some("two".to_string()));
        signal.resolve_error(NetworkError::new(NetworkErrorKind::Other, "late"));
        match signal.wait() {
            SignalOutcome::Success(Some(value)) => assert_eq!(value, "one"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn wait_blocks_until_resolved() {
        let signal = Arc::new(CompletionSignal::new());
        let resolver = Arc::clone(&signal);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            resolver.resolve_success(Some("done".to_string()));
        });
        let outcome = signal.wait();
        handle.join().unwrap();
        assert!(matches!(outcome, SignalOutcome::Success(Some(_))));
    }

    #[test]
    fn cancellation_sentinel_is_success_without_value() {
        let signal = CompletionSignal::new();
        signal.resolve_success(None);
        let outcome = signal.wait();
        assert!(outcome.is_cancelled());
    }

    #[test]
    fn try_outcome_does_not_block() {
        let signal = CompletionSignal::new();
        assert!(signal.try_outcome().is_none());
        assert!(!signal.is_resolved());
        signal.resolve_error(NetworkError::new(NetworkErrorKind::Timeout, "slow"));
        assert!(signal.is_resolved());
        assert!(matches!(signal.try_outcome(), Some(SignalOutcome::Error(_))));
    }
}

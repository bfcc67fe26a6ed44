//! Inline dispatch policy, implementing synchronous callback execution
//!
//! This policy follows the traditional pattern of running callbacks directly
//! on the thread which submitted them, before the dispatch call returns. No
//! concurrency is gained this way, but the hand-off protocol is preserved
//! exactly, which makes the policy useful for tests and for embeddings whose
//! "other execution context" happens to be the current thread.

use crate::dispatch::{DispatchCallback, DispatchPolicy};

/// Dispatch policy which invokes callbacks immediately on the calling thread
pub struct InlineDispatch;
//
impl InlineDispatch {
    /// Create a new inline dispatch policy
    pub fn new() -> Self {
        InlineDispatch
    }
}
//
impl Default for InlineDispatch {
    fn default() -> Self {
        Self::new()
    }
}
//
impl DispatchPolicy for InlineDispatch {
    /// Inline execution finishes before dispatch returns, so there is no
    /// meaningful handle to an in-flight request
    type Handle = ();

    fn dispatch(&self, mut callback: DispatchCallback) {
        while callback() {}
    }
}

/// Unit tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{DONT_RESCHEDULE, RESCHEDULE};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Check that a callback declining rescheduling runs exactly once
    #[test]
    fn one_shot_callback() {
        let count = Arc::new(AtomicUsize::new(0));
        let cb_count = count.clone();

        let policy = InlineDispatch::new();
        policy.dispatch(Box::new(move || {
            cb_count.fetch_add(1, Ordering::SeqCst);
            DONT_RESCHEDULE
        }));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    /// Check that rescheduling requests are honored until declined
    #[test]
    fn reschedule_until_declined() {
        let count = Arc::new(AtomicUsize::new(0));
        let cb_count = count.clone();

        let policy = InlineDispatch::new();
        policy.dispatch(Box::new(move || {
            let runs = cb_count.fetch_add(1, Ordering::SeqCst) + 1;
            if runs < 3 {
                RESCHEDULE
            } else {
                DONT_RESCHEDULE
            }
        }));
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}

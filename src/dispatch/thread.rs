//! Thread-based dispatch policy
//!
//! This policy gives each callback a dedicated worker thread, which invokes
//! it until it declines rescheduling and then exits. It is the simplest
//! policy that actually moves work off the submitting thread, and the one
//! the test suite uses to exercise cross-thread completion.

use crate::dispatch::{DispatchCallback, DispatchPolicy};
use std::thread::{self, JoinHandle};

/// Dispatch policy which runs each callback on its own worker thread
pub struct ThreadDispatch;
//
impl ThreadDispatch {
    /// Create a new thread-based dispatch policy
    pub fn new() -> Self {
        ThreadDispatch
    }
}
//
impl Default for ThreadDispatch {
    fn default() -> Self {
        Self::new()
    }
}
//
impl DispatchPolicy for ThreadDispatch {
    /// Join handle of the worker thread; dropping it detaches the worker
    type Handle = JoinHandle<()>;

    fn dispatch(&self, mut callback: DispatchCallback) -> JoinHandle<()> {
        log::trace!("handing callback to a dispatch worker thread");
        thread::spawn(move || while callback() {})
    }
}

/// Unit tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DONT_RESCHEDULE;
    use std::sync::mpsc;

    /// Check that the callback runs on a thread other than the caller's
    #[test]
    fn runs_off_thread() {
        let (sender, receiver) = mpsc::channel();

        let policy = ThreadDispatch::new();
        let handle = policy.dispatch(Box::new(move || {
            sender.send(thread::current().id()).unwrap();
            DONT_RESCHEDULE
        }));

        let callback_thread = receiver.recv().unwrap();
        assert_ne!(callback_thread, thread::current().id());
        handle.join().unwrap();
    }

    /// Check that the worker exits once the callback declines rescheduling
    #[test]
    fn worker_exits_after_decline() {
        let policy = ThreadDispatch::new();
        let handle = policy.dispatch(Box::new(|| DONT_RESCHEDULE));
        handle.join().unwrap();
    }
}

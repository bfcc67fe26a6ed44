//! One-shot completion signaling
//!
//! This module provides the synchronization primitive at the heart of every
//! synced call: a completion signal carrying the outcome of one foreign
//! operation. The signal splits completion into two steps, because the two
//! steps happen in two different concurrency domains:
//!
//! - Storing the outcome happens on whatever thread the dispatch policy chose
//!   to run the target function on.
//! - Marking the signal as set happens on the scheduling loop's thread, after
//!   the outcome has been marshalled back through the loop handle.
//!
//! A waiter therefore never resumes just because a result exists somewhere;
//! it resumes once the loop thread has acknowledged the completion. Each
//! signal is set exactly once and awaited by exactly one consumer.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

/// One-shot synchronization primitive with an attached result slot
///
/// Cloning a `Completion` clones a handle to the same underlying signal, so
/// that the dispatch callback and the awaiting caller can both reach it.
pub struct Completion<T, E> {
    inner: Arc<Mutex<Inner<T, E>>>,
}
//
impl<T, E> Completion<T, E> {
    /// Create a fresh, unset signal with an empty result slot
    pub fn new() -> Self {
        Completion {
            inner: Arc::new(Mutex::new(Inner {
                outcome: None,
                set: false,
                waker: None,
            })),
        }
    }

    /// Store the outcome of the target function
    ///
    /// This is called from the dispatch policy's execution context, and only
    /// fills the result slot. The waiter will not observe anything until the
    /// signal is subsequently marked as set from the loop thread.
    pub fn store(&self, outcome: Result<T, E>) {
        let mut inner = self.inner.lock().unwrap();
        debug_assert!(inner.outcome.is_none(), "completion outcome stored twice");
        inner.outcome = Some(outcome);
        log::trace!("completion outcome stored");
    }

    /// Mark the signal as set and wake the registered waiter, if any
    ///
    /// By protocol this runs on the scheduling loop's thread, scheduled there
    /// through the loop handle after the outcome was stored.
    pub fn set(&self) {
        let waker = {
            let mut inner = self.inner.lock().unwrap();
            debug_assert!(!inner.set, "completion signal set twice");
            debug_assert!(
                inner.outcome.is_some(),
                "completion signal set before its outcome was stored"
            );
            inner.set = true;
            inner.waker.take()
        };
        log::trace!("completion signal set");
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    /// Check whether the signal has been set
    pub fn is_set(&self) -> bool {
        self.inner.lock().unwrap().set
    }

    /// Produce the future which the signal's single consumer awaits
    pub fn wait(&self) -> CompletionWait<T, E> {
        CompletionWait {
            signal: self.clone(),
        }
    }
}
//
impl<T, E> Clone for Completion<T, E> {
    fn clone(&self) -> Self {
        Completion {
            inner: self.inner.clone(),
        }
    }
}
//
impl<T, E> Default for Completion<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// State shared between the storing, setting and waiting sides of a signal
struct Inner<T, E> {
    /// Outcome of the target function, filled in by the dispatch callback
    outcome: Option<Result<T, E>>,

    /// Whether the loop thread has acknowledged the completion
    set: bool,

    /// Waker of the consumer, if it started waiting before completion
    waker: Option<Waker>,
}

/// Future awaited by the single consumer of a completion signal
///
/// Resolves to the stored outcome once the signal has been marked as set.
/// Polling it again after it resolved is a contract violation and panics.
pub struct CompletionWait<T, E> {
    signal: Completion<T, E>,
}
//
impl<T, E> Future for CompletionWait<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut inner = self.signal.inner.lock().unwrap();
        if inner.set {
            let outcome = inner
                .outcome
                .take()
                .expect("completion outcome consumed twice");
            Poll::Ready(outcome)
        } else {
            inner.waker = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}

/// Unit tests
#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::task::{self, ArcWake};
    use std::pin::pin;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    /// Test waker which records whether it was woken
    struct WakeFlag(AtomicBool);
    //
    impl ArcWake for WakeFlag {
        fn wake_by_ref(arc_self: &Arc<Self>) {
            arc_self.0.store(true, Ordering::SeqCst);
        }
    }

    /// Check the initial state of a fresh signal
    #[test]
    fn initial_state() {
        let signal = Completion::<u32, ()>::new();
        assert!(!signal.is_set());
    }

    /// Check that storing an outcome alone does not resolve the waiter
    #[test]
    fn store_does_not_resume() {
        let signal = Completion::<u32, ()>::new();
        signal.store(Ok(42));

        let waker = task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut wait = pin!(signal.wait());
        assert!(wait.as_mut().poll(&mut cx).is_pending());
        assert!(!signal.is_set());
    }

    /// Check that setting the signal resolves the waiter with the outcome
    #[test]
    fn set_resumes_with_outcome() {
        let signal = Completion::<u32, ()>::new();
        signal.store(Ok(42));
        signal.set();

        let waker = task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut wait = pin!(signal.wait());
        assert_eq!(wait.as_mut().poll(&mut cx), Poll::Ready(Ok(42)));
    }

    /// Check that a failure outcome travels through the signal unchanged
    #[test]
    fn failure_outcome() {
        let signal = Completion::<u32, &str>::new();
        signal.store(Err("out of biscuits"));
        signal.set();

        let waker = task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut wait = pin!(signal.wait());
        assert_eq!(
            wait.as_mut().poll(&mut cx),
            Poll::Ready(Err("out of biscuits"))
        );
    }

    /// Check that a waiter registered before completion gets woken by set
    #[test]
    fn set_wakes_registered_waiter() {
        let signal = Completion::<u32, ()>::new();

        // Register a waiter before the outcome exists
        let flag = Arc::new(WakeFlag(AtomicBool::new(false)));
        let waker = task::waker(flag.clone());
        let mut cx = Context::from_waker(&waker);
        let mut wait = pin!(signal.wait());
        assert!(wait.as_mut().poll(&mut cx).is_pending());
        assert!(!flag.0.load(Ordering::SeqCst));

        // Complete the signal and check that the waiter was woken
        signal.store(Ok(7));
        signal.set();
        assert!(flag.0.load(Ordering::SeqCst));
        assert_eq!(wait.as_mut().poll(&mut cx), Poll::Ready(Ok(7)));
    }

    /// Check that storing from another thread is visible after set
    #[test]
    fn cross_thread_store() {
        let signal = Completion::<u32, ()>::new();
        let storer = signal.clone();
        thread::spawn(move || storer.store(Ok(1234)))
            .join()
            .unwrap();
        signal.set();

        let waker = task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut wait = pin!(signal.wait());
        assert_eq!(wait.as_mut().poll(&mut cx), Poll::Ready(Ok(1234)));
    }
}

//! Single-threaded cooperative scheduling loop
//!
//! This module provides a minimal scheduling loop which drives one future to
//! completion on the current thread, while accepting actions injected from
//! other threads through its [`LoopHandle`]. It runs one step of work at a
//! time: drain the injected actions, poll the future, and park the thread
//! when neither made progress.
//!
//! Parking uses a small three-state machine (empty, parked, notified) so that
//! a wakeup racing with the decision to park is never lost: a notification
//! arriving just before the park takes effect turns the park into a no-op.

use crate::scheduler::LoopHandle;
use futures_util::pin_mut;
use futures_util::task::{self, ArcWake};
use std::cell::Cell;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::task::{Context, Poll};

const EMPTY: usize = 0;
const PARKED: usize = 1;
const NOTIFIED: usize = 2;

/// Action injected into the loop from another thread
type Action = Box<dyn FnOnce() + Send + 'static>;

/// Cooperative scheduling loop driving futures on its owner's thread
pub struct LocalLoop {
    /// State shared with the handles given out to other threads
    shared: Arc<Shared>,

    /// Guard against re-entering `run` from inside a driven future
    running: Cell<bool>,
}
//
impl LocalLoop {
    /// Create a new scheduling loop
    pub fn new() -> Self {
        LocalLoop {
            shared: Arc::new(Shared {
                actions: Mutex::new(VecDeque::new()),
                state: AtomicUsize::new(EMPTY),
                lock: Mutex::new(()),
                cvar: Condvar::new(),
            }),
            running: Cell::new(false),
        }
    }

    /// Obtain a thread-safe handle designating this loop
    pub fn handle(&self) -> LocalHandle {
        LocalHandle {
            shared: self.shared.clone(),
        }
    }

    /// Drive `future` to completion on the current thread
    ///
    /// Injected actions run between polls, on this thread. The calling thread
    /// sleeps whenever the future is pending and no actions are queued.
    pub fn run<T>(&self, future: impl Future<Output = T>) -> T {
        if self.running.replace(true) {
            panic!("cannot run a scheduling loop recursively");
        }

        let waker = task::waker(self.shared.clone());
        let mut cx = Context::from_waker(&waker);
        pin_mut!(future);

        let output = loop {
            // Run whatever the other domain has marshalled over so far
            self.shared.drain();

            // One cooperative step of the driven future
            if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                break output;
            }

            // Actions injected during the poll may have unblocked the future
            if self.shared.drain() {
                continue;
            }

            // Nothing to do until someone notifies us
            self.shared.park();
        };

        self.running.set(false);
        output
    }
}
//
impl Default for LocalLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe handle designating a [`LocalLoop`]
#[derive(Clone)]
pub struct LocalHandle {
    shared: Arc<Shared>,
}
//
impl LoopHandle for LocalHandle {
    fn call_soon<A>(&self, action: A)
    where
        A: FnOnce() + Send + 'static,
    {
        log::trace!("scheduling an action onto the loop thread");
        self.shared
            .actions
            .lock()
            .unwrap()
            .push_back(Box::new(action));
        self.shared.unpark();
    }
}

/// State shared between a loop and its handles
struct Shared {
    /// Actions waiting to run on the loop thread, in submission order
    actions: Mutex<VecDeque<Action>>,

    /// Parking state machine (EMPTY / PARKED / NOTIFIED)
    state: AtomicUsize,

    /// Mutex backing the condition variable below
    lock: Mutex<()>,

    /// Condition variable on which the parked loop thread sleeps
    cvar: Condvar,
}
//
impl Shared {
    /// Run every queued action on the current thread, FIFO
    ///
    /// The queue lock is released while each action runs, so actions may
    /// themselves schedule further actions.
    fn drain(&self) -> bool {
        let mut ran_any = false;
        loop {
            let action = self.actions.lock().unwrap().pop_front();
            match action {
                Some(action) => {
                    action();
                    ran_any = true;
                }
                None => break,
            }
        }
        ran_any
    }

    /// Put the loop thread to sleep until notified
    fn park(&self) {
        // A notification which arrived before we got here is consumed now
        if self
            .state
            .compare_exchange(NOTIFIED, EMPTY, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            return;
        }

        let mut guard = self.lock.lock().unwrap();
        match self
            .state
            .compare_exchange(EMPTY, PARKED, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) => {}
            Err(NOTIFIED) => {
                let _old = self.state.swap(EMPTY, Ordering::SeqCst);
                return;
            }
            Err(_) => panic!("invalid park state"),
        }

        loop {
            guard = self.cvar.wait(guard).unwrap();
            if self
                .state
                .compare_exchange(NOTIFIED, EMPTY, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return;
            }
        }
    }

    /// Wake the loop thread, or make its next park a no-op
    fn unpark(&self) {
        match self.state.swap(NOTIFIED, Ordering::SeqCst) {
            EMPTY | NOTIFIED => return,
            PARKED => {}
            _ => panic!("invalid park state"),
        }

        // The parking thread must be past its state transition before the
        // notification is sent
        drop(self.lock.lock().unwrap());
        self.cvar.notify_one();
    }
}
//
impl ArcWake for Shared {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.unpark();
    }
}

//! Synchronizing callback-dispatched operations with awaiting code
//!
//! This module is the adapter the crate exists for. [`bind`] takes a dispatch
//! policy and a target function and produces a synced function: a callable
//! with the target's signature whose invocations return futures. Awaiting
//! such a future suspends the calling task until the dispatch policy has run
//! the target somewhere else and its outcome has been marshalled back onto
//! the scheduling loop.
//!
//! Each invocation is an independent little state machine: idle until its
//! callback is handed to the policy, dispatched until the loop thread marks
//! its completion signal, then completed with exactly one observable outcome.
//! Invoking the synced function again starts a fresh state machine; nothing
//! is shared between calls beyond the captured loop handle, policy and
//! target.
//!
//! Two limitations are inherited from the underlying hand-off model and are
//! deliberately not papered over:
//!
//! - If the dispatch policy never invokes its callback, the awaiting task
//!   never resumes. There is no timeout and no detection here; bound the wait
//!   at the application level if the policy is not trusted.
//! - The awaitable must be driven by the loop designated at bind time.
//!   Driving it from an unrelated thread leaves resumption undefined.

use crate::dispatch::{DispatchCallback, DispatchPolicy, DONT_RESCHEDULE};
use crate::scheduler::LoopHandle;
use crate::signal::{Completion, CompletionWait};
use crate::target::{FnMeta, Target, TargetMeta};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Bind a target function to a dispatch policy and a scheduling loop
///
/// The returned synced function can be called repeatedly and concurrently;
/// every call dispatches one execution of `target` under `policy` and returns
/// a future resolving to that execution's outcome.
///
/// `handle` must designate the loop whose tasks will await the returned
/// function. Completion signaling is marshalled onto that loop, so awaiting
/// from anywhere else leaves resumption undefined.
pub fn bind<H, P, F>(handle: H, policy: P, target: F) -> SyncedFn<H, P, F> {
    SyncedFn {
        handle,
        policy,
        target: Arc::new(target),
    }
}

/// A target function wrapped for invocation from cooperative context
///
/// Holds only the captured loop handle, dispatch policy and target; all
/// per-call state lives in the future returned by [`SyncedFn::call`].
pub struct SyncedFn<H, P, F> {
    /// Loop onto which completion signaling is marshalled
    handle: H,

    /// Strategy deciding where the target actually runs
    policy: P,

    /// The wrapped target function, shared with in-flight callbacks
    target: Arc<F>,
}
//
impl<H, P, F: TargetMeta> SyncedFn<H, P, F> {
    /// Metadata of the wrapped target function
    pub fn meta(&self) -> FnMeta {
        self.target.meta()
    }

    /// Name of the wrapped target function
    pub fn name(&self) -> &'static str {
        self.target.meta().name
    }

    /// Documentation of the wrapped target function
    pub fn doc(&self) -> &'static str {
        self.target.meta().doc
    }
}
//
impl<H, P, F> SyncedFn<H, P, F>
where
    H: LoopHandle,
    P: DispatchPolicy,
{
    /// Dispatch one execution of the target and return its awaitable outcome
    ///
    /// The dispatch is fire and forget: this method hands a callback to the
    /// policy and returns immediately, without blocking the calling thread.
    /// The returned future must be awaited from a task driven by the loop
    /// captured at bind time. Dropping it without awaiting does not stop the
    /// dispatched execution; the target still runs, its outcome unobserved.
    pub fn call<Args>(&self, args: Args) -> SyncCall<F::Output, F::Error, P::Handle>
    where
        F: Target<Args> + Send + Sync + 'static,
        F::Output: Send + 'static,
        F::Error: Send + 'static,
        Args: Send + 'static,
    {
        let signal = Completion::new();

        // The callback owns everything one execution needs. The arguments are
        // consumed on the first invocation; a policy which invokes again
        // anyway gets a refusal and nothing else.
        let target = self.target.clone();
        let handle = self.handle.clone();
        let cb_signal = signal.clone();
        let mut pending_args = Some(args);
        let callback: DispatchCallback = Box::new(move || {
            if let Some(args) = pending_args.take() {
                let outcome = target.invoke(args);
                cb_signal.store(outcome);

                // Completion must be acknowledged from the loop thread, never
                // from here
                let done = cb_signal.clone();
                handle.call_soon(move || done.set());
            }
            DONT_RESCHEDULE
        });

        log::trace!("dispatching a synced call through the policy");
        let dispatch = self.policy.dispatch(callback);

        SyncCall {
            wait: signal.wait(),
            _dispatch: dispatch,
        }
    }
}

/// Future resolving to the outcome of one synced call
///
/// Keeps the policy's dispatch handle alive until the call completes or the
/// future is dropped, whichever comes first.
pub struct SyncCall<T, E, D> {
    /// Waiting side of this call's completion signal
    wait: CompletionWait<T, E>,

    /// Handle returned by the dispatch policy, held but never inspected
    _dispatch: D,
}
//
impl<T, E, D> Unpin for SyncCall<T, E, D> {}
//
impl<T, E, D> Future for SyncCall<T, E, D> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().wait).poll(cx)
    }
}

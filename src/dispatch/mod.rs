//! Dispatch policies
//!
//! A dispatch policy is the strategy which decides where and when a callback
//! actually runs: on a dedicated worker thread, on a GUI toolkit's main
//! thread, from a timer, and so on. The policy is supplied by the embedding
//! system; this module only pins down its contract and provides two simple
//! implementations that in-process embeddings and the test suite can use:
//!
//! - Inline dispatch runs the callback immediately on the calling thread. It
//!   has minimal scheduling overhead, but gives up the main benefit of
//!   dispatching, namely keeping slow work off the current thread.
//! - Thread dispatch hands each callback to a dedicated worker thread, which
//!   is the setting the synchronizer was designed around.
//!
//! The callback protocol is inherited from callback-driven schedulers: the
//! callback returns a flag telling the policy whether it should be invoked
//! again. A conforming policy invokes the callback at least once, eventually,
//! on some thread of its choosing, and stops invoking it after it declines.

pub mod inline;
pub mod thread;
// TODO: Add a thread pool dispatch policy

/// Callback hand-off format understood by every dispatch policy
///
/// The callback takes no arguments and returns whether it wants to run again.
pub type DispatchCallback = Box<dyn FnMut() -> bool + Send + 'static>;

/// Callback return value requesting another invocation
pub const RESCHEDULE: bool = true;

/// Callback return value declining any further invocation
pub const DONT_RESCHEDULE: bool = false;

/// Strategy arranging for callbacks to run on some other execution context
pub trait DispatchPolicy {
    /// Handle to one in-flight dispatch request
    ///
    /// What this is depends on the policy: a thread join handle, a timer
    /// identifier, or nothing at all. The synchronizer keeps it alive until
    /// the corresponding call completes, but never inspects it.
    type Handle;

    /// Arrange for `callback` to be invoked, then return without waiting
    ///
    /// The policy must invoke the callback at least once, eventually. It must
    /// keep invoking it until the callback returns [`DONT_RESCHEDULE`].
    fn dispatch(&self, callback: DispatchCallback) -> Self::Handle;
}

//! Scheduling loop contract
//!
//! The synchronizer does not run a scheduling loop of its own. It only needs
//! one capability from whichever cooperative scheduler the embedding system
//! uses: a thread-safe way to get a small action executed on the loop's
//! thread, as soon as the loop is ready for it. That capability is what the
//! [`LoopHandle`] trait captures, and it is the only operation in this crate
//! which crosses from the dispatch policy's execution context back into the
//! loop's.
//!
//! A reference loop implementing the contract lives in [`local`]; tests and
//! the demo binary drive their futures with it. Any scheduler offering an
//! equivalent "call soon, thread-safe" primitive can stand in for it.

pub mod local;

/// Handle designating one cooperative scheduling loop
///
/// Handles are cheap to clone and safe to send to other threads; the loop
/// they designate stays put. All completion signaling for calls bound through
/// one handle is marshalled back onto that loop's thread.
pub trait LoopHandle: Clone + Send + 'static {
    /// Schedule `action` to run on the loop's thread as soon as possible
    ///
    /// Safe to call from any thread. Actions are run in submission order,
    /// interleaved with the loop's own polling of suspended work.
    fn call_soon<A>(&self, action: A)
    where
        A: FnOnce() + Send + 'static;
}

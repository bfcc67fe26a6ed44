//! Awaiting callback-dispatched operations
//!
//! Picture a codebase built around a cooperative scheduling loop, which needs
//! to call into an older component that only speaks callbacks: hand it a
//! closure, and it will run that closure later, on a thread of its own
//! choosing. The two styles do not compose. Awaiting code wants a future; the
//! legacy component wants to fire a callback and forget about it; and the
//! result of the work surfaces on the wrong thread, where it is not safe to
//! resume a suspended task directly.
//!
//! This crate provides the one adapter needed to make that composition safe.
//! [`bind`] wraps a target function together with a dispatch policy (the
//! "run this callback later, elsewhere" strategy) and a handle to the
//! scheduling loop. Calling the resulting synced function dispatches one
//! execution of the target and returns a future; awaiting that future
//! suspends the caller until the target has run in the foreign context and
//! its outcome, value or failure, has been marshalled back onto the loop's
//! thread. The outcome then resolves the future, exactly once.
//!
//! # Example
//! ```no_run
//! use synced_ops::{bind, FnTarget, LocalLoop, ThreadDispatch};
//!
//! let lp = LocalLoop::new();
//! let double = FnTarget::new("double", "Double the input.", |x: u64| {
//!     Ok::<_, std::convert::Infallible>(x * 2)
//! });
//! let synced = bind(lp.handle(), ThreadDispatch::new(), double);
//!
//! let result = lp.run(async { synced.call(21).await });
//! assert_eq!(result, Ok(42));
//! ```

pub mod dispatch;
pub mod scheduler;
pub mod signal;
pub mod sync;
pub mod target;

pub use dispatch::inline::InlineDispatch;
pub use dispatch::thread::ThreadDispatch;
pub use dispatch::{DispatchCallback, DispatchPolicy};
pub use scheduler::local::{LocalHandle, LocalLoop};
pub use scheduler::LoopHandle;
pub use signal::Completion;
pub use sync::{bind, SyncCall, SyncedFn};
pub use target::{FnMeta, FnTarget, Partial, Target, TargetMeta};

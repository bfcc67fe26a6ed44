//! Target functions and their metadata
//!
//! A synced function should be indistinguishable from the function it wraps,
//! and that includes introspection: debugging tooling that asks the wrapper
//! for its name or documentation should receive the target's. Plain closures
//! carry no such metadata in Rust, so this module provides a thin adapter
//! layer instead:
//!
//! - `FnTarget` attaches a name and documentation to a closure.
//! - `Partial` pre-applies the first argument of a two-argument target while
//!   forwarding the inner target's metadata untouched.
//!
//! Targets report failures through `Result`; the error type is chosen by the
//! embedding application.

/// Name and documentation of a target function
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FnMeta {
    /// Short identifier of the target, typically its function name
    pub name: &'static str,

    /// One-line documentation of what the target does
    pub doc: &'static str,
}

/// Access to a target's metadata, independent of its calling signature
pub trait TargetMeta {
    /// Metadata describing the target function
    fn meta(&self) -> FnMeta;
}

/// A function which can be run under a dispatch policy
///
/// `Args` is the full argument list, packed into a tuple when there is more
/// than one argument. The target is invoked synchronously on whatever thread
/// the dispatch policy selected, so implementors must be prepared to run off
/// the scheduling loop's thread.
pub trait Target<Args>: TargetMeta {
    /// Successful result of the target
    type Output;

    /// Failure reported by the target
    type Error;

    /// Run the target with the given arguments
    fn invoke(&self, args: Args) -> Result<Self::Output, Self::Error>;
}

/// Adapter attaching metadata to a plain closure
pub struct FnTarget<F> {
    name: &'static str,
    doc: &'static str,
    f: F,
}
//
impl<F> FnTarget<F> {
    /// Wrap a closure together with its name and documentation
    pub fn new(name: &'static str, doc: &'static str, f: F) -> Self {
        FnTarget { name, doc, f }
    }
}
//
impl<F> TargetMeta for FnTarget<F> {
    fn meta(&self) -> FnMeta {
        FnMeta {
            name: self.name,
            doc: self.doc,
        }
    }
}
//
impl<F, Args, T, E> Target<Args> for FnTarget<F>
where
    F: Fn(Args) -> Result<T, E>,
{
    type Output = T;
    type Error = E;

    fn invoke(&self, args: Args) -> Result<T, E> {
        (self.f)(args)
    }
}

/// Partial application of a two-argument target
///
/// The first argument is fixed up front and cloned into every invocation;
/// the resulting target takes the remaining argument alone. Metadata still
/// reports the inner target, so a partially applied function keeps the name
/// and documentation of the function it was built from.
pub struct Partial<F, A> {
    inner: F,
    first: A,
}
//
impl<F, A> Partial<F, A> {
    /// Fix the first argument of `inner`
    pub fn new(inner: F, first: A) -> Self {
        Partial { inner, first }
    }
}
//
impl<F, A> TargetMeta for Partial<F, A>
where
    F: TargetMeta,
{
    fn meta(&self) -> FnMeta {
        self.inner.meta()
    }
}
//
impl<F, A, B> Target<B> for Partial<F, A>
where
    F: Target<(A, B)>,
    A: Clone,
{
    type Output = F::Output;
    type Error = F::Error;

    fn invoke(&self, args: B) -> Result<Self::Output, Self::Error> {
        self.inner.invoke((self.first.clone(), args))
    }
}

/// Unit tests
#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    /// Check that a wrapped closure reports its metadata
    #[test]
    fn fn_target_meta() {
        let target = FnTarget::new("double", "Double the input.", |x: i32| {
            Ok::<_, Infallible>(x * 2)
        });
        assert_eq!(target.meta().name, "double");
        assert_eq!(target.meta().doc, "Double the input.");
    }

    /// Check that a wrapped closure still computes what it used to
    #[test]
    fn fn_target_invoke() {
        let target = FnTarget::new("double", "Double the input.", |x: i32| {
            Ok::<_, Infallible>(x * 2)
        });
        assert_eq!(target.invoke(21), Ok(42));
    }

    /// Check that partial application fixes the first argument
    #[test]
    fn partial_invoke() {
        let add = FnTarget::new("add", "Add two numbers.", |(a, b): (i32, i32)| {
            Ok::<_, Infallible>(a + b)
        });
        let add_forty = Partial::new(add, 40);
        assert_eq!(add_forty.invoke(2), Ok(42));
        assert_eq!(add_forty.invoke(3), Ok(43));
    }

    /// Check that partial application preserves the inner metadata
    #[test]
    fn partial_meta() {
        let add = FnTarget::new("add", "Add two numbers.", |(a, b): (i32, i32)| {
            Ok::<_, Infallible>(a + b)
        });
        let add_forty = Partial::new(add, 40);
        assert_eq!(add_forty.meta().name, "add");
        assert_eq!(add_forty.meta().doc, "Add two numbers.");
    }
}

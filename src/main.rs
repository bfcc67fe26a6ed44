//! Small demonstration of synced calls over a worker-thread dispatch policy
//!
//! The demo builds a local scheduling loop, binds two target functions (one
//! infallible, one not) through the thread dispatch policy, and awaits them
//! from cooperative context. Run with `RUST_LOG=trace` to watch the hand-off
//! between the two concurrency domains.

use futures_util::future;
use synced_ops::{bind, FnTarget, LocalLoop, Partial, ThreadDispatch};
use thiserror::Error;

/// Errors of the fallible demo target
#[derive(Clone, Debug, Error, PartialEq)]
enum DemoError {
    #[error("unknown flag `{0}`")]
    UnknownFlag(&'static str),
}

fn main() {
    env_logger::init();

    // One loop drives everything in this demo
    let lp = LocalLoop::new();

    // A target which cannot fail, dispatched to a worker thread
    let double = FnTarget::new("double", "Double the input.", |x: u64| {
        Ok::<_, DemoError>(x * 2)
    });
    let double = bind(lp.handle(), ThreadDispatch::new(), double);
    println!("bound `{}`: {}", double.name(), double.doc());

    let answer = lp.run(async { double.call(21).await });
    println!("double(21) -> {answer:?}");
    assert_eq!(answer, Ok(42));

    // A target which can fail; the failure surfaces to the awaiter unchanged
    let parse_flag = FnTarget::new("parse_flag", "Parse an on/off flag.", |s: &'static str| {
        match s {
            "on" => Ok(true),
            "off" => Ok(false),
            other => Err(DemoError::UnknownFlag(other)),
        }
    });
    let parse_flag = bind(lp.handle(), ThreadDispatch::new(), parse_flag);
    println!("bound `{}`: {}", parse_flag.name(), parse_flag.doc());

    let (good, bad) =
        lp.run(async { future::join(parse_flag.call("on"), parse_flag.call("sideways")).await });
    println!("parse_flag(\"on\") -> {good:?}");
    println!("parse_flag(\"sideways\") -> {bad:?}");
    assert_eq!(good, Ok(true));
    assert_eq!(bad, Err(DemoError::UnknownFlag("sideways")));

    // Partial application keeps the metadata of the underlying target
    let add = FnTarget::new("add", "Add two numbers.", |(a, b): (u64, u64)| {
        Ok::<_, DemoError>(a + b)
    });
    let add_forty = bind(lp.handle(), ThreadDispatch::new(), Partial::new(add, 40));
    println!("bound `{}` (partially applied): {}", add_forty.name(), add_forty.doc());

    let sum = lp.run(async { add_forty.call(2).await });
    println!("add(40, 2) -> {sum:?}");
    assert_eq!(sum, Ok(42));
}

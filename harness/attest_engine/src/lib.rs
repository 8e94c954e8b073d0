//! attest engine — dependency resolution and execution.
//!
//! Takes a populated [`Environment`](attest_core::Environment), produces a
//! deterministic, cycle-safe execution order for its suites, and runs them
//! under a caller-supplied [`Control`](attest_core::Control) policy:
//!
//! ```
//! use attest_core::{check, Environment};
//! use attest_engine::Runner;
//!
//! let mut env = Environment::new();
//! let arith = env
//!     .build_suite("arith")
//!     .test("adds", |ctx| {
//!         check!(ctx, 2 + 2 == 4);
//!         Ok(())
//!     })
//!     .id();
//! assert_eq!(env.suite(arith).tests().len(), 1);
//! Runner::new().run(&env);
//! ```
//!
//! Everything observable about a run flows through the control's hooks;
//! `run` itself returns nothing. [`ConsoleControl`] is the minimal
//! reporting policy substituted when no control is supplied.

mod clock;
mod console;
mod filter;
mod resolve;
mod runner;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use console::ConsoleControl;
pub use filter::{NameFilter, TagFilter};
pub use resolve::{resolve_order, ResolveError};
pub use runner::Runner;

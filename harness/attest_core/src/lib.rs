//! attest core — suite registry, result model, and control contracts.
//!
//! This crate contains the data model and extension points of the attest
//! harness:
//! - [`Environment`], [`Suite`], [`Test`]: the static object graph built
//!   by explicit registration before a run
//! - [`Outcome`] and the record hierarchy ([`AssertRecord`] →
//!   [`TestRecord`] → [`SuiteRecord`] → [`RunRecord`]) with the monotonic
//!   merge rule
//! - [`Control`]: the injected policy consulted at every decision point
//! - [`Filter`]/[`FilterSet`]: inclusion predicates applied before
//!   resolution
//! - [`TestContext`] and the [`check!`] macro: how bodies record asserts
//!
//! The resolver and execution engine live in `attest_engine`; nothing in
//! this crate runs anything.

mod context;
mod control;
mod descriptor;
mod fault;
mod filter;
mod outcome;
mod record;
mod registry;

pub use context::TestContext;
pub use control::{Control, Directive};
pub use descriptor::{Descriptor, SuiteId, TestId};
pub use fault::{BodyResult, Fault};
pub use filter::{Filter, FilterSet};
pub use outcome::Outcome;
pub use record::{AssertRecord, RunRecord, SuiteRecord, TestRecord};
pub use registry::{with_default_env, Environment, Hook, HookFn, Suite, SuiteBuilder, Test, TestFn};

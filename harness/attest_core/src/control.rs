//! The control policy: the injected decision-maker for everything
//! non-deterministic about a run.
//!
//! The engine owns the mechanics (ordering, lifecycle, aggregation) and
//! routes every judgement call — what a fault means, whether a failed
//! dependency is fatal, whether a test should run again — through exactly
//! one [`Control`] implementation, borrowed for the duration of the run.

use crate::descriptor::{Descriptor, SuiteId, TestId};
use crate::record::{AssertRecord, RunRecord, SuiteRecord, TestRecord};
use crate::registry::Environment;

/// A decision returned from a control hook.
///
/// Only a subset is meaningful at each call site; see the individual hook
/// documentation. A directive outside the meaningful subset is treated as
/// the site's most severe interpretation, except where noted.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Directive {
    /// Carry on, recording what happened (a faulted test body records one
    /// synthetic failing assert).
    Proceed,
    /// Carry on as if nothing happened.
    Ignore,
    /// Terminate the entire run; records collected so far are kept.
    Abort,
    /// Terminate the current suite (or skip the suite about to run), then
    /// continue with the next suite.
    AbortCurrent,
    /// Run the just-finished test again.
    Repeat,
}

/// Decision and observation hooks for one run.
///
/// The four decision hooks are required; the observation hooks default to
/// no-ops. All hooks receive the environment so handles can be resolved to
/// descriptors.
pub trait Control {
    /// A run is about to execute its resolved suite order.
    fn on_run_begin(&mut self, _env: &Environment) {}

    /// A suite is about to be checked and run.
    fn on_suite_begin(&mut self, _env: &Environment, _suite: SuiteId) {}

    /// A test is about to make its first attempt.
    fn on_test_begin(&mut self, _env: &Environment, _test: TestId) {}

    /// An assertion was just recorded.
    fn on_assert(&mut self, _env: &Environment, _record: &AssertRecord) {}

    /// An attempt of a test finished. Return `true` to discard the attempt
    /// and run the same test again; the final attempt is the one kept.
    fn on_test_end(&mut self, _env: &Environment, _record: &TestRecord) -> bool {
        false
    }

    /// A suite finished (or was skipped and force-marked unknown).
    fn on_suite_end(&mut self, _env: &Environment, _record: &SuiteRecord) {}

    /// The run finished. The run record is only observable here; `run`
    /// itself returns nothing.
    fn on_run_end(&mut self, _env: &Environment, _record: &RunRecord) {}

    /// A test body or lifecycle hook faulted. Meaningful: [`Directive::Abort`],
    /// [`Directive::AbortCurrent`], [`Directive::Ignore`], and — for test
    /// bodies only — [`Directive::Proceed`] (records a synthetic failing
    /// assert).
    fn on_fault(&mut self, env: &Environment, at: &Descriptor) -> Directive;

    /// A declared dependency did not pass. Meaningful:
    /// [`Directive::Ignore`] (keep checking the remaining dependencies) and
    /// [`Directive::AbortCurrent`] (skip the dependent suite, continue the
    /// run); anything else aborts the run.
    fn on_dependency_failed(
        &mut self,
        env: &Environment,
        dependent: SuiteId,
        dependency: SuiteId,
        record: &SuiteRecord,
    ) -> Directive;

    /// A dependency name resolved to no runnable suite. Meaningful:
    /// [`Directive::Ignore`] (drop the edge); anything else fails
    /// resolution.
    fn on_unknown_dependency(&mut self, env: &Environment, from: SuiteId, name: &str)
        -> Directive;

    /// The dependency graph cannot be ordered. `implicated` holds the
    /// suites on the detected cycle. The run aborts regardless of the
    /// returned directive.
    fn on_unsolvable(&mut self, env: &Environment, implicated: &[SuiteId]) -> Directive;
}

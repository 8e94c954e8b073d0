//! The execution engine: runs a resolved suite order under a control
//! policy.
//!
//! One suite at a time, one test at a time, strictly sequential. The
//! registry is read-only for the whole run; control and filters are
//! borrowed for the duration of the call. Every user body goes through a
//! protected call that maps a fault to a control consultation, and abort
//! decisions are honored only at these well-defined boundaries.

use std::time::Duration;

use attest_core::{
    AssertRecord, Control, Directive, Environment, FilterSet, Hook, Outcome, RunRecord, SuiteId,
    SuiteRecord, TestContext, TestId, TestRecord,
};

use crate::clock::{Clock, MonotonicClock};
use crate::console::ConsoleControl;
use crate::resolve::{resolve_order, ResolveError};

/// What the rest of the run should do after a protected call or a
/// dependency check.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Flow {
    Continue,
    /// Stop the current suite; the run continues with the next one.
    SkipSuite,
    /// Stop the whole run.
    AbortRun,
}

/// Runs environments. Owns nothing but the clock used for per-test
/// timing.
pub struct Runner {
    clock: Box<dyn Clock>,
}

impl Runner {
    /// Runner with the default monotonic clock.
    #[must_use]
    pub fn new() -> Self {
        Runner {
            clock: Box::new(MonotonicClock::new()),
        }
    }

    /// Runner with an injected clock (deterministic timing in tests).
    #[must_use]
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Runner { clock }
    }

    /// Run with the built-in console control and no filters.
    ///
    /// The console control is substituted for this call only; nothing is
    /// stored on the environment.
    pub fn run(&self, env: &Environment) {
        let mut console = ConsoleControl::new();
        self.run_with(env, &mut console, &FilterSet::new());
    }

    /// Run under a caller-supplied control and filter set.
    ///
    /// There is no return value: outcomes are observable only through the
    /// control's hooks (the full [`RunRecord`] arrives in `on_run_end`).
    pub fn run_with(&self, env: &Environment, control: &mut dyn Control, filters: &FilterSet<'_>) {
        let order = match resolve_order(env, filters, control) {
            Ok(order) => order,
            Err(error) => {
                tracing::warn!(%error, "aborting run: no execution order");
                if let ResolveError::Cycle { implicated } = &error {
                    let _ = control.on_unsolvable(env, implicated);
                }
                return;
            }
        };

        control.on_run_begin(env);
        let mut run = RunRecord::new();
        self.run_suites(env, control, filters, &order, &mut run);
        control.on_run_end(env, &run);
    }

    fn run_suites(
        &self,
        env: &Environment,
        control: &mut dyn Control,
        filters: &FilterSet<'_>,
        order: &[SuiteId],
        run: &mut RunRecord,
    ) {
        for &suite in order {
            tracing::debug!(suite = %suite, name = env.suite(suite).descriptor().name(), "running suite");
            control.on_suite_begin(env, suite);

            let mut record = SuiteRecord::new(suite);
            let flow = match Self::check_dependencies(env, control, suite, run) {
                Flow::Continue => self.run_suite(env, control, filters, suite, &mut record),
                blocked => {
                    record.force_unknown();
                    blocked
                }
            };

            control.on_suite_end(env, &record);
            run.push(record);

            if flow == Flow::AbortRun {
                tracing::warn!(suite = %suite, "run aborted");
                return;
            }
        }
    }

    /// Judge `suite`'s declared dependencies against the records collected
    /// so far. A dependency with no record had its edge dropped during
    /// resolution and is skipped.
    fn check_dependencies(
        env: &Environment,
        control: &mut dyn Control,
        suite: SuiteId,
        run: &RunRecord,
    ) -> Flow {
        for name in env.suite(suite).dependencies() {
            let Some(record) = run.suite_named(env, name) else {
                continue;
            };
            if record.outcome().is_pass() {
                continue;
            }
            match control.on_dependency_failed(env, suite, record.suite(), record) {
                Directive::Ignore => {}
                Directive::AbortCurrent => return Flow::SkipSuite,
                _ => return Flow::AbortRun,
            }
        }
        Flow::Continue
    }

    fn run_suite(
        &self,
        env: &Environment,
        control: &mut dyn Control,
        filters: &FilterSet<'_>,
        suite: SuiteId,
        record: &mut SuiteRecord,
    ) -> Flow {
        let spec = env.suite(suite);

        match run_hook(env, control, spec.init()) {
            Flow::Continue => {}
            flow => return flow,
        }

        for &test in spec.tests() {
            if !filters.allows_test(env, test) {
                continue;
            }
            control.on_test_begin(env, test);

            loop {
                let mut attempt = TestRecord::new(test);

                match run_hook(env, control, spec.fixture_enter()) {
                    Flow::Continue => {}
                    flow => return flow,
                }

                match self.run_body(env, control, test, &mut attempt) {
                    Flow::Continue => {}
                    Flow::SkipSuite => {
                        // Keep the faulting attempt's partial record.
                        record.push(attempt);
                        return Flow::SkipSuite;
                    }
                    Flow::AbortRun => return Flow::AbortRun,
                }

                match run_hook(env, control, spec.fixture_leave()) {
                    Flow::Continue => {}
                    flow => return flow,
                }

                if !control.on_test_end(env, &attempt) {
                    record.push(attempt);
                    break;
                }
                // Repeat requested: the attempt is discarded and the test
                // starts over with a fresh record.
            }
        }

        run_hook(env, control, spec.exit())
    }

    fn run_body(
        &self,
        env: &Environment,
        control: &mut dyn Control,
        test: TestId,
        attempt: &mut TestRecord,
    ) -> Flow {
        let spec = env.test(test);
        let body = spec.body();

        let begin = self.clock.now();
        let result = {
            let mut ctx = TestContext::new(env, attempt, control);
            body(&mut ctx)
        };

        match result {
            Ok(()) => {
                let end = self.clock.now();
                attempt.set_elapsed_ms(millis(end.saturating_sub(begin)));
                Flow::Continue
            }
            Err(fault) => {
                tracing::debug!(test = %test, %fault, "test body faulted");
                match control.on_fault(env, spec.descriptor()) {
                    Directive::Abort => Flow::AbortRun,
                    Directive::AbortCurrent => Flow::SkipSuite,
                    Directive::Proceed => {
                        attempt.push(AssertRecord::new(
                            spec.descriptor().clone(),
                            Outcome::Fail,
                            format!("unexpected fault: {fault}"),
                        ));
                        Flow::Continue
                    }
                    Directive::Ignore | Directive::Repeat => Flow::Continue,
                }
            }
        }
    }
}

impl Default for Runner {
    fn default() -> Self {
        Runner::new()
    }
}

/// Protected call of an optional lifecycle hook. `Proceed` and `Ignore`
/// both mean "carry on" here; `Repeat` has no meaning at a hook and falls
/// into the abort arm.
fn run_hook(env: &Environment, control: &mut dyn Control, hook: Option<&Hook>) -> Flow {
    let Some(hook) = hook else {
        return Flow::Continue;
    };
    match hook.call() {
        Ok(()) => Flow::Continue,
        Err(fault) => {
            tracing::debug!(hook = hook.descriptor().name(), %fault, "lifecycle hook faulted");
            match control.on_fault(env, hook.descriptor()) {
                Directive::Ignore | Directive::Proceed => Flow::Continue,
                Directive::AbortCurrent => Flow::SkipSuite,
                Directive::Abort | Directive::Repeat => Flow::AbortRun,
            }
        }
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}

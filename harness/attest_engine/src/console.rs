//! Minimal reporting control: plain-text progress on stdout, cautious
//! decisions everywhere.
//!
//! This is the policy substituted when a run is started without one. It
//! skips whatever misbehaves (`AbortCurrent` on faults, failed and
//! unknown dependencies) and gives up only on an unsolvable graph.

use attest_core::{
    Control, Descriptor, Directive, Environment, Outcome, RunRecord, SuiteId, SuiteRecord,
    TestRecord,
};

/// Console-reporting [`Control`] implementation.
#[derive(Debug, Default)]
pub struct ConsoleControl;

impl ConsoleControl {
    #[must_use]
    pub fn new() -> Self {
        ConsoleControl
    }
}

impl Control for ConsoleControl {
    fn on_suite_begin(&mut self, env: &Environment, suite: SuiteId) {
        println!("Running suite {}:", env.suite(suite).descriptor().name());
    }

    fn on_test_end(&mut self, env: &Environment, record: &TestRecord) -> bool {
        let name = env.test(record.test()).descriptor().name();
        match record.outcome() {
            Outcome::Pass => println!("  PASS: {} ({:.2}ms)", name, record.elapsed_ms()),
            Outcome::Fail => {
                println!("  FAIL: {name}");
                for assert in record.asserts() {
                    if assert.outcome().is_fail() {
                        let descriptor = assert.descriptor();
                        let file = env.display_file(descriptor);
                        if file.is_empty() {
                            println!("    {}", assert.message());
                        } else {
                            println!("    {} ({}:{})", assert.message(), file, descriptor.line());
                        }
                    }
                }
            }
            Outcome::Unknown => println!("  UNKNOWN: {name}"),
        }
        false
    }

    fn on_suite_end(&mut self, env: &Environment, record: &SuiteRecord) {
        let name = env.suite(record.suite()).descriptor().name();
        println!("suite {}: {}", name, record.outcome());
        println!();
    }

    fn on_run_end(&mut self, _env: &Environment, record: &RunRecord) {
        let mut passed = 0usize;
        let mut failed = 0usize;
        let mut unknown = 0usize;
        for suite in record.suites() {
            match suite.outcome() {
                Outcome::Pass => passed += 1,
                Outcome::Fail => failed += 1,
                Outcome::Unknown => unknown += 1,
            }
        }

        println!("Run summary:");
        println!(
            "  {} passed, {} failed, {} unknown ({} suites)",
            passed,
            failed,
            unknown,
            record.suites().len()
        );
        match record.outcome() {
            Outcome::Pass => println!("OK"),
            Outcome::Fail => println!("FAILED"),
            Outcome::Unknown => println!("UNKNOWN"),
        }
    }

    fn on_fault(&mut self, env: &Environment, at: &Descriptor) -> Directive {
        let file = env.display_file(at);
        if file.is_empty() {
            println!("  FAULT in {}", at.name());
        } else {
            println!("  FAULT in {} ({}:{})", at.name(), file, at.line());
        }
        Directive::AbortCurrent
    }

    fn on_dependency_failed(
        &mut self,
        env: &Environment,
        dependent: SuiteId,
        dependency: SuiteId,
        record: &SuiteRecord,
    ) -> Directive {
        println!(
            "  dependency {} required by {} did not pass ({})",
            env.suite(dependency).descriptor().name(),
            env.suite(dependent).descriptor().name(),
            record.outcome()
        );
        Directive::AbortCurrent
    }

    fn on_unknown_dependency(
        &mut self,
        env: &Environment,
        from: SuiteId,
        name: &str,
    ) -> Directive {
        println!(
            "  unresolvable dependency \"{}\" required by {}",
            name,
            env.suite(from).descriptor().name()
        );
        Directive::AbortCurrent
    }

    fn on_unsolvable(&mut self, env: &Environment, implicated: &[SuiteId]) -> Directive {
        println!("cannot order suites, dependency cycle through:");
        for &suite in implicated {
            println!("  {}", env.suite(suite).descriptor().name());
        }
        Directive::Abort
    }
}

//! Result records produced by one run.
//!
//! Records form the same three-level hierarchy as the registry: asserts
//! collect into a [`TestRecord`], test records into a [`SuiteRecord`],
//! suite records into a [`RunRecord`]. Every append folds the child's
//! outcome into the parent with [`Outcome::absorb`], so aggregation is
//! append-only and monotonic.

use crate::descriptor::{Descriptor, SuiteId, TestId};
use crate::outcome::Outcome;
use crate::registry::Environment;

/// One assertion emitted by a test body: outcome, message, and the
/// descriptor of the assertion site.
#[derive(Clone, Debug)]
pub struct AssertRecord {
    outcome: Outcome,
    message: String,
    descriptor: Descriptor,
}

impl AssertRecord {
    pub fn new(descriptor: Descriptor, outcome: Outcome, message: impl Into<String>) -> Self {
        AssertRecord {
            outcome,
            message: message.into(),
            descriptor,
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

/// All asserts produced by one attempt of one test, plus the elapsed wall
/// time of the body.
///
/// A repeated test gets a fresh record per attempt; attempts never share
/// assert lists.
#[derive(Clone, Debug)]
pub struct TestRecord {
    test: TestId,
    asserts: Vec<AssertRecord>,
    outcome: Outcome,
    elapsed_ms: f64,
}

impl TestRecord {
    #[must_use]
    pub fn new(test: TestId) -> Self {
        TestRecord {
            test,
            asserts: Vec::new(),
            outcome: Outcome::Pass,
            elapsed_ms: 0.0,
        }
    }

    pub fn push(&mut self, assert: AssertRecord) {
        self.outcome.absorb(assert.outcome());
        self.asserts.push(assert);
    }

    /// Elapsed milliseconds of the body. Zero until the body has returned
    /// normally once; faulted attempts keep zero.
    pub fn set_elapsed_ms(&mut self, elapsed_ms: f64) {
        self.elapsed_ms = elapsed_ms;
    }

    #[must_use]
    pub fn test(&self) -> TestId {
        self.test
    }

    #[must_use]
    pub fn asserts(&self) -> &[AssertRecord] {
        &self.asserts
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }
}

/// All test records produced by one run of one suite.
#[derive(Clone, Debug)]
pub struct SuiteRecord {
    suite: SuiteId,
    tests: Vec<TestRecord>,
    outcome: Outcome,
}

impl SuiteRecord {
    #[must_use]
    pub fn new(suite: SuiteId) -> Self {
        SuiteRecord {
            suite,
            tests: Vec::new(),
            outcome: Outcome::Pass,
        }
    }

    pub fn push(&mut self, test: TestRecord) {
        self.outcome.absorb(test.outcome());
        self.tests.push(test);
    }

    /// Mark the suite as not run (failed dependencies), discarding any
    /// recorded tests.
    pub fn force_unknown(&mut self) {
        self.tests.clear();
        self.outcome = Outcome::Unknown;
    }

    #[must_use]
    pub fn suite(&self) -> SuiteId {
        self.suite
    }

    #[must_use]
    pub fn tests(&self) -> &[TestRecord] {
        &self.tests
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Record of the named test, if it ran in this suite.
    #[must_use]
    pub fn test_named<'a>(&'a self, env: &Environment, name: &str) -> Option<&'a TestRecord> {
        self.tests
            .iter()
            .find(|t| env.test(t.test()).descriptor().name() == name)
    }
}

/// All suite records produced by one full run.
#[derive(Clone, Debug, Default)]
pub struct RunRecord {
    suites: Vec<SuiteRecord>,
    outcome: Outcome,
}

impl RunRecord {
    #[must_use]
    pub fn new() -> Self {
        RunRecord::default()
    }

    pub fn push(&mut self, suite: SuiteRecord) {
        self.outcome.absorb(suite.outcome());
        self.suites.push(suite);
    }

    #[must_use]
    pub fn suites(&self) -> &[SuiteRecord] {
        &self.suites
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Most recent record of the named suite within this run.
    ///
    /// This is the lookup the dependency check uses: a suite that somehow
    /// ran more than once is judged by its latest completed record.
    #[must_use]
    pub fn suite_named<'a>(&'a self, env: &Environment, name: &str) -> Option<&'a SuiteRecord> {
        self.suites
            .iter()
            .rev()
            .find(|s| env.suite(s.suite()).descriptor().name() == name)
    }
}

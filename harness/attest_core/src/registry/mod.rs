//! The static object graph: tests, suites, and the environment that owns
//! them.
//!
//! The environment is an explicit, caller-constructed context. All
//! registration happens before a run; during a run the registry is
//! read-only. Suites and tests live in arenas owned by the environment and
//! are addressed by [`SuiteId`]/[`TestId`] handles; registration order
//! assigns handle indices but does not determine execution order (the
//! resolver does).

use std::sync::{Mutex, OnceLock, PoisonError};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::context::TestContext;
use crate::descriptor::{Descriptor, SuiteId, TestId};
use crate::fault::BodyResult;

mod builder;
pub use builder::SuiteBuilder;

/// A test body. Receives the assertion sink for the current attempt.
pub type TestFn = fn(&mut TestContext<'_>) -> BodyResult;

/// A suite lifecycle body (`init`, `fixture_enter`, `fixture_leave`,
/// `exit`).
pub type HookFn = fn() -> BodyResult;

/// A registered lifecycle hook: the body plus its own descriptor, so a
/// fault inside it can be located precisely.
#[derive(Clone)]
pub struct Hook {
    func: HookFn,
    descriptor: Descriptor,
}

impl std::fmt::Debug for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hook")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl Hook {
    #[must_use]
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn call(&self) -> BodyResult {
        (self.func)()
    }
}

/// A single named check belonging to exactly one suite.
#[derive(Clone)]
pub struct Test {
    descriptor: Descriptor,
    body: TestFn,
    suite: SuiteId,
}

impl std::fmt::Debug for Test {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Test")
            .field("descriptor", &self.descriptor)
            .field("suite", &self.suite)
            .finish_non_exhaustive()
    }
}

impl Test {
    #[must_use]
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn suite(&self) -> SuiteId {
        self.suite
    }

    #[must_use]
    pub fn body(&self) -> TestFn {
        self.body
    }
}

/// A named collection of tests with shared lifecycle hooks, declared
/// dependencies on other suites, and tags for filtering.
#[derive(Clone, Debug, Default)]
pub struct Suite {
    descriptor: Descriptor,
    init: Option<Hook>,
    fixture_enter: Option<Hook>,
    fixture_leave: Option<Hook>,
    exit: Option<Hook>,
    tests: Vec<TestId>,
    dependencies: Vec<String>,
    tags: FxHashSet<String>,
}

impl Suite {
    #[must_use]
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Owned tests in insertion order; insertion order is execution order.
    #[must_use]
    pub fn tests(&self) -> &[TestId] {
        &self.tests
    }

    /// Names of suites this suite requires to have passed.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    #[must_use]
    pub fn init(&self) -> Option<&Hook> {
        self.init.as_ref()
    }

    #[must_use]
    pub fn fixture_enter(&self) -> Option<&Hook> {
        self.fixture_enter.as_ref()
    }

    #[must_use]
    pub fn fixture_leave(&self) -> Option<&Hook> {
        self.fixture_leave.as_ref()
    }

    #[must_use]
    pub fn exit(&self) -> Option<&Hook> {
        self.exit.as_ref()
    }
}

/// Owns every registered suite and test, plus the name map used for O(1)
/// dependency lookup.
///
/// When two suites register the same name, both exist and both run, but
/// the name map keeps the first; only the first is addressable as a
/// dependency target.
#[derive(Debug, Default)]
pub struct Environment {
    suites: Vec<Suite>,
    tests: Vec<Test>,
    by_name: FxHashMap<String, SuiteId>,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        Environment::default()
    }

    /// Register a suite. The descriptor's owning-chain handle is filled in
    /// here.
    pub fn register_suite(&mut self, mut descriptor: Descriptor) -> SuiteId {
        let id = SuiteId::from_index(self.suites.len());
        descriptor.attach_suite(id);
        self.by_name
            .entry(descriptor.name().to_string())
            .or_insert(id);
        self.suites.push(Suite {
            descriptor,
            ..Suite::default()
        });
        id
    }

    /// Register a test at the end of `suite`'s execution order.
    pub fn register_test(
        &mut self,
        suite: SuiteId,
        mut descriptor: Descriptor,
        body: TestFn,
    ) -> TestId {
        let id = TestId::from_index(self.tests.len());
        descriptor.attach_suite(suite);
        descriptor.attach_test(id);
        self.tests.push(Test {
            descriptor,
            body,
            suite,
        });
        self.suites[suite.index()].tests.push(id);
        id
    }

    /// Declare that `suite` requires the named suite to have passed. The
    /// name may be registered later, or never (the resolver's policy hook
    /// decides what an unresolved name means).
    pub fn register_dependency(&mut self, suite: SuiteId, name: impl Into<String>) {
        self.suites[suite.index()].dependencies.push(name.into());
    }

    pub fn add_tag(&mut self, suite: SuiteId, tag: impl Into<String>) {
        self.suites[suite.index()].tags.insert(tag.into());
    }

    pub fn register_init(&mut self, suite: SuiteId, func: HookFn, descriptor: Descriptor) {
        self.suites[suite.index()].init = Some(hook(suite, func, descriptor));
    }

    pub fn register_exit(&mut self, suite: SuiteId, func: HookFn, descriptor: Descriptor) {
        self.suites[suite.index()].exit = Some(hook(suite, func, descriptor));
    }

    pub fn register_fixture_enter(&mut self, suite: SuiteId, func: HookFn, descriptor: Descriptor) {
        self.suites[suite.index()].fixture_enter = Some(hook(suite, func, descriptor));
    }

    pub fn register_fixture_leave(&mut self, suite: SuiteId, func: HookFn, descriptor: Descriptor) {
        self.suites[suite.index()].fixture_leave = Some(hook(suite, func, descriptor));
    }

    /// Start building a suite by name; the suite is registered immediately
    /// and the builder appends to it.
    pub fn build_suite(&mut self, name: impl Into<String>) -> SuiteBuilder<'_> {
        SuiteBuilder::new(self, name.into())
    }

    #[must_use]
    pub fn suite(&self, id: SuiteId) -> &Suite {
        &self.suites[id.index()]
    }

    #[must_use]
    pub fn test(&self, id: TestId) -> &Test {
        &self.tests[id.index()]
    }

    #[must_use]
    pub fn suite_count(&self) -> usize {
        self.suites.len()
    }

    #[must_use]
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    /// Suite handles in registration order.
    pub fn suite_ids(&self) -> impl Iterator<Item = SuiteId> {
        (0..self.suites.len()).map(SuiteId::from_index)
    }

    /// Handle of the named suite (first registration wins).
    #[must_use]
    pub fn suite_named(&self, name: &str) -> Option<SuiteId> {
        self.by_name.get(name).copied()
    }

    /// Declaring file for reporting: a descriptor with an empty file
    /// inherits from its enclosing test, then its enclosing suite.
    #[must_use]
    pub fn display_file<'a>(&'a self, descriptor: &'a Descriptor) -> &'a str {
        if !descriptor.file().is_empty() {
            return descriptor.file();
        }
        if let Some(test) = descriptor.test() {
            let file = self.test(test).descriptor().file();
            if !file.is_empty() {
                return file;
            }
        }
        if let Some(suite) = descriptor.suite() {
            let file = self.suite(suite).descriptor().file();
            if !file.is_empty() {
                return file;
            }
        }
        descriptor.file()
    }
}

fn hook(suite: SuiteId, func: HookFn, mut descriptor: Descriptor) -> Hook {
    descriptor.attach_suite(suite);
    Hook { func, descriptor }
}

/// Run `f` against the process-wide default environment.
///
/// A convenience for single-binary harnesses that register suites from
/// several modules without threading a context around. The default
/// instance is constructed lazily on first access and lives for the
/// process lifetime. Nothing else in the crate touches it; library code
/// should construct and pass its own [`Environment`].
pub fn with_default_env<R>(f: impl FnOnce(&mut Environment) -> R) -> R {
    let mut guard = DEFAULT_ENV
        .get_or_init(|| Mutex::new(Environment::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

// Outside the generic fn: a static inside it would be duplicated per
// closure type.
static DEFAULT_ENV: OnceLock<Mutex<Environment>> = OnceLock::new();

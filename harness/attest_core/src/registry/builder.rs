//! Chained registration of a suite and its contents.

use crate::descriptor::{Descriptor, SuiteId};
use crate::registry::{Environment, HookFn, TestFn};

/// Registers a suite up front and appends tests, hooks, dependencies, and
/// tags to it. Obtained from [`Environment::build_suite`].
///
/// ```
/// use attest_core::{check, Environment};
///
/// let mut env = Environment::new();
/// let parser = env
///     .build_suite("parser")
///     .located(file!(), line!())
///     .depends_on("lexer")
///     .tag("fast")
///     .test("empty_input", |ctx| {
///         check!(ctx, "".is_empty());
///         Ok(())
///     })
///     .id();
/// assert_eq!(env.suite(parser).tests().len(), 1);
/// ```
pub struct SuiteBuilder<'env> {
    env: &'env mut Environment,
    id: SuiteId,
}

impl<'env> SuiteBuilder<'env> {
    pub(super) fn new(env: &'env mut Environment, name: String) -> Self {
        let id = env.register_suite(Descriptor::new(name, "", 0));
        SuiteBuilder { env, id }
    }

    /// Set the suite's declaring file and line.
    #[must_use]
    pub fn located(self, file: impl Into<String>, line: u32) -> Self {
        self.env.suites[self.id.index()]
            .descriptor
            .set_location(file, line);
        self
    }

    /// Append a test; insertion order is execution order.
    #[must_use]
    pub fn test(self, name: impl Into<String>, body: TestFn) -> Self {
        self.env
            .register_test(self.id, Descriptor::new(name, "", 0), body);
        self
    }

    /// Require the named suite to have passed before this one runs.
    #[must_use]
    pub fn depends_on(self, name: impl Into<String>) -> Self {
        self.env.register_dependency(self.id, name);
        self
    }

    #[must_use]
    pub fn tag(self, tag: impl Into<String>) -> Self {
        self.env.add_tag(self.id, tag);
        self
    }

    #[must_use]
    pub fn init(self, func: HookFn) -> Self {
        self.env
            .register_init(self.id, func, Descriptor::new("suite.init", "", 0));
        self
    }

    #[must_use]
    pub fn exit(self, func: HookFn) -> Self {
        self.env
            .register_exit(self.id, func, Descriptor::new("suite.exit", "", 0));
        self
    }

    #[must_use]
    pub fn fixture_enter(self, func: HookFn) -> Self {
        self.env.register_fixture_enter(
            self.id,
            func,
            Descriptor::new("suite.fixture_enter", "", 0),
        );
        self
    }

    #[must_use]
    pub fn fixture_leave(self, func: HookFn) -> Self {
        self.env.register_fixture_leave(
            self.id,
            func,
            Descriptor::new("suite.fixture_leave", "", 0),
        );
        self
    }

    /// Handle of the suite being built.
    #[must_use]
    pub fn id(&self) -> SuiteId {
        self.id
    }
}

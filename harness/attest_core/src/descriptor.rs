//! Identity records for suites, tests, lifecycle hooks, and assertions.
//!
//! Entities are addressed by arena handles ([`SuiteId`], [`TestId`]) owned
//! by the [`Environment`](crate::Environment); descriptors carry the
//! owning-chain handles instead of back pointers, so a descriptor stays
//! valid however entities are stored or moved.

use std::fmt;

/// Handle to a suite in the environment's suite arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct SuiteId(usize);

impl SuiteId {
    pub(crate) const fn from_index(index: usize) -> Self {
        SuiteId(index)
    }

    /// Position in the environment's suite arena (registration order).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SuiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "suite#{}", self.0)
    }
}

/// Handle to a test in the environment's test arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct TestId(usize);

impl TestId {
    pub(crate) const fn from_index(index: usize) -> Self {
        TestId(index)
    }

    /// Position in the environment's test arena (registration order).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "test#{}", self.0)
    }
}

/// Names and locates a program element: a suite, a test, a lifecycle hook,
/// or a single assertion inside a test body.
///
/// The owning-chain handles are populated during registration, never
/// before. A descriptor created ad hoc (e.g. by the `check!` macro) gets
/// them filled in when the assertion is recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Descriptor {
    name: String,
    file: String,
    line: u32,
    suite: Option<SuiteId>,
    test: Option<TestId>,
}

impl Descriptor {
    pub fn new(name: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Descriptor {
            name: name.into(),
            file: file.into(),
            line,
            suite: None,
            test: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw declaring file; may be empty. See
    /// [`Environment::display_file`](crate::Environment::display_file) for
    /// the inherited form used in reports.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Enclosing suite, once registered.
    #[must_use]
    pub fn suite(&self) -> Option<SuiteId> {
        self.suite
    }

    /// Enclosing test, once registered.
    #[must_use]
    pub fn test(&self) -> Option<TestId> {
        self.test
    }

    pub(crate) fn attach_suite(&mut self, suite: SuiteId) {
        self.suite = Some(suite);
    }

    pub(crate) fn set_location(&mut self, file: impl Into<String>, line: u32) {
        self.file = file.into();
        self.line = line;
    }

    pub(crate) fn attach_test(&mut self, test: TestId) {
        self.test = Some(test);
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({}:{})", self.name, self.file, self.line)
        }
    }
}

//! Ready-made filters: tag selection for suites, substring selection for
//! tests.

use attest_core::{Environment, Filter, SuiteId, TestId};

/// Allows only suites carrying at least one of the wanted tags. Does not
/// constrain tests.
#[derive(Clone, Debug)]
pub struct TagFilter {
    tags: Vec<String>,
}

impl TagFilter {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TagFilter {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

impl Filter for TagFilter {
    fn allow_suite(&self, env: &Environment, suite: SuiteId) -> bool {
        let suite = env.suite(suite);
        self.tags.iter().any(|tag| suite.has_tag(tag))
    }
}

/// Allows only tests whose name contains the pattern (substring match).
/// Does not constrain suites.
#[derive(Clone, Debug)]
pub struct NameFilter {
    pattern: String,
}

impl NameFilter {
    pub fn new(pattern: impl Into<String>) -> Self {
        NameFilter {
            pattern: pattern.into(),
        }
    }
}

impl Filter for NameFilter {
    fn allow_suite(&self, _env: &Environment, _suite: SuiteId) -> bool {
        true
    }

    fn allow_test(&self, env: &Environment, test: TestId) -> bool {
        env.test(test).descriptor().name().contains(&self.pattern)
    }
}

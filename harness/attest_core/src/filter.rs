//! Inclusion predicates over suites and tests.

use crate::descriptor::{SuiteId, TestId};
use crate::registry::Environment;

/// Decides whether a suite or test takes part in a run.
///
/// Suites are consulted once each during resolution; a rejected suite is
/// excluded from the order and is not a resolvable dependency target.
/// Tests are consulted as the engine iterates a suite; a rejected test
/// produces no record and no hooks.
pub trait Filter {
    fn allow_suite(&self, env: &Environment, suite: SuiteId) -> bool;

    fn allow_test(&self, _env: &Environment, _test: TestId) -> bool {
        true
    }
}

/// Borrowed filters composed by logical AND: an element is allowed only if
/// every filter accepts it. Empty set allows everything.
#[derive(Default)]
pub struct FilterSet<'a> {
    filters: Vec<&'a dyn Filter>,
}

impl<'a> FilterSet<'a> {
    #[must_use]
    pub fn new() -> Self {
        FilterSet::default()
    }

    pub fn add(&mut self, filter: &'a dyn Filter) {
        self.filters.push(filter);
    }

    /// Remove a previously added filter, matched by identity (the same
    /// borrowed object, not an equal one). No-op if absent.
    pub fn remove(&mut self, filter: &'a dyn Filter) {
        if let Some(pos) = self.filters.iter().position(|f| same_object(*f, filter)) {
            self.filters.remove(pos);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    #[must_use]
    pub fn allows_suite(&self, env: &Environment, suite: SuiteId) -> bool {
        self.filters.iter().all(|f| f.allow_suite(env, suite))
    }

    #[must_use]
    pub fn allows_test(&self, env: &Environment, test: TestId) -> bool {
        self.filters.iter().all(|f| f.allow_test(env, test))
    }
}

fn same_object(a: &dyn Filter, b: &dyn Filter) -> bool {
    std::ptr::eq(
        (a as *const dyn Filter).cast::<()>(),
        (b as *const dyn Filter).cast::<()>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Descriptor;

    // Non-zero-sized so distinct instances have distinct addresses.
    struct RejectAll {
        _tag: u8,
    }

    impl Filter for RejectAll {
        fn allow_suite(&self, _env: &Environment, _suite: SuiteId) -> bool {
            false
        }
    }

    struct AcceptAll {
        _tag: u8,
    }

    impl Filter for AcceptAll {
        fn allow_suite(&self, _env: &Environment, _suite: SuiteId) -> bool {
            true
        }
    }

    fn one_suite_env() -> (Environment, SuiteId) {
        let mut env = Environment::new();
        let id = env.register_suite(Descriptor::new("s", "", 0));
        (env, id)
    }

    #[test]
    fn empty_set_allows_everything() {
        let (env, id) = one_suite_env();
        let set = FilterSet::new();
        assert!(set.allows_suite(&env, id));
    }

    #[test]
    fn composition_is_logical_and() {
        let (env, id) = one_suite_env();
        let accept = AcceptAll { _tag: 0 };
        let reject = RejectAll { _tag: 0 };

        let mut set = FilterSet::new();
        set.add(&accept);
        assert!(set.allows_suite(&env, id));

        set.add(&reject);
        assert!(!set.allows_suite(&env, id));
    }

    #[test]
    fn remove_matches_by_identity() {
        let (env, id) = one_suite_env();
        let reject_a = RejectAll { _tag: 0 };
        let reject_b = RejectAll { _tag: 0 };

        let mut set = FilterSet::new();
        set.add(&reject_a);
        set.remove(&reject_b);
        assert_eq!(set.len(), 1);
        assert!(!set.allows_suite(&env, id));

        set.remove(&reject_a);
        assert!(set.is_empty());
        assert!(set.allows_suite(&env, id));
    }
}

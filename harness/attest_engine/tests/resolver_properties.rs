//! Property-based tests for the dependency resolver.
//!
//! Generates random dependency graphs and verifies:
//! 1. Acyclic graphs always resolve, covering every suite exactly once,
//!    with every dependency ordered before its dependent.
//! 2. Arbitrary graphs either resolve to a valid order or fail with a
//!    non-empty cycle.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use attest_core::{
    Control, Descriptor, Directive, Environment, FilterSet, SuiteId, SuiteRecord,
};
use attest_engine::{resolve_order, ResolveError};
use proptest::prelude::*;

/// All hooks answer Abort; resolution must never need them for these
/// graphs (every dependency name is registered).
struct Strict;

impl Control for Strict {
    fn on_fault(&mut self, _env: &Environment, _at: &Descriptor) -> Directive {
        Directive::Abort
    }

    fn on_dependency_failed(
        &mut self,
        _env: &Environment,
        _dependent: SuiteId,
        _dependency: SuiteId,
        _record: &SuiteRecord,
    ) -> Directive {
        Directive::Abort
    }

    fn on_unknown_dependency(
        &mut self,
        _env: &Environment,
        _from: SuiteId,
        _name: &str,
    ) -> Directive {
        Directive::Abort
    }

    fn on_unsolvable(&mut self, _env: &Environment, _implicated: &[SuiteId]) -> Directive {
        Directive::Abort
    }
}

fn suite_name(index: usize) -> String {
    format!("s{index}")
}

/// Build an environment with `count` suites and the given dependency
/// edges, where `(dependent, dependency)` are suite indices.
fn build_env(count: usize, edges: &[(usize, usize)]) -> Environment {
    let mut env = Environment::new();
    let ids: Vec<_> = (0..count)
        .map(|i| env.register_suite(Descriptor::new(suite_name(i), "", 0)))
        .collect();
    for &(dependent, dependency) in edges {
        env.register_dependency(ids[dependent], suite_name(dependency));
    }
    env
}

fn assert_valid_order(env: &Environment, order: &[SuiteId], edges: &[(usize, usize)]) {
    let position: Vec<Option<usize>> = {
        let mut positions = vec![None; env.suite_count()];
        for (pos, id) in order.iter().enumerate() {
            positions[id.index()] = Some(pos);
        }
        positions
    };
    for &(dependent, dependency) in edges {
        let dependent_pos = position[dependent].unwrap();
        let dependency_pos = position[dependency].unwrap();
        assert!(
            dependency_pos < dependent_pos,
            "s{dependency} must precede s{dependent}"
        );
    }
}

/// Edges pointing only from higher to lower indices: guaranteed acyclic.
fn dag_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (2usize..12).prop_flat_map(|count| {
        // (dependent, dependency) with dependency strictly lower-indexed.
        let edge = (1..count, 0..count).prop_map(|(a, b)| (a, b % a));
        (Just(count), prop::collection::vec(edge, 0..24))
    })
}

/// Any edges at all, cycles included.
fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..10).prop_flat_map(|count| {
        (
            Just(count),
            prop::collection::vec((0..count, 0..count), 0..24),
        )
    })
}

proptest! {
    #[test]
    fn dags_always_resolve_to_a_valid_order((count, edges) in dag_strategy()) {
        let env = build_env(count, &edges);
        let mut control = Strict;

        let order = resolve_order(&env, &FilterSet::new(), &mut control).unwrap();
        prop_assert_eq!(order.len(), count);

        let mut seen: Vec<_> = order.iter().map(|id| id.index()).collect();
        seen.sort_unstable();
        let expected: Vec<_> = (0..count).collect();
        prop_assert_eq!(seen, expected);

        assert_valid_order(&env, &order, &edges);
    }

    #[test]
    fn arbitrary_graphs_resolve_or_report_a_cycle((count, edges) in graph_strategy()) {
        let env = build_env(count, &edges);
        let mut control = Strict;

        match resolve_order(&env, &FilterSet::new(), &mut control) {
            Ok(order) => {
                prop_assert_eq!(order.len(), count);
                assert_valid_order(&env, &order, &edges);
            }
            Err(ResolveError::Cycle { implicated }) => {
                prop_assert!(!implicated.is_empty());
            }
            Err(other) => {
                return Err(TestCaseError::fail(format!("unexpected error: {other}")));
            }
        }
    }
}

//! Dependency resolution: orders suites so that every dependency runs
//! before its dependents.
//!
//! Depth-first topological sort with three coloring. Roots are visited in
//! registration order, which makes the resulting order deterministic for a
//! fixed graph. Filter-rejected suites are invisible: they are neither
//! roots nor resolvable dependency targets. Unresolvable dependency names
//! are routed through the control's `on_unknown_dependency` hook; only
//! [`Directive::Ignore`] drops the edge and continues.

use thiserror::Error;

use attest_core::{Control, Directive, Environment, FilterSet, SuiteId};

/// Why no execution order could be produced.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The graph contains a dependency cycle; `implicated` lists the
    /// suites on the detected cycle, in visit order.
    #[error("dependency cycle among {} suite(s)", implicated.len())]
    Cycle { implicated: Vec<SuiteId> },

    /// A dependency name resolved to no runnable suite and the control
    /// declined to ignore the edge.
    #[error("suite {suite} depends on unresolvable \"{name}\"")]
    DependencyRejected { suite: SuiteId, name: String },
}

/// Visit state of one suite during the depth-first sort.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

struct Resolver<'a, 'f> {
    env: &'a Environment,
    filters: &'a FilterSet<'f>,
    marks: Vec<Mark>,
    /// Active DFS path, used to extract the cycle on a back-edge.
    path: Vec<SuiteId>,
    order: Vec<SuiteId>,
}

impl Resolver<'_, '_> {
    fn visit(&mut self, control: &mut dyn Control, id: SuiteId) -> Result<(), ResolveError> {
        match self.marks[id.index()] {
            Mark::Done => return Ok(()),
            Mark::InProgress => {
                // Back-edge: everything on the path from the first
                // occurrence of `id` is on the cycle.
                let start = self.path.iter().position(|&s| s == id).unwrap_or(0);
                return Err(ResolveError::Cycle {
                    implicated: self.path[start..].to_vec(),
                });
            }
            Mark::Unvisited => {}
        }

        self.marks[id.index()] = Mark::InProgress;
        self.path.push(id);

        for name in self.env.suite(id).dependencies() {
            let target = self
                .env
                .suite_named(name)
                .filter(|&dep| self.filters.allows_suite(self.env, dep));
            match target {
                Some(dep) => self.visit(control, dep)?,
                None => match control.on_unknown_dependency(self.env, id, name) {
                    Directive::Ignore => {
                        tracing::debug!(suite = %id, dependency = %name, "dropping unresolvable dependency edge");
                    }
                    _ => {
                        return Err(ResolveError::DependencyRejected {
                            suite: id,
                            name: name.clone(),
                        })
                    }
                },
            }
        }

        self.path.pop();
        self.marks[id.index()] = Mark::Done;
        self.order.push(id);
        Ok(())
    }
}

/// Produce the execution order for `env` under the given filters.
///
/// On failure the caller is expected to notify the control (the runner
/// invokes `on_unsolvable` for cycles) and abort without executing any
/// suite.
pub fn resolve_order(
    env: &Environment,
    filters: &FilterSet<'_>,
    control: &mut dyn Control,
) -> Result<Vec<SuiteId>, ResolveError> {
    let mut resolver = Resolver {
        env,
        filters,
        marks: vec![Mark::Unvisited; env.suite_count()],
        path: Vec::new(),
        order: Vec::new(),
    };

    for id in env.suite_ids() {
        if resolver.marks[id.index()] == Mark::Unvisited && filters.allows_suite(env, id) {
            resolver.visit(control, id)?;
        }
    }

    tracing::debug!(suites = resolver.order.len(), "resolved suite order");
    Ok(resolver.order)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use attest_core::{Descriptor, Filter, SuiteRecord, TestId};

    /// Control double: scripted answer for unknown dependencies, counts
    /// consultations.
    struct Probe {
        unknown: Directive,
        unknown_calls: Vec<String>,
    }

    impl Probe {
        fn new(unknown: Directive) -> Self {
            Probe {
                unknown,
                unknown_calls: Vec::new(),
            }
        }
    }

    impl Control for Probe {
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
            name: &str,
        ) -> Directive {
            self.unknown_calls.push(name.to_string());
            self.unknown
        }

        fn on_unsolvable(&mut self, _env: &Environment, _implicated: &[SuiteId]) -> Directive {
            Directive::Abort
        }
    }

    /// Build an environment from (name, dependencies) pairs.
    fn graph(suites: &[(&str, &[&str])]) -> Environment {
        let mut env = Environment::new();
        for (name, deps) in suites {
            let id = env.register_suite(Descriptor::new(*name, "", 0));
            for dep in *deps {
                env.register_dependency(id, *dep);
            }
        }
        env
    }

    fn names(env: &Environment, order: &[SuiteId]) -> Vec<String> {
        order
            .iter()
            .map(|&id| env.suite(id).descriptor().name().to_string())
            .collect()
    }

    #[test]
    fn chain_orders_dependencies_first() {
        let env = graph(&[("c", &["b"]), ("b", &["a"]), ("a", &[])]);
        let mut probe = Probe::new(Directive::Abort);

        let order = resolve_order(&env, &FilterSet::new(), &mut probe).unwrap();
        assert_eq!(names(&env, &order), ["a", "b", "c"]);
    }

    #[test]
    fn independent_suites_keep_registration_order() {
        let env = graph(&[("x", &[]), ("y", &[]), ("z", &[])]);
        let mut probe = Probe::new(Directive::Abort);

        let order = resolve_order(&env, &FilterSet::new(), &mut probe).unwrap();
        assert_eq!(names(&env, &order), ["x", "y", "z"]);
    }

    #[test]
    fn diamond_orders_every_edge() {
        let env = graph(&[
            ("top", &["left", "right"]),
            ("left", &["base"]),
            ("right", &["base"]),
            ("base", &[]),
        ]);
        let mut probe = Probe::new(Directive::Abort);

        let order = resolve_order(&env, &FilterSet::new(), &mut probe).unwrap();
        let position = |name: &str| {
            names(&env, &order)
                .iter()
                .position(|n| n == name)
                .unwrap_or(usize::MAX)
        };
        assert_eq!(order.len(), 4);
        assert!(position("base") < position("left"));
        assert!(position("base") < position("right"));
        assert!(position("left") < position("top"));
        assert!(position("right") < position("top"));
    }

    #[test]
    fn cycle_fails_with_implicated_suites() {
        let env = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
        let mut probe = Probe::new(Directive::Abort);

        let result = resolve_order(&env, &FilterSet::new(), &mut probe);
        match result {
            Err(ResolveError::Cycle { implicated }) => {
                let mut cycle = names(&env, &implicated);
                cycle.sort();
                assert_eq!(cycle, ["a", "b", "c"]);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let env = graph(&[("solo", &["solo"])]);
        let mut probe = Probe::new(Directive::Abort);

        let result = resolve_order(&env, &FilterSet::new(), &mut probe);
        match result {
            Err(ResolveError::Cycle { implicated }) => {
                assert_eq!(names(&env, &implicated), ["solo"]);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn unknown_dependency_ignored_keeps_suite() {
        let env = graph(&[("x", &["missing"])]);
        let mut probe = Probe::new(Directive::Ignore);

        let order = resolve_order(&env, &FilterSet::new(), &mut probe).unwrap();
        assert_eq!(names(&env, &order), ["x"]);
        assert_eq!(probe.unknown_calls, ["missing"]);
    }

    #[test]
    fn unknown_dependency_rejected_fails_resolution() {
        let env = graph(&[("x", &["missing"])]);
        let mut probe = Probe::new(Directive::AbortCurrent);

        let result = resolve_order(&env, &FilterSet::new(), &mut probe);
        match result {
            Err(ResolveError::DependencyRejected { suite, name }) => {
                assert_eq!(env.suite(suite).descriptor().name(), "x");
                assert_eq!(name, "missing");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    struct RejectNamed {
        name: &'static str,
    }

    impl Filter for RejectNamed {
        fn allow_suite(&self, env: &Environment, suite: SuiteId) -> bool {
            env.suite(suite).descriptor().name() != self.name
        }

        fn allow_test(&self, _env: &Environment, _test: TestId) -> bool {
            true
        }
    }

    #[test]
    fn rejected_suite_is_not_a_root() {
        let env = graph(&[("keep", &[]), ("drop", &[])]);
        let reject = RejectNamed { name: "drop" };
        let mut filters = FilterSet::new();
        filters.add(&reject);
        let mut probe = Probe::new(Directive::Abort);

        let order = resolve_order(&env, &filters, &mut probe).unwrap();
        assert_eq!(names(&env, &order), ["keep"]);
    }

    #[test]
    fn rejected_suite_is_not_a_dependency_target() {
        let env = graph(&[("dependent", &["drop"]), ("drop", &[])]);
        let reject = RejectNamed { name: "drop" };
        let mut filters = FilterSet::new();
        filters.add(&reject);

        // The edge to the rejected suite routes through the unknown
        // dependency hook; with Ignore the dependent still runs.
        let mut probe = Probe::new(Directive::Ignore);
        let order = resolve_order(&env, &filters, &mut probe).unwrap();
        assert_eq!(names(&env, &order), ["dependent"]);
        assert_eq!(probe.unknown_calls, ["drop"]);
    }
}

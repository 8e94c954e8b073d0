//! The assertion sink handed to every test body.

use crate::control::Control;
use crate::descriptor::Descriptor;
use crate::outcome::Outcome;
use crate::record::{AssertRecord, TestRecord};
use crate::registry::Environment;

/// Collects the assertions of one attempt of one test.
///
/// The engine constructs one per attempt, borrowing the attempt's record
/// and the run's control; bodies only ever see `&mut TestContext`.
pub struct TestContext<'run> {
    env: &'run Environment,
    record: &'run mut TestRecord,
    control: &'run mut dyn Control,
}

impl<'run> TestContext<'run> {
    pub fn new(
        env: &'run Environment,
        record: &'run mut TestRecord,
        control: &'run mut dyn Control,
    ) -> Self {
        TestContext {
            env,
            record,
            control,
        }
    }

    /// Record one assertion: a pass/fail verdict plus a message.
    ///
    /// The descriptor's owning-chain handles are filled in from the test
    /// under execution, the control observes the assert, and the verdict
    /// is folded into the attempt's aggregate.
    pub fn check(&mut self, mut descriptor: Descriptor, passed: bool, message: impl Into<String>) {
        let test = self.record.test();
        descriptor.attach_test(test);
        descriptor.attach_suite(self.env.test(test).suite());

        let assert = AssertRecord::new(descriptor, Outcome::from_check(passed), message);
        self.control.on_assert(self.env, &assert);
        self.record.push(assert);
    }

    /// The environment the test belongs to (read-only during a run).
    #[must_use]
    pub fn env(&self) -> &Environment {
        self.env
    }
}

/// Record an assertion with the call site's file and line.
///
/// `check!(ctx, cond)` uses the stringified condition as the message;
/// `check!(ctx, cond, msg)` supplies one explicitly.
#[macro_export]
macro_rules! check {
    ($ctx:expr, $cond:expr) => {
        $ctx.check(
            $crate::Descriptor::new("", file!(), line!()),
            $cond,
            stringify!($cond),
        )
    };
    ($ctx:expr, $cond:expr, $msg:expr) => {
        $ctx.check($crate::Descriptor::new("", file!(), line!()), $cond, $msg)
    };
}

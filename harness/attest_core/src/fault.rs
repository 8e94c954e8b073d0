//! Explicit fault channel for user-supplied bodies.
//!
//! Test bodies and lifecycle hooks signal an irrecoverable fault by
//! returning `Err(Fault)` instead of unwinding. The engine wraps every
//! body invocation in a protected call and routes faults to the control
//! policy's `on_fault` hook.

use thiserror::Error;

/// An irrecoverable fault raised by a test body or lifecycle hook.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Fault {
    message: String,
}

impl Fault {
    pub fn new(message: impl Into<String>) -> Self {
        Fault {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for Fault {
    fn from(message: &str) -> Self {
        Fault::new(message)
    }
}

impl From<String> for Fault {
    fn from(message: String) -> Self {
        Fault { message }
    }
}

/// Return type of test bodies and lifecycle hooks.
pub type BodyResult = Result<(), Fault>;

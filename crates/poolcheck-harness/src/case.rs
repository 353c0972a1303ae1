//! Registered test cases.

use std::fmt;

use crate::context::TestContext;

/// Signature of a test case body.
///
/// Returning an error or panicking both fail the case.
pub type CaseFn = fn(&TestContext) -> anyhow::Result<()>;

/// A named test case, registered statically in a catalog.
#[derive(Debug, Clone, Copy)]
pub struct TestCase {
    /// Display name; used only for reporting and filtering.
    pub name: &'static str,
    /// The case body.
    pub body: CaseFn,
}

impl TestCase {
    /// Creates a test case.
    #[must_use]
    pub const fn new(name: &'static str, body: CaseFn) -> Self {
        Self { name, body }
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

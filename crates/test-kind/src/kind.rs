//! The four kinds of test file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of test a file holds, derived from its file-name marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// Pure function or isolated computation, every dependency substituted.
    Unit,
    /// Several real internal components together; only external services substituted.
    Integration,
    /// A complete user-facing flow against a running system.
    #[serde(rename = "e2e")]
    E2E,
    /// A substitute service returning canned results for a dependency-injection boundary.
    TestImplementation,
}

impl TestKind {
    /// All kinds in matching precedence order, most specific marker first.
    ///
    /// `.test-impl` must be tried before `.test`.
    pub const PRECEDENCE: [TestKind; 4] = [
        TestKind::TestImplementation,
        TestKind::Integration,
        TestKind::E2E,
        TestKind::Unit,
    ];

    /// The file-name marker placed between the stem and the extension.
    pub fn marker(&self) -> &'static str {
        match self {
            TestKind::Unit => "test",
            TestKind::Integration => "integration",
            TestKind::E2E => "spec",
            TestKind::TestImplementation => "test-impl",
        }
    }

    /// The full suffix for the given extension, e.g. `.test-impl.ts`.
    pub fn suffix(&self, extension: &str) -> String {
        format!(".{}.{}", self.marker(), extension)
    }

    /// Stable lowercase name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TestKind::Unit => "unit",
            TestKind::Integration => "integration",
            TestKind::E2E => "e2e",
            TestKind::TestImplementation => "test_implementation",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown test kind '{0}' (expected unit, integration, e2e or test_implementation)")]
pub struct ParseTestKindError(pub String);

impl FromStr for TestKind {
    type Err = ParseTestKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unit" => Ok(TestKind::Unit),
            "integration" => Ok(TestKind::Integration),
            "e2e" => Ok(TestKind::E2E),
            "test_implementation" => Ok(TestKind::TestImplementation),
            other => Err(ParseTestKindError(other.to_string())),
        }
    }
}

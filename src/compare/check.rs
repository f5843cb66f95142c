use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one structural assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub label: String,
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    pub fn new(label: impl Into<String>, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            passed,
            detail: detail.into(),
        }
    }

    pub fn pass(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(label, true, detail)
    }

    pub fn fail(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(label, false, detail)
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = if self.passed { "PASS" } else { "FAIL" };
        write!(f, "[{tag}] {}: {}", self.label, self.detail)
    }
}

//! Test Evaluator - Output Comparison
//!
//! **Core Responsibility:**
//! Turn the raw output of one process into a pass/fail verdict.
//!
//! **Comparison Rules:**
//! - Observed output is stdout when the process exits with status 0, stderr otherwise
//! - Trailing `\n` characters are stripped from observed and expected output
//! - Nothing else is normalized: `\r\n`, trailing spaces and case all matter
//!
//! Picking stdout or stderr by exit status alone means a crash whose stderr
//! equals the expected text still passes.

use clue_common::types::{ExecutionResult, TestCase};
use std::time::Duration;

/// Raw output of a single interpreter run
/// Produced by the engine, consumed by the evaluator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub elapsed: Duration,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Strip every trailing `\n`, leaving any `\r` or other whitespace in place
pub fn strip_trailing_newlines(text: &str) -> &str {
    text.trim_end_matches('\n')
}

/// The text compared against the expected output
pub fn observed_output(output: &ProcessOutput) -> &str {
    if output.success() {
        strip_trailing_newlines(&output.stdout)
    } else {
        strip_trailing_newlines(&output.stderr)
    }
}

/// Evaluate a single test case execution output
pub fn evaluate_test(test_case: &TestCase, output: &ProcessOutput) -> ExecutionResult {
    let observed = observed_output(output);
    let passed = observed == strip_trailing_newlines(&test_case.expected_output);

    ExecutionResult {
        test_id: test_case.id,
        passed,
        observed_output: observed.to_string(),
        runtime: output.elapsed,
    }
}

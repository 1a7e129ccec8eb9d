//! Test Executor - High-Level Orchestration
//!
//! **Responsibility:**
//! Drive every test case through the engine and the evaluator, and stream
//! each verdict to the reporter as soon as it is known.
//!
//! **Architecture:**
//! 1. Build the program text and standard input for the run's mode
//! 2. Use LocalEngine to run it in a fresh interpreter (engine.rs)
//! 3. Use the evaluator to compare the output (evaluator.rs)
//! 4. Hand the result to the Reporter (reporter.rs)
//!
//! Results are reported in test-set order even when several test cases run at
//! once. The first interpreter failure aborts the remaining run.

use crate::engine::LocalEngine;
use crate::evaluator;
use crate::reporter::Reporter;
use anyhow::Result;
use clue_common::types::{
    ExecutionMode, ExecutionResult, RunSummary, SolutionSource, TestCase, TestSet,
};
use clue_common::HarnessError;
use futures_util::stream::{self, StreamExt};
use std::io::Write;
use tracing::{debug, info};

/// Program text and standard input for one test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub program: String,
    pub stdin: Option<&'a str>,
}

/// Combine the solution and a stimulus according to `mode`
pub fn build_invocation<'a>(
    solution: &SolutionSource,
    stimulus: &'a str,
    mode: ExecutionMode,
) -> Invocation<'a> {
    match mode {
        ExecutionMode::CodeAppend => Invocation {
            program: format!("{}\n\n{}", solution.as_str(), stimulus),
            stdin: None,
        },
        ExecutionMode::StdinFeed => Invocation {
            program: solution.as_str().to_string(),
            stdin: Some(stimulus),
        },
    }
}

/// Run a single test case in a fresh interpreter and evaluate it
pub async fn run_test(
    engine: &LocalEngine,
    solution: &SolutionSource,
    test_case: &TestCase,
    mode: ExecutionMode,
) -> Result<ExecutionResult, HarnessError> {
    let invocation = build_invocation(solution, &test_case.stimulus, mode);
    let output = engine.execute(&invocation.program, invocation.stdin).await?;
    let result = evaluator::evaluate_test(test_case, &output);

    debug!(
        test_id = test_case.id,
        passed = result.passed,
        exit_code = ?output.exit_code,
        execution_ms = output.elapsed.as_millis() as u64,
        "Test evaluated"
    );

    Ok(result)
}

/// Run every test case, reporting each result as it arrives.
///
/// At most `jobs` interpreters run at once; `jobs` below 1 is treated as 1.
pub async fn run_tests<W: Write>(
    engine: &LocalEngine,
    solution: &SolutionSource,
    tests: &TestSet,
    mode: ExecutionMode,
    jobs: usize,
    reporter: &mut Reporter<W>,
) -> Result<RunSummary> {
    let jobs = jobs.max(1);

    info!(
        test_count = tests.len(),
        mode = %mode,
        interpreter = %engine.interpreter().command,
        jobs = jobs,
        "Starting test run"
    );

    let mut results = stream::iter(tests.iter().enumerate())
        .map(|(index, test_case)| async move {
            run_test(engine, solution, test_case, mode)
                .await
                .map(|result| (index + 1, test_case, result))
        })
        .buffered(jobs);

    let mut summary = RunSummary::default();

    while let Some(outcome) = results.next().await {
        let (position, test_case, result) = outcome?;
        summary.record(&result);
        reporter.test_result(position, test_case, &result)?;
    }

    reporter.summary(&summary)?;

    info!(
        passed = summary.passed,
        total = summary.total,
        "Test run completed"
    );

    Ok(summary)
}

// Colored console report of a test run
use clue_common::types::{ExecutionMode, ExecutionResult, RunSummary, SummaryTone, TestCase};
use colored::Colorize;
use std::io::{self, Write};
use std::path::Path;

/// Rule width used when the terminal size is unknown
pub const DEFAULT_WIDTH: usize = 69;

/// Width of the attached terminal, or [`DEFAULT_WIDTH`]
pub fn terminal_width() -> usize {
    #[cfg(unix)]
    {
        if let Ok((columns, _)) = termion::terminal_size() {
            if columns > 0 {
                return columns as usize;
            }
        }
    }
    DEFAULT_WIDTH
}

/// Streams per-test verdicts and the final summary
pub struct Reporter<W: Write> {
    out: W,
    width: usize,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, width: usize) -> Self {
        Self { out, width }
    }

    fn rule(&self) -> String {
        "-".repeat(self.width)
    }

    /// One line naming what is about to run
    pub fn header(
        &mut self,
        archive: &Path,
        solution: &Path,
        mode: ExecutionMode,
        test_count: usize,
    ) -> io::Result<()> {
        writeln!(
            self.out,
            "{} {} ({} tests) {} {} {} {}",
            "Tests:".cyan(),
            archive.display(),
            test_count,
            "| Solution:".cyan(),
            solution.display(),
            "| Mode:".cyan(),
            mode,
        )?;
        writeln!(self.out, "{}", self.rule())
    }

    /// Report one finished test. `position` is 1-based in test-set order.
    pub fn test_result(
        &mut self,
        position: usize,
        test_case: &TestCase,
        result: &ExecutionResult,
    ) -> io::Result<()> {
        if result.passed {
            writeln!(self.out, "{}", format!("Test {position} completed! ✅").green())?;
            writeln!(
                self.out,
                "{}{}",
                "Runtime: ".green(),
                format!("{:.5}", result.runtime_seconds()).yellow()
            )?;
        } else {
            writeln!(self.out, "{}", format!("Test {position} failed! ❌").red())?;
            writeln!(self.out, "{}", "Input:".red())?;
            writeln!(self.out, "{}", test_case.stimulus.cyan())?;
            writeln!(self.out, "{}", "Output:".red())?;
            writeln!(self.out, "{}", result.observed_output.blue())?;
            writeln!(self.out, "{}", "Expected:".red())?;
            writeln!(self.out, "{}", test_case.expected_output.blue())?;
        }
        writeln!(self.out, "{}", self.rule())?;
        self.out.flush()
    }

    /// Aggregate line, green when all passed, red when none did, yellow otherwise
    pub fn summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        let line = format!("Tests passed: {}/{}", summary.passed, summary.total);
        let line = match summary.tone() {
            SummaryTone::AllPassed => line.green(),
            SummaryTone::AllFailed => line.red(),
            SummaryTone::Mixed => line.yellow(),
        };
        writeln!(self.out, "{line}")?;
        writeln!(self.out, "{}", self.rule())?;
        self.out.flush()
    }

    /// Report an error that aborted the run, followed by its causes
    pub fn fatal(&mut self, error: &anyhow::Error) -> io::Result<()> {
        writeln!(self.out, "{} {}", "Error:".red().bold(), error.to_string().red())?;
        for cause in error.chain().skip(1) {
            writeln!(self.out, "  {} {}", "caused by:".cyan(), cause)?;
        }
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

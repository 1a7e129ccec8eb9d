use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A single stimulus/expected-output pair taken from the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// 1-based index of the `"{i}"` / `"{i}.clue"` entry pair
    pub id: u32,
    pub stimulus: String,
    pub expected_output: String,
}

/// Ordered mapping from stimulus to expected output.
///
/// Stimuli are unique keys: inserting a stimulus that is already present
/// replaces the expected output of the existing case and keeps its position,
/// so duplicated archive entries collapse into one test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSet {
    cases: Vec<TestCase>,
}

impl TestSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, returning `false` when it collapsed into an existing case.
    pub fn insert(&mut self, id: u32, stimulus: String, expected_output: String) -> bool {
        if let Some(existing) = self.cases.iter_mut().find(|c| c.stimulus == stimulus) {
            existing.expected_output = expected_output;
            return false;
        }

        self.cases.push(TestCase {
            id,
            stimulus,
            expected_output,
        });
        true
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// The representative case used for mode classification
    pub fn first(&self) -> Option<&TestCase> {
        self.cases.first()
    }

    #[cfg(test)]
    pub fn get(&self, stimulus: &str) -> Option<&str> {
        self.cases
            .iter()
            .find(|c| c.stimulus == stimulus)
            .map(|c| c.expected_output.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.cases.iter()
    }
}

impl<'a> IntoIterator for &'a TestSet {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}

/// Candidate program text, loaded once and shared by every test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionSource(String);

impl SolutionSource {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// How every stimulus of a run is handed to the solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Stimulus is code appended after the solution source
    CodeAppend,
    /// Stimulus is piped to the program's standard input
    StdinFeed,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::CodeAppend => write!(f, "code"),
            ExecutionMode::StdinFeed => write!(f, "stdin"),
        }
    }
}

/// Outcome of running one test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub test_id: u32,
    pub passed: bool,
    pub observed_output: String,
    pub runtime: Duration,
}

impl ExecutionResult {
    pub fn runtime_seconds(&self) -> f64 {
        self.runtime.as_secs_f64()
    }
}

/// Overall colouring of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryTone {
    AllPassed,
    AllFailed,
    Mixed,
}

/// Aggregate pass count of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub passed: usize,
    pub total: usize,
}

impl RunSummary {
    pub fn record(&mut self, result: &ExecutionResult) {
        self.total += 1;
        if result.passed {
            self.passed += 1;
        }
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }

    pub fn tone(&self) -> SummaryTone {
        if self.passed == self.total {
            SummaryTone::AllPassed
        } else if self.passed == 0 {
            SummaryTone::AllFailed
        } else {
            SummaryTone::Mixed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(passed: bool) -> ExecutionResult {
        ExecutionResult {
            test_id: 1,
            passed,
            observed_output: String::new(),
            runtime: Duration::from_millis(3),
        }
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut set = TestSet::new();
        assert!(set.insert(1, "a".to_string(), "1".to_string()));
        assert!(set.insert(2, "b".to_string(), "2".to_string()));
        assert!(set.insert(3, "c".to_string(), "3".to_string()));

        let ids: Vec<u32> = set.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(set.first().map(|c| c.stimulus.as_str()), Some("a"));
    }

    #[test]
    fn test_duplicate_stimulus_collapses() {
        let mut set = TestSet::new();
        set.insert(1, "same".to_string(), "first".to_string());
        set.insert(2, "other".to_string(), "x".to_string());
        assert!(!set.insert(3, "same".to_string(), "last".to_string()));

        assert_eq!(set.len(), 2);
        // position and id of the first occurrence survive, the value is replaced
        let first = set.first().unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(first.expected_output, "last");
        assert_eq!(set.get("same"), Some("last"));
    }

    #[test]
    fn test_summary_tone() {
        let mut summary = RunSummary::default();
        summary.record(&make_result(true));
        summary.record(&make_result(true));
        assert_eq!(summary.tone(), SummaryTone::AllPassed);
        assert!(summary.all_passed());

        summary.record(&make_result(false));
        assert_eq!(summary.tone(), SummaryTone::Mixed);
        assert_eq!((summary.passed, summary.total), (2, 3));

        let mut failing = RunSummary::default();
        failing.record(&make_result(false));
        assert_eq!(failing.tone(), SummaryTone::AllFailed);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(ExecutionMode::CodeAppend.to_string(), "code");
        assert_eq!(ExecutionMode::StdinFeed.to_string(), "stdin");
        assert_eq!(
            serde_json::to_string(&ExecutionMode::CodeAppend).unwrap(),
            "\"code_append\""
        );
    }

    #[test]
    fn test_runtime_seconds() {
        let result = make_result(true);
        assert!((result.runtime_seconds() - 0.003).abs() < 1e-9);
    }
}

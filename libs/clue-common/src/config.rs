// Run settings sourced from the environment

use crate::error::{HarnessError, Result};
use std::path::PathBuf;

/// Glob pattern selecting the downloaded tests archive
pub const TESTS_ZIP_PATTERN: &str = "TESTS_ZIP_PATTERN";
/// Path of the solution under test
pub const SOLUTION_PATH: &str = "SOLUTION_PATH";

/// Required inputs of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tests_zip_pattern: String,
    pub solution_path: PathBuf,
}

impl Settings {
    /// Read both settings through `lookup`. Empty values count as missing.
    #[cfg(test)]
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::with_overrides(None, None, lookup)
    }

    /// Read both settings through `lookup`, letting explicit values win.
    /// Empty values count as missing.
    pub fn with_overrides<F>(
        pattern: Option<String>,
        solution: Option<PathBuf>,
        lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(HarnessError::MissingSetting { name })
        };

        let tests_zip_pattern = match pattern.filter(|p| !p.is_empty()) {
            Some(pattern) => pattern,
            None => require(TESTS_ZIP_PATTERN)?,
        };
        let solution_path = match solution.filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => path,
            None => PathBuf::from(require(SOLUTION_PATH)?),
        };

        Ok(Self {
            tests_zip_pattern,
            solution_path,
        })
    }
}

//! Harness error taxonomy.
//!
//! Every variant is fatal for the run. Failures of the program under test are
//! never reported here; they surface as failed comparisons.

use std::path::PathBuf;
use thiserror::Error;

/// Broad class of a [`HarnessError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid required setting or input file
    Configuration,
    /// Archive content does not follow the paired-entry convention
    Format,
    /// The interpreter could not be invoked
    Environment,
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("couldn't find '{name}' in environment variables")]
    MissingSetting { name: &'static str },

    #[error("invalid tests archive pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("couldn't find zip file with tests, path: '{pattern}'")]
    NoArchiveMatch { pattern: String },

    #[error("tests zip file '{}' does not exist", .path.display())]
    ArchiveNotFound { path: PathBuf },

    #[error("solution file '{}' does not exist", .path.display())]
    SolutionNotFound { path: PathBuf },

    #[error("failed to read solution file '{}'", .path.display())]
    SolutionUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open tests archive '{}'", .path.display())]
    ArchiveUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed tests archive")]
    InvalidArchive {
        #[source]
        source: zip::result::ZipError,
    },

    #[error("tests archive contains no entries")]
    EmptyArchive,

    #[error("tests archive has an odd number of entries ({count}), expected stimulus/clue pairs")]
    OddEntryCount { count: usize },

    #[error("tests archive is missing entry '{name}'")]
    MissingEntry { name: String },

    #[error("entry '{name}' of the tests archive is not valid UTF-8")]
    NotUtf8 { name: String },

    #[error("failed to read entry '{name}' of the tests archive")]
    EntryUnreadable {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start interpreter '{program}'")]
    InterpreterSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("lost contact with interpreter '{program}'")]
    InterpreterIo {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl HarnessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HarnessError::MissingSetting { .. }
            | HarnessError::InvalidPattern { .. }
            | HarnessError::NoArchiveMatch { .. }
            | HarnessError::ArchiveNotFound { .. }
            | HarnessError::SolutionNotFound { .. }
            | HarnessError::SolutionUnreadable { .. }
            | HarnessError::ArchiveUnreadable { .. } => ErrorKind::Configuration,

            HarnessError::InvalidArchive { .. }
            | HarnessError::EmptyArchive
            | HarnessError::OddEntryCount { .. }
            | HarnessError::MissingEntry { .. }
            | HarnessError::NotUtf8 { .. }
            | HarnessError::EntryUnreadable { .. } => ErrorKind::Format,

            HarnessError::InterpreterSpawn { .. } | HarnessError::InterpreterIo { .. } => {
                ErrorKind::Environment
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let missing = HarnessError::MissingSetting {
            name: "SOLUTION_PATH",
        };
        assert_eq!(missing.kind(), ErrorKind::Configuration);
        assert_eq!(
            HarnessError::OddEntryCount { count: 5 }.kind(),
            ErrorKind::Format
        );

        let spawn = HarnessError::InterpreterSpawn {
            program: "py".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(spawn.kind(), ErrorKind::Environment);
    }

    #[test]
    fn test_messages_name_the_value() {
        let err = HarnessError::NoArchiveMatch {
            pattern: "downloads/*.zip".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "couldn't find zip file with tests, path: 'downloads/*.zip'"
        );

        let err = HarnessError::MissingEntry {
            name: "3.clue".to_string(),
        };
        assert!(err.to_string().contains("'3.clue'"));
    }

    #[test]
    fn test_source_kept_out_of_message() {
        use std::error::Error as _;

        let err = HarnessError::InterpreterSpawn {
            program: "nosuchpy".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };

        assert_eq!(err.to_string(), "failed to start interpreter 'nosuchpy'");
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("no such file".to_string())
        );
    }
}

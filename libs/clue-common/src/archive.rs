//! Tests archive discovery and loading.
//!
//! An archive holds `2N` entries: `"1"`, `"2"`, ... carry the stimulus of each
//! test and `"1.clue"`, `"2.clue"`, ... the matching expected output.

use crate::error::{HarnessError, Result};
use crate::types::TestSet;
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

/// Suffix of the entry holding a test's expected output
pub const CLUE_SUFFIX: &str = ".clue";

/// Find the most recently created file matching `pattern`.
///
/// Falls back to the modification time on filesystems that do not record
/// creation times. On ties the first match in glob order wins.
pub fn locate_latest(pattern: &str) -> Result<PathBuf> {
    if pattern.is_empty() {
        return Err(HarnessError::NoArchiveMatch {
            pattern: pattern.to_string(),
        });
    }

    let entries = glob::glob(pattern).map_err(|source| HarnessError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut latest: Option<(SystemTime, PathBuf)> = None;

    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                debug!(error = %e, "Skipping unreadable glob entry");
                continue;
            }
        };

        let metadata = match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => continue,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Skipping archive candidate");
                continue;
            }
        };

        let created = metadata
            .created()
            .or_else(|_| metadata.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let newer = match &latest {
            Some((best, _)) => created > *best,
            None => true,
        };
        if newer {
            latest = Some((created, path));
        }
    }

    match latest {
        Some((_, path)) => {
            debug!(path = %path.display(), "Located tests archive");
            Ok(path)
        }
        None => Err(HarnessError::NoArchiveMatch {
            pattern: pattern.to_string(),
        }),
    }
}

/// Load the test set stored in the archive at `path`
pub fn load_test_set(path: &Path) -> Result<TestSet> {
    if !path.exists() {
        return Err(HarnessError::ArchiveNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|source| HarnessError::ArchiveUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    read_test_set(BufReader::new(file))
}

/// Read a test set from any zip source.
///
/// Either every pair is read or an error is returned; there is no partial set.
pub fn read_test_set<R: Read + Seek>(reader: R) -> Result<TestSet> {
    let mut archive =
        ZipArchive::new(reader).map_err(|source| HarnessError::InvalidArchive { source })?;

    let count = archive.len();
    if count == 0 {
        return Err(HarnessError::EmptyArchive);
    }
    if count % 2 != 0 {
        return Err(HarnessError::OddEntryCount { count });
    }

    let mut tests = TestSet::new();
    for index in 1..=(count / 2) as u32 {
        let stimulus_name = index.to_string();
        let clue_name = format!("{index}{CLUE_SUFFIX}");

        let stimulus = read_entry(&mut archive, &stimulus_name)?;
        let expected = read_entry(&mut archive, &clue_name)?;

        if !tests.insert(index, stimulus, expected) {
            warn!(test_id = index, "Duplicate stimulus, test collapsed into an earlier one");
        }
    }

    debug!(entries = count, tests = tests.len(), "Loaded test set");
    Ok(tests)
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut entry = archive.by_name(name).map_err(|e| match e {
        ZipError::FileNotFound => HarnessError::MissingEntry {
            name: name.to_string(),
        },
        source => HarnessError::InvalidArchive { source },
    })?;

    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|source| HarnessError::EntryUnreadable {
            name: name.to_string(),
            source,
        })?;

    String::from_utf8(bytes).map_err(|_| HarnessError::NotUtf8 {
        name: name.to_string(),
    })
}

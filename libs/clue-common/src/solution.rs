use crate::error::{HarnessError, Result};
use crate::types::SolutionSource;
use std::fs;
use std::io;
use std::path::Path;

/// Read the solution under test.
///
/// The file is read as UTF-8 text with `\r\n` and lone `\r` line endings
/// folded to `\n`.
pub fn load_solution(path: &Path) -> Result<SolutionSource> {
    if !path.exists() {
        return Err(HarnessError::SolutionNotFound {
            path: path.to_path_buf(),
        });
    }

    let unreadable = |source: io::Error| HarnessError::SolutionUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let bytes = fs::read(path).map_err(unreadable)?;
    let code = String::from_utf8(bytes)
        .map_err(|e| unreadable(io::Error::new(io::ErrorKind::InvalidData, e)))?;

    Ok(SolutionSource::new(code.replace("\r\n", "\n").replace('\r', "\n")))
}

//! Report persistence.

use crate::error::ReportError;
use std::fs;
use std::path::Path;

/// Write `data` to `path`, creating missing parent directories.
///
/// An existing file is overwritten. Failures are returned as-is; there is
/// no retry.
pub fn save(data: &[u8], path: &Path) -> Result<(), ReportError> {
    let io_err = |source: std::io::Error| ReportError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, data).map_err(io_err)
}

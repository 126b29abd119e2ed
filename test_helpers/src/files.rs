//! Temporary file fixtures.

use std::io::Write;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// Writes `contents` to a fresh temporary file.
///
/// The file is deleted when the returned handle is dropped.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn temp_file_with(contents: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new().context("create temp file")?;
    file.write_all(contents.as_bytes())
        .context("write temp file")?;
    file.flush().context("flush temp file")?;
    Ok(file)
}

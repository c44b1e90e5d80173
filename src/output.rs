//! Writing build artifacts to disk.

use std::{fs, path::Path};

use crate::error::{Error, Result};

/// Create the parent directories of `path`.
pub fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Map an I/O failure on `path` to [`Error::Write`].
pub fn write_error(artifact: &str, path: &Path, source: std::io::Error) -> Error {
    Error::Write {
        artifact: artifact.to_string(),
        path: path.to_path_buf(),
        source,
    }
}

/// Write an output file, creating parent directories on demand.
pub fn write_artifact(artifact: &str, path: &Path, contents: &[u8]) -> Result<()> {
    ensure_parent(path)
        .and_then(|()| fs::write(path, contents))
        .map_err(|source| write_error(artifact, path, source))?;
    tracing::debug!(artifact, path = %path.display(), "wrote");
    Ok(())
}

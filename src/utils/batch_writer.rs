use std::{io::Write, path::Path};

use tempfile::NamedTempFile;

use crate::{elements::upgrade_batch::UpgradeBatch, errors::BatchError};

/// Writes the batch as pretty JSON.
///
/// The document goes to a temporary file next to `path` first and is renamed into
/// place afterwards, so a failed run never leaves a truncated batch behind.
pub(crate) fn write_batch(batch: &UpgradeBatch, path: &Path) -> Result<(), BatchError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)
        .map_err(|e| BatchError::WriteBatch(format!("creating temp file in {}: {}", dir.display(), e)))?;
    serde_json::to_writer_pretty(&mut file, batch)
        .map_err(|e| {
            if e.is_io() {
                BatchError::WriteBatch(format!("{}: {}", path.display(), e))
            } else {
                BatchError::Serialize(e.to_string())
            }
        })?;
    file.flush()
        .and_then(|_| file.as_file().sync_all())
        .map_err(|e| BatchError::WriteBatch(format!("flushing batch: {}", e)))?;

    file.persist(path)
        .map_err(|e| BatchError::WriteBatch(format!("{}: {}", path.display(), e.error)))?;

    Ok(())
}

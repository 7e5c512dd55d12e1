// Whole-file replacement for the flat files the application owns.
// New content is staged next to the target, fsynced, then renamed over it.

use std::io::Write;
use std::path::Path;

/// Replace `path` with `contents`, creating parent directories as needed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut staged = tempfile::NamedTempFile::new_in(parent)?;
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;
    staged.persist(path)?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "File replaced");
    Ok(())
}

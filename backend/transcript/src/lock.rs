use std::fs::{File, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use fs2::FileExt;

/// Exclusive advisory lock scoped to a marker file path.
///
/// The marker file only serves as a mutual-exclusion token and never holds
/// data. Cooperative: effective only among processes that also acquire it.
/// Released on drop.
pub struct PathLock {
    file: File,
}

impl PathLock {
    /// Block until the exclusive lock on `path` is held.
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(path)
            .with_context(|| format!("failed to open lock file {}", path.display()))?;
        file.lock_exclusive()
            .with_context(|| format!("failed to lock {}", path.display()))?;
        Ok(Self { file })
    }
}

impl Drop for PathLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_creates_marker_and_releases() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("history.lock");

        {
            let _guard = PathLock::acquire(&marker).unwrap();
            assert!(marker.exists());
        }

        // Reacquirable after the guard is dropped.
        let _guard = PathLock::acquire(&marker).unwrap();
    }
}

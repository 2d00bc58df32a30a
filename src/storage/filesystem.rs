use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use super::traits::StorageProvider;

/// Filesystem-backed storage provider keeping the state document in a
/// single local file.
pub struct FileStorageProvider {
    path: PathBuf,
}

impl FileStorageProvider {
    /// Create a provider for the given state file path.
    /// The file does not need to exist yet.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileStorageProvider {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the state file this provider reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageProvider for FileStorageProvider {
    fn get(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state document from {:?}", self.path))?;

        Ok(Some(content))
    }

    fn put(&self, content: &str) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
                parent
            }
            _ => Path::new("."),
        };

        // Write to a temp file in the target directory, then rename, so a
        // crash mid-write never leaves a truncated document behind.
        let temp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {:?}", dir))?;
        fs::write(temp.path(), content)
            .with_context(|| format!("Failed to write state document to {:?}", temp.path()))?;
        temp.persist(&self.path)
            .with_context(|| format!("Failed to persist state document to {:?}", self.path))?;

        Ok(())
    }
}

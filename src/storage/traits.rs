use std::sync::Arc;

use anyhow::Result;

/// Abstract persistence backend for the serialized state document.
///
/// The store never inspects the backend; it only reads the previously
/// persisted document and overwrites it wholesale. Writes are
/// unconditional (last-write-wins), so cross-process coordination, if
/// ever needed, belongs behind this trait rather than in the store.
pub trait StorageProvider {
    /// Read the previously persisted document.
    /// Returns `None` for a fresh organization with no state yet.
    fn get(&self) -> Result<Option<String>>;

    /// Overwrite the persisted document with new content.
    fn put(&self, content: &str) -> Result<()>;
}

impl<T: StorageProvider + ?Sized> StorageProvider for Arc<T> {
    fn get(&self) -> Result<Option<String>> {
        (**self).get()
    }

    fn put(&self, content: &str) -> Result<()> {
        (**self).put(content)
    }
}

impl<T: StorageProvider + ?Sized> StorageProvider for Box<T> {
    fn get(&self) -> Result<Option<String>> {
        (**self).get()
    }

    fn put(&self, content: &str) -> Result<()> {
        (**self).put(content)
    }
}

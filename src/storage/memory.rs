use std::sync::Mutex;

use anyhow::Result;

use super::traits::StorageProvider;

/// In-process storage provider holding the serialized document in memory.
///
/// Used by tests, dry-runs, and embedders that manage persistence
/// themselves. Also counts writes, which is how dirty-flag batching is
/// observed from the outside.
#[derive(Default)]
pub struct MemoryStorageProvider {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    content: Option<String>,
    writes: usize,
}

impl MemoryStorageProvider {
    /// Create an empty provider, as seen by a fresh organization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider that already holds persisted content.
    pub fn with_content(content: &str) -> Self {
        MemoryStorageProvider {
            inner: Mutex::new(Inner {
                content: Some(content.to_string()),
                writes: 0,
            }),
        }
    }

    /// The currently persisted content, if any.
    pub fn content(&self) -> Option<String> {
        self.inner.lock().unwrap().content.clone()
    }

    /// Number of `put` calls performed against this provider.
    pub fn write_count(&self) -> usize {
        self.inner.lock().unwrap().writes
    }
}

impl StorageProvider for MemoryStorageProvider {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.inner.lock().unwrap().content.clone())
    }

    fn put(&self, content: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.content = Some(content.to_string());
        inner.writes += 1;
        Ok(())
    }
}

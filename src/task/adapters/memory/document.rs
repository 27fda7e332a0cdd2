//! In-memory task document.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::task::ports::{DocumentError, DocumentResult, TaskDocument};

/// Thread-safe in-memory document that counts writes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocument {
    contents: Arc<RwLock<String>>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryDocument {
    /// Creates a document with the given initial contents.
    #[must_use]
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: Arc::new(RwLock::new(contents.into())),
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns a copy of the current contents.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Storage`] when the lock is poisoned.
    pub fn contents(&self) -> DocumentResult<String> {
        self.contents.read().map(|text| text.clone()).map_err(poisoned)
    }

    /// Returns how many times the document was written.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

fn poisoned(err: impl std::fmt::Display) -> DocumentError {
    DocumentError::storage(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskDocument for InMemoryDocument {
    async fn read(&self) -> DocumentResult<String> {
        self.contents()
    }

    async fn write(&self, contents: &str) -> DocumentResult<()> {
        let mut text = self.contents.write().map_err(poisoned)?;
        contents.clone_into(&mut *text);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

//! In-memory content-addressable store.
//!
//! The registry fetcher populates the store and the resolution engine only
//! reads from it. Entries are keyed by the sha256 digest of their bytes, are
//! never replaced once written, and live until the store is dropped.

use crate::digest::Digest;
use crate::error::{Result, ToolError};
use crate::oci::Descriptor;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};


/// Bytes stored under a digest together with the media type they were put with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredContent {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Digest-keyed byte store with no eviction.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoredContent>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `bytes` and returns their digest.
    ///
    /// Putting content whose digest is already present keeps the first entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifest::MemoryStore;
    ///
    /// let store = MemoryStore::new();
    /// let digest = store.put(b"{}".to_vec(), "application/json").unwrap();
    /// assert!(store.contains(&digest));
    /// ```
    pub fn put(&self, bytes: Vec<u8>, media_type: &str) -> Result<Digest> {
        let digest = Digest::sha256_of(&bytes)?;
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(digest.to_string())
            .or_insert_with(|| StoredContent {
                media_type: media_type.to_string(),
                bytes,
            });
        Ok(digest)
    }

    /// Returns the content a descriptor points at.
    pub fn get(&self, descriptor: &Descriptor) -> Result<StoredContent> {
        let key = descriptor.digest().to_string();
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&key)
            .cloned()
            .ok_or_else(|| ToolError::not_found("content".to_string(), key))
    }

    /// Returns true if content with this digest has been stored.
    pub fn contains(&self, digest: &Digest) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&digest.to_string())
    }

    /// Returns the number of stored items.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

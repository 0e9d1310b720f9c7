//! Client-side storage and the persisted session token.
//!
//! # Design
//! `Storage` is the seam to whatever key-value store the host persists
//! across runs. `MemoryStorage` is the in-process implementation used by
//! default and in tests. `TokenStore` is the only code that knows the
//! storage key the bearer token lives under.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::error::StoreError;

/// Storage key the bearer token is persisted under.
pub const TOKEN_KEY: &str = "auth_token";

/// Key-value storage that outlives a single request.
pub trait Storage: Send + Sync + fmt::Debug {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Poisoned("memory storage"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Poisoned("memory storage"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Poisoned("memory storage"))?;
        entries.remove(key);
        Ok(())
    }
}

/// Handle to the persisted bearer token. Clones share the same storage.
#[derive(Debug, Clone)]
pub struct TokenStore {
    storage: Arc<dyn Storage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Current token, if any. Unreadable storage counts as no token.
    pub fn get(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(error) => {
                warn!(%error, "could not read session token");
                None
            }
        }
    }

    pub fn set(&self, token: &str) -> Result<(), StoreError> {
        if token.is_empty() {
            return self.clear();
        }
        self.storage.set(TOKEN_KEY, token)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove(TOKEN_KEY)
    }
}

//! User preference persistence
//!
//! The page remembers one thing between visits: the last selected tab.
//! Storage can be unavailable (private browsing, disabled storage, quota),
//! so every access degrades to "nothing saved" instead of failing the page.

use std::collections::HashMap;

use tracing::warn;

use crate::error::{PageError, PageResult};

/// Preference key for the last selected tab
pub const LAST_TAB_KEY: &str = "lastTab";

/// Flat string key/value store provided by the host
pub trait PreferenceStore {
    /// Reads `key`
    fn get(&self, key: &str) -> PageResult<Option<String>>;

    /// Writes `key`
    fn set(&mut self, key: &str, value: &str) -> PageResult<()>;
}

/// In-memory store, optionally failing every access
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    unavailable: bool,
}

impl MemoryStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose every access fails
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            values: HashMap::new(),
            unavailable: true,
        }
    }

    /// Sets a raw (already prefixed) value
    #[must_use]
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    /// Raw value for an already prefixed key
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Number of stored values
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> PageResult<Option<String>> {
        if self.unavailable {
            return Err(PageError::storage("store unavailable"));
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PageResult<()> {
        if self.unavailable {
            return Err(PageError::storage("store unavailable"));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Prefixed view over a [`PreferenceStore`]
#[derive(Debug, Clone)]
pub struct Preferences<S> {
    store: S,
    prefix: String,
}

impl<S: PreferenceStore> Preferences<S> {
    /// Wraps `store`, prefixing every key with `prefix`
    #[must_use]
    pub fn new(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Reads a preference, treating storage failures as "not saved"
    #[must_use]
    pub fn load(&self, key: &str) -> Option<String> {
        let full = self.full_key(key);
        match self.store.get(&full) {
            Ok(value) => value,
            Err(err) => {
                warn!(key = %full, error = %err, "preference read failed");
                None
            }
        }
    }

    /// Writes a preference; returns whether it was stored
    pub fn save(&mut self, key: &str, value: &str) -> bool {
        let full = self.full_key(key);
        match self.store.set(&full, value) {
            Ok(()) => true,
            Err(err) => {
                warn!(key = %full, error = %err, "preference write failed");
                false
            }
        }
    }

    /// Underlying store
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable underlying store
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Unwraps the underlying store
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }
}

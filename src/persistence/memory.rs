//! In-memory best score store.

use std::collections::BTreeMap;

use super::{BestScoreStore, StoreError};

/// Process-lifetime store. Also the default for seeded engines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: BTreeMap<String, u32>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one value.
    pub fn with_value(key: &str, best: u32) -> Self {
        let mut values = BTreeMap::new();
        values.insert(key.to_string(), best);
        Self { values }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing was stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl BestScoreStore for MemoryStore {
    fn load_best(&self, key: &str) -> Result<Option<u32>, StoreError> {
        Ok(self.values.get(key).copied())
    }

    fn save_best(&mut self, key: &str, best: u32) -> Result<(), StoreError> {
        // Never lower a stored best
        let entry = self.values.entry(key.to_string()).or_insert(0);
        *entry = (*entry).max(best);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.load_best("best2048").unwrap(), None);
    }

    #[test]
    fn test_save_is_monotonic() {
        let mut store = MemoryStore::with_value("best2048", 500);
        store.save_best("best2048", 200).unwrap();
        assert_eq!(store.load_best("best2048").unwrap(), Some(500));

        store.save_best("best2048", 900).unwrap();
        assert_eq!(store.load_best("best2048").unwrap(), Some(900));
        assert_eq!(store.len(), 1);
    }
}

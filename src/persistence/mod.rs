//! Best Score Persistence
//!
//! The engine reads the best score once per engine and writes it whenever
//! the session score passes it. Where it ends up (file, browser storage,
//! database) is up to the implementor of [`BestScoreStore`].

pub mod memory;

pub use memory::MemoryStore;

/// Persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backing storage cannot be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Key/value storage for the best score.
pub trait BestScoreStore {
    /// Read the best score stored under `key`, `None` if never written.
    fn load_best(&self, key: &str) -> Result<Option<u32>, StoreError>;

    /// Store `best` under `key`.
    fn save_best(&mut self, key: &str, best: u32) -> Result<(), StoreError>;
}

impl<T: BestScoreStore + ?Sized> BestScoreStore for &mut T {
    fn load_best(&self, key: &str) -> Result<Option<u32>, StoreError> {
        (**self).load_best(key)
    }

    fn save_best(&mut self, key: &str, best: u32) -> Result<(), StoreError> {
        (**self).save_best(key, best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bump<S: BestScoreStore>(mut store: S) {
        store.save_best("k", 9).unwrap();
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut store = MemoryStore::new();
        bump(&mut store);
        assert_eq!(store.load_best("k").unwrap(), Some(9));
    }
}

//! Premium level gate.

use std::sync::Arc;

use crate::error::StoreError;
use crate::storage::KeyValueStore;

/// Storage key for the unlock flag.
pub const UNLOCK_KEY: &str = "english_pro";
/// Sentinel stored once a valid code has been entered.
pub const UNLOCK_SENTINEL: &str = "true";
pub const DEFAULT_UNLOCK_CODE: &str = "ENGLISH2025";

pub struct UnlockGate {
    store: Arc<dyn KeyValueStore>,
    code: String,
}

impl UnlockGate {
    pub fn new(store: Arc<dyn KeyValueStore>, code: &str) -> Self {
        Self {
            store,
            code: code.trim().to_uppercase(),
        }
    }

    pub fn is_unlocked(&self) -> Result<bool, StoreError> {
        Ok(self.store.get(UNLOCK_KEY)?.as_deref() == Some(UNLOCK_SENTINEL))
    }

    /// Check `candidate` (trimmed, case-insensitive) and persist the flag on
    /// a match. Returns whether the code was accepted.
    pub fn try_unlock(&self, candidate: &str) -> Result<bool, StoreError> {
        if candidate.trim().to_uppercase() != self.code {
            tracing::info!("rejected unlock code");
            return Ok(false);
        }
        self.store.set(UNLOCK_KEY, UNLOCK_SENTINEL)?;
        tracing::info!("premium levels unlocked");
        Ok(true)
    }

    pub fn lock(&self) -> Result<(), StoreError> {
        self.store.remove(UNLOCK_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn code_is_trimmed_and_case_insensitive() {
        let store = Arc::new(MemoryStore::new());
        let gate = UnlockGate::new(store.clone(), DEFAULT_UNLOCK_CODE);
        assert!(!gate.is_unlocked().unwrap());

        assert!(!gate.try_unlock("ENGLISH2024").unwrap());
        assert!(!gate.is_unlocked().unwrap());

        assert!(gate.try_unlock("  english2025 ").unwrap());
        assert!(gate.is_unlocked().unwrap());
        assert_eq!(store.get(UNLOCK_KEY).unwrap().as_deref(), Some("true"));

        gate.lock().unwrap();
        assert!(!gate.is_unlocked().unwrap());
    }

    #[test]
    fn only_the_sentinel_counts() {
        let store = Arc::new(MemoryStore::new());
        store.set(UNLOCK_KEY, "yes").unwrap();
        let gate = UnlockGate::new(store, "CODE");
        assert!(!gate.is_unlocked().unwrap());
    }
}

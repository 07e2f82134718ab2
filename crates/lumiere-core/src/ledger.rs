//! The mistake ledger: item ids the learner has answered incorrectly.
//!
//! Persisted under [`MISTAKES_KEY`] as a JSON array of strings. Every
//! mutation is a read-modify-write of the whole set and hits storage
//! immediately.

use std::sync::Arc;

use crate::error::StoreError;
use crate::model::{Curriculum, VocabularyItem};
use crate::storage::KeyValueStore;

/// Storage key for the ledger.
pub const MISTAKES_KEY: &str = "mistakes";

#[derive(Clone)]
pub struct MistakeLedger {
    store: Arc<dyn KeyValueStore>,
}

impl MistakeLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Recorded ids in insertion order. An absent key is an empty ledger; a
    /// corrupt value is logged and treated as empty.
    pub fn ids(&self) -> Result<Vec<String>, StoreError> {
        let Some(raw) = self.store.get(MISTAKES_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(mut ids) => {
                let mut seen = std::collections::HashSet::new();
                ids.retain(|id| seen.insert(id.clone()));
                Ok(ids)
            }
            Err(e) => {
                tracing::warn!("mistake ledger is corrupt, treating as empty: {e}");
                Ok(Vec::new())
            }
        }
    }

    pub fn contains(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.ids()?.iter().any(|m| m == id))
    }

    /// Add `id` if absent. Returns `true` if the ledger changed.
    pub fn record(&self, id: &str) -> Result<bool, StoreError> {
        let mut ids = self.ids()?;
        if ids.iter().any(|m| m == id) {
            return Ok(false);
        }
        ids.push(id.to_string());
        self.save(&ids)?;
        tracing::debug!(item = id, "recorded mistake");
        Ok(true)
    }

    /// Remove `id`. Returns `true` if it was present.
    pub fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut ids = self.ids()?;
        let before = ids.len();
        ids.retain(|m| m != id);
        if ids.len() == before {
            return Ok(false);
        }
        self.save(&ids)?;
        Ok(true)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.save(&[])
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.ids()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.ids()?.is_empty())
    }

    /// Resolve recorded ids to items, in curriculum order. Ids no longer in
    /// the curriculum are skipped.
    pub fn items<'a>(
        &self,
        curriculum: &'a Curriculum,
    ) -> Result<Vec<&'a VocabularyItem>, StoreError> {
        let ids = self.ids()?;
        Ok(curriculum
            .items()
            .filter(|item| ids.contains(&item.id))
            .collect())
    }

    fn save(&self, ids: &[String]) -> Result<(), StoreError> {
        let json = serde_json::to_string(ids)?;
        self.store.set(MISTAKES_KEY, &json)
    }
}

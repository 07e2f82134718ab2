//! Core data model types for lumiere.
//!
//! These are the read-only curriculum types that every study mode consumes:
//! vocabulary items, the levels that own them, and dialogue scenarios.

use serde::{Deserialize, Serialize};

/// One word or phrase record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    /// Unique, stable identifier (e.g. "w101").
    pub id: String,
    /// The word being learned.
    pub headword: String,
    /// Translation shown to the learner.
    pub translation: String,
    /// Pronunciation respelling (e.g. "/æmˈbɪʃ.ən/").
    #[serde(default)]
    pub pronunciation: String,
    /// Example sentence in the source language.
    #[serde(default)]
    pub example: String,
    /// Translation of the example sentence.
    #[serde(default)]
    pub example_translation: String,
    /// Identifier of the owning level.
    pub level_id: String,
}

/// A single line of a scripted dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioLine {
    pub speaker: String,
    pub text: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub avatar: String,
}

/// A short dialogue exchange attached to a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub lines: Vec<ScenarioLine>,
}

/// A themed, ordered collection of vocabulary items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Unique identifier (e.g. "lvl-1").
    pub id: String,
    /// Display title.
    pub title: String,
    /// Short subtitle ("Foundation Essentials").
    #[serde(default)]
    pub subtitle: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Icon glyph.
    #[serde(default)]
    pub icon: String,
    /// Whether the level is gated behind the unlock code.
    #[serde(default)]
    pub premium: bool,
    /// The level's vocabulary, in teaching order.
    #[serde(default)]
    pub items: Vec<VocabularyItem>,
    /// Dialogue scenarios for this level.
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl Level {
    /// Whether the learner is kept out of this level.
    pub fn is_locked(&self, unlocked: bool) -> bool {
        self.premium && !unlocked
    }
}

/// The full read-only catalog of levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curriculum {
    /// Display name of the catalog.
    #[serde(default)]
    pub name: String,
    /// Levels in display order.
    #[serde(default)]
    pub levels: Vec<Level>,
}

impl Curriculum {
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Find a level by identifier.
    pub fn level(&self, id: &str) -> Option<&Level> {
        self.levels.iter().find(|l| l.id == id)
    }

    /// Find an item by identifier across all levels.
    pub fn item(&self, id: &str) -> Option<&VocabularyItem> {
        self.items().find(|w| w.id == id)
    }

    /// All items across all levels, in curriculum order.
    pub fn items(&self) -> impl Iterator<Item = &VocabularyItem> {
        self.levels.iter().flat_map(|l| l.items.iter())
    }

    /// Total number of items across all levels.
    pub fn item_count(&self) -> usize {
        self.levels.iter().map(|l| l.items.len()).sum()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn premium_levels_lock_until_unlocked() {
        let free = level("lvl-1", false, vec![]);
        let premium = level("lvl-3", true, vec![]);
        assert!(!free.is_locked(false));
        assert!(premium.is_locked(false));
        assert!(!premium.is_locked(true));
    }

    #[test]
    fn curriculum_lookups() {
        let curriculum = Curriculum {
            name: "test".into(),
            levels: vec![
                level("lvl-1", false, five_items()),
                level("lvl-2", true, vec![item("w201", "Adequate", "足够的")]),
            ],
        };
        assert_eq!(curriculum.item_count(), 6);
        assert_eq!(curriculum.level("lvl-2").map(|l| l.items.len()), Some(1));
        assert_eq!(
            curriculum.item("w201").map(|w| w.headword.as_str()),
            Some("Adequate")
        );
        assert!(curriculum.item("missing").is_none());
        assert!(curriculum.level("lvl-9").is_none());
    }

    #[test]
    fn item_serde_defaults_optional_fields() {
        let json = r#"{"id":"w1","headword":"Hello","translation":"你好","level_id":"lvl-1"}"#;
        let item: VocabularyItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.headword, "Hello");
        assert!(item.pronunciation.is_empty());
        assert!(item.example.is_empty());
    }
}

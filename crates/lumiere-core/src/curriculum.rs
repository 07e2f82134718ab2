//! TOML curriculum loader.
//!
//! Loads level catalogs from TOML files and validates them. The default
//! catalog ships embedded in the binary.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Curriculum, Level, Scenario, ScenarioLine, VocabularyItem};

const BUILTIN_CURRICULUM: &str = include_str!("../curricula/default.toml");

/// Intermediate TOML structure for parsing curriculum files.
#[derive(Debug, Deserialize)]
struct TomlCurriculumFile {
    curriculum: TomlCurriculumHeader,
    #[serde(default)]
    levels: Vec<TomlLevel>,
}

#[derive(Debug, Deserialize)]
struct TomlCurriculumHeader {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TomlLevel {
    id: String,
    title: String,
    #[serde(default)]
    subtitle: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    premium: bool,
    #[serde(default)]
    words: Vec<TomlWord>,
    #[serde(default)]
    scenarios: Vec<TomlScenario>,
}

#[derive(Debug, Deserialize)]
struct TomlWord {
    id: String,
    headword: String,
    translation: String,
    #[serde(default)]
    pronunciation: String,
    #[serde(default)]
    example: String,
    #[serde(default)]
    example_translation: String,
    /// Normally omitted; the owning level is used.
    #[serde(default)]
    level_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlScenario {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    lines: Vec<TomlLine>,
}

#[derive(Debug, Deserialize)]
struct TomlLine {
    speaker: String,
    text: String,
    #[serde(default)]
    translation: String,
    #[serde(default)]
    avatar: String,
}

impl Curriculum {
    /// The embedded default catalog.
    pub fn builtin() -> Result<Curriculum> {
        parse_curriculum_str(BUILTIN_CURRICULUM, Path::new("<builtin>"))
    }
}

/// Parse a single TOML file into a `Curriculum`.
pub fn parse_curriculum(path: &Path) -> Result<Curriculum> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read curriculum file: {}", path.display()))?;

    parse_curriculum_str(&content, path)
}

/// Parse a TOML string into a `Curriculum` (useful for testing).
pub fn parse_curriculum_str(content: &str, source_path: &Path) -> Result<Curriculum> {
    let parsed: TomlCurriculumFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let levels = parsed
        .levels
        .into_iter()
        .map(|l| {
            let items = l
                .words
                .into_iter()
                .map(|w| VocabularyItem {
                    id: w.id,
                    headword: w.headword,
                    translation: w.translation,
                    pronunciation: w.pronunciation,
                    example: w.example,
                    example_translation: w.example_translation,
                    level_id: w.level_id.unwrap_or_else(|| l.id.clone()),
                })
                .collect();

            let scenarios = l
                .scenarios
                .into_iter()
                .map(|s| Scenario {
                    id: s.id,
                    title: s.title,
                    description: s.description,
                    lines: s
                        .lines
                        .into_iter()
                        .map(|line| ScenarioLine {
                            speaker: line.speaker,
                            text: line.text,
                            translation: line.translation,
                            avatar: line.avatar,
                        })
                        .collect(),
                })
                .collect();

            Level {
                id: l.id,
                title: l.title,
                subtitle: l.subtitle,
                description: l.description,
                icon: l.icon,
                premium: l.premium,
                items,
                scenarios,
            }
        })
        .collect();

    Ok(Curriculum {
        name: parsed.curriculum.name,
        levels,
    })
}

/// A warning from curriculum validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The level or item ID (if applicable).
    pub subject: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a curriculum for common authoring mistakes.
pub fn validate_curriculum(curriculum: &Curriculum) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_levels = HashSet::new();
    for level in &curriculum.levels {
        if !seen_levels.insert(&level.id) {
            warnings.push(ValidationWarning {
                subject: Some(level.id.clone()),
                message: format!("duplicate level ID: {}", level.id),
            });
        }
        if level.items.is_empty() {
            warnings.push(ValidationWarning {
                subject: Some(level.id.clone()),
                message: "level has no words".into(),
            });
        }
    }

    // Item ids must be unique across the whole catalog: the mistake ledger
    // stores bare ids.
    let mut seen_items = HashSet::new();
    for level in &curriculum.levels {
        for item in &level.items {
            if !seen_items.insert(&item.id) {
                warnings.push(ValidationWarning {
                    subject: Some(item.id.clone()),
                    message: format!("duplicate word ID: {}", item.id),
                });
            }
            if item.level_id != level.id {
                warnings.push(ValidationWarning {
                    subject: Some(item.id.clone()),
                    message: format!(
                        "word claims level '{}' but is listed under '{}'",
                        item.level_id, level.id
                    ),
                });
            }
            if item.headword.trim().is_empty() || item.translation.trim().is_empty() {
                warnings.push(ValidationWarning {
                    subject: Some(item.id.clone()),
                    message: "headword or translation is empty".into(),
                });
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[curriculum]
name = "Sample"

[[levels]]
id = "lvl-1"
title = "Level 1"
subtitle = "Basics"
icon = "🌱"

[[levels.words]]
id = "w1"
headword = "Hello"
translation = "你好"
pronunciation = "/həˈləʊ/"

[[levels.words]]
id = "w2"
headword = "World"
translation = "世界"

[[levels.scenarios]]
id = "s1"
title = "Greeting"

[[levels.scenarios.lines]]
speaker = "A"
text = "Hello!"

[[levels]]
id = "lvl-2"
title = "Level 2"
premium = true

[[levels.words]]
id = "w3"
headword = "Goodbye"
translation = "再见"
"#;

    #[test]
    fn parse_sample() {
        let curriculum = parse_curriculum_str(SAMPLE, Path::new("sample.toml")).unwrap();
        assert_eq!(curriculum.name, "Sample");
        assert_eq!(curriculum.levels.len(), 2);
        let first = &curriculum.levels[0];
        assert!(!first.premium);
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.items[0].level_id, "lvl-1");
        assert_eq!(first.scenarios[0].lines[0].text, "Hello!");
        assert!(curriculum.levels[1].premium);
        assert!(validate_curriculum(&curriculum).is_empty());
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let curriculum = Curriculum::builtin().unwrap();
        assert_eq!(curriculum.levels.len(), 5);
        assert_eq!(curriculum.item_count(), 20);
        assert!(curriculum.level("lvl-3").unwrap().premium);
        assert_eq!(curriculum.level("lvl-1").unwrap().scenarios.len(), 1);
        assert!(
            validate_curriculum(&curriculum).is_empty(),
            "{:?}",
            validate_curriculum(&curriculum)
        );
    }

    #[test]
    fn validate_catches_duplicates_and_mismatches() {
        let toml_str = r#"
[curriculum]
name = "Broken"

[[levels]]
id = "lvl-1"
title = "One"

[[levels.words]]
id = "w1"
headword = "Hello"
translation = "你好"

[[levels.words]]
id = "w1"
headword = " "
translation = "世界"
level_id = "lvl-9"

[[levels]]
id = "lvl-2"
title = "Empty"
"#;
        let curriculum = parse_curriculum_str(toml_str, Path::new("broken.toml")).unwrap();
        let warnings = validate_curriculum(&curriculum);
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("duplicate word ID")));
        assert!(messages.iter().any(|m| m.contains("claims level 'lvl-9'")));
        assert!(messages.iter().any(|m| m.contains("empty")));
        assert!(messages.iter().any(|m| m.contains("no words")));
    }

    #[test]
    fn parse_rejects_missing_header() {
        let result = parse_curriculum_str("[[levels]]\nid = \"x\"\ntitle = \"x\"\n", Path::new("x"));
        assert!(result.is_err());
    }
}

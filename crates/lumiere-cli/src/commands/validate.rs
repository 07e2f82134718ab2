//! The `lumiere validate` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use lumiere_core::curriculum::{parse_curriculum, validate_curriculum};
use lumiere_core::model::Curriculum;
use lumiere_speech::config::load_config_from;

pub fn execute(curriculum_path: Option<PathBuf>, config_path: Option<&Path>) -> Result<()> {
    let path = match curriculum_path {
        Some(path) => Some(path),
        None => load_config_from(config_path)?.curriculum,
    };

    let curriculum = match &path {
        Some(path) => parse_curriculum(path)?,
        None => Curriculum::builtin()?,
    };

    let source = path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    println!(
        "Curriculum: {} ({source}): {} levels, {} words",
        curriculum.name,
        curriculum.levels().len(),
        curriculum.item_count()
    );

    let warnings = validate_curriculum(&curriculum);
    for w in &warnings {
        let prefix = w
            .subject
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Curriculum is valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}

//! The `lumiere list` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use crate::context::AppContext;

pub fn execute(ctx: &AppContext, level_id: &str) -> Result<()> {
    let level = ctx.open_level(level_id)?;

    println!("{}: {}", level.title, level.subtitle);
    if !level.description.is_empty() {
        println!("{}", level.description);
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Word", "Pronunciation", "Meaning", "Example"]);
    for item in &level.items {
        table.add_row(vec![
            Cell::new(&item.id),
            Cell::new(&item.headword),
            Cell::new(&item.pronunciation),
            Cell::new(&item.translation),
            Cell::new(format!("{}\n{}", item.example, item.example_translation).trim()),
        ]);
    }
    println!("{table}");

    Ok(())
}

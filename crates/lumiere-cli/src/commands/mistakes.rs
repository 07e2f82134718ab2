//! The `lumiere mistakes` command.

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use crate::context::AppContext;

pub fn list(ctx: &AppContext) -> Result<()> {
    let items = ctx
        .ledger
        .items(&ctx.curriculum)
        .context("failed to read the mistake book")?;

    if items.is_empty() {
        println!("No mistakes yet! Good job.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Word", "Meaning", "Level"]);
    for item in &items {
        table.add_row(vec![
            Cell::new(&item.id),
            Cell::new(&item.headword),
            Cell::new(&item.translation),
            Cell::new(&item.level_id),
        ]);
    }
    println!("{table}");
    println!("{} word(s) to review.", items.len());

    Ok(())
}

pub fn remove(ctx: &AppContext, id: &str) -> Result<()> {
    if ctx
        .ledger
        .remove(id)
        .context("failed to update the mistake book")?
    {
        println!("Removed {id} from the mistake book.");
    } else {
        println!("{id} is not in the mistake book.");
    }
    Ok(())
}

pub fn clear(ctx: &AppContext) -> Result<()> {
    ctx.ledger
        .clear()
        .context("failed to clear the mistake book")?;
    println!("Mistake book cleared.");
    Ok(())
}

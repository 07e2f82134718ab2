//! The `lumiere levels` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use crate::context::AppContext;

pub fn execute(ctx: &AppContext) -> Result<()> {
    let unlocked = ctx.is_unlocked()?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Level", "Focus", "Words", "Scenarios", "Access"]);

    for level in ctx.curriculum.levels() {
        let access = match (level.premium, unlocked) {
            (false, _) => "free",
            (true, true) => "unlocked",
            (true, false) => "locked",
        };
        table.add_row(vec![
            Cell::new(&level.id),
            Cell::new(format!("{} {}", level.icon, level.title).trim()),
            Cell::new(&level.subtitle),
            Cell::new(level.items.len()),
            Cell::new(level.scenarios.len()),
            Cell::new(access),
        ]);
    }

    println!("{}", ctx.curriculum.name);
    println!("{table}");

    let mistakes = ctx.ledger.len()?;
    if mistakes > 0 {
        println!("\n{mistakes} word(s) in the mistake book. Run `lumiere quiz --mistakes` to review.");
    }
    if !unlocked && ctx.curriculum.levels().iter().any(|l| l.premium) {
        println!("\nPremium levels are locked. Run `lumiere unlock <CODE>` to open them.");
    }

    Ok(())
}

//! The `lumiere scenario` command.

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use lumiere_core::model::{Level, Scenario, ScenarioLine};
use lumiere_speech::ScenarioPlayer;

use crate::context::AppContext;

pub async fn execute(ctx: &AppContext, id: Option<&str>, silent: bool) -> Result<()> {
    let Some(id) = id else {
        return list(ctx);
    };

    let (level, scenario) = find(ctx, id).with_context(|| format!("unknown scenario '{id}'"))?;
    // Opening the level enforces the premium lock.
    ctx.open_level(&level.id)?;

    println!("{}", scenario.title);
    if !scenario.description.is_empty() {
        println!("{}", scenario.description);
    }
    println!();

    let print_line = |_: usize, line: &ScenarioLine, _: &str| {
        println!("{} {}: {}", line.avatar, line.speaker, line.text);
        println!("    {}", line.translation);
    };

    if silent {
        for (i, line) in scenario.lines.iter().enumerate() {
            print_line(i, line, "");
        }
        return Ok(());
    }

    let speech = ctx.speech()?;
    let player = ScenarioPlayer::new(speech.playback, ctx.config.voices());
    let played = player.play(scenario, print_line).await;
    tracing::debug!(played, total = scenario.lines.len(), "scenario finished");

    Ok(())
}

fn find<'a>(ctx: &'a AppContext, id: &str) -> Option<(&'a Level, &'a Scenario)> {
    ctx.curriculum.levels().iter().find_map(|level| {
        level
            .scenarios
            .iter()
            .find(|s| s.id == id)
            .map(|s| (level, s))
    })
}

fn list(ctx: &AppContext) -> Result<()> {
    let unlocked = ctx.is_unlocked()?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Scenario", "Level", "Lines", "Access"]);
    for level in ctx.curriculum.levels() {
        for scenario in &level.scenarios {
            table.add_row(vec![
                Cell::new(&scenario.id),
                Cell::new(&scenario.title),
                Cell::new(&level.id),
                Cell::new(scenario.lines.len()),
                Cell::new(if level.is_locked(unlocked) {
                    "locked"
                } else {
                    "open"
                }),
            ]);
        }
    }
    println!("{table}");
    Ok(())
}

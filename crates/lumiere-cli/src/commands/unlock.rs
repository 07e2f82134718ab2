//! The `lumiere unlock` command.

use anyhow::{Context, Result};

use crate::context::AppContext;

pub fn execute(ctx: &AppContext, code: Option<&str>, lock: bool) -> Result<()> {
    if lock {
        ctx.gate.lock().context("failed to update learner state")?;
        println!("Premium levels locked.");
        return Ok(());
    }

    let Some(code) = code else {
        if ctx.is_unlocked()? {
            println!("Premium levels are unlocked.");
        } else {
            println!("Premium levels are locked. Run `lumiere unlock <CODE>`.");
        }
        return Ok(());
    };

    if ctx
        .gate
        .try_unlock(code)
        .context("failed to update learner state")?
    {
        println!("Unlocked! All premium levels are now open.");
        Ok(())
    } else {
        anyhow::bail!("invalid unlock code")
    }
}

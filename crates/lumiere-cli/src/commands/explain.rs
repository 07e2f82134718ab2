//! The `lumiere explain` command.

use anyhow::Result;

use crate::context::AppContext;

pub async fn execute(ctx: &AppContext, phrase: &str) -> Result<()> {
    let speech = ctx.speech()?;
    println!("{}", speech.explainer.explain(phrase).await);
    Ok(())
}

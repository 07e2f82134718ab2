//! The `lumiere say` command.

use anyhow::Result;

use crate::context::AppContext;

pub async fn execute(ctx: &AppContext, text: &str, voice: Option<&str>) -> Result<()> {
    let speech = ctx.speech()?;
    let voice = voice.unwrap_or(speech.playback.default_voice()).to_string();

    match speech.playback.try_speak(text, &voice).await {
        Ok(spoken) => {
            println!("{text} ({voice}, {:.1}s)", spoken.duration.as_secs_f64());
            // Keep the process alive until the clip has played.
            tokio::time::sleep(spoken.duration).await;
            Ok(())
        }
        Err(e) => {
            speech.playback.report(&e);
            Ok(())
        }
    }
}

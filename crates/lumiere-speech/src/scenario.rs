//! Dialogue playback: speak a scenario line by line in two voices.

use std::time::Duration;

use lumiere_core::model::{Scenario, ScenarioLine};

use crate::playback::AudioPlaybackService;

/// Voice assignment for a two-speaker dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoicePair {
    pub primary: String,
    pub partner: String,
}

impl Default for VoicePair {
    fn default() -> Self {
        Self {
            primary: "Kore".into(),
            partner: "Fenrir".into(),
        }
    }
}

impl VoicePair {
    /// Even-indexed lines take the primary voice, odd-indexed the partner.
    pub fn for_line(&self, index: usize) -> &str {
        if index % 2 == 0 {
            &self.primary
        } else {
            &self.partner
        }
    }
}

/// Plays a scenario through the playback service.
pub struct ScenarioPlayer {
    playback: AudioPlaybackService,
    voices: VoicePair,
    /// Wait for each clip to finish before starting the next line.
    paced: bool,
    /// Extra silence between lines when paced.
    gap: Duration,
}

impl ScenarioPlayer {
    pub fn new(playback: AudioPlaybackService, voices: VoicePair) -> Self {
        Self {
            playback,
            voices,
            paced: true,
            gap: Duration::from_millis(300),
        }
    }

    pub fn with_pacing(mut self, paced: bool) -> Self {
        self.paced = paced;
        self
    }

    pub fn voices(&self) -> &VoicePair {
        &self.voices
    }

    /// Speak every line in order, calling `on_line` before each one.
    ///
    /// Returns the number of lines that played. A failed line is reported
    /// as a notice and skipped.
    pub async fn play<F>(&self, scenario: &Scenario, mut on_line: F) -> usize
    where
        F: FnMut(usize, &ScenarioLine, &str),
    {
        tracing::info!(scenario = %scenario.id, lines = scenario.lines.len(), "playing scenario");

        let mut played = 0;
        for (index, line) in scenario.lines.iter().enumerate() {
            let voice = self.voices.for_line(index);
            on_line(index, line, voice);

            match self.playback.try_speak(&line.text, voice).await {
                Ok(spoken) => {
                    played += 1;
                    if self.paced {
                        tokio::time::sleep(spoken.duration + self.gap).await;
                    }
                }
                Err(e) => self.playback.report(&e),
            }
        }
        played
    }
}

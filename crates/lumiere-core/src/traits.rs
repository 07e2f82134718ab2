//! Core trait definitions for the remote speech service and answer cues.
//!
//! `SpeechService` is implemented by the HTTP client and the mock in
//! `lumiere-speech`; `CuePlayer` is implemented by the audio playback service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

// ---------------------------------------------------------------------------
// Speech service trait
// ---------------------------------------------------------------------------

/// Backend that synthesizes speech and explains phrases.
#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Human-readable backend name (e.g. "proxy").
    fn name(&self) -> &str;

    /// Synthesize `request.text` with `request.voice`.
    async fn synthesize(&self, request: &SynthesisRequest)
        -> Result<SynthesisResponse, ServiceError>;

    /// Ask for a plain-language explanation of a phrase.
    async fn explain(&self, request: &ExplainRequest) -> Result<ExplainResponse, ServiceError>;
}

/// Request to synthesize speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    /// Text to speak.
    pub text: String,
    /// Prebuilt voice name (e.g. "Kore").
    pub voice: String,
}

/// Successful synthesis response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisResponse {
    /// Base64-encoded 16-bit little-endian PCM, as sent by the service.
    pub audio: String,
}

/// Request to explain a phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainRequest {
    pub text: String,
}

/// Explanation response. `text` is absent when the model returned nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplainResponse {
    #[serde(default)]
    pub text: Option<String>,
}

// ---------------------------------------------------------------------------
// Answer cues
// ---------------------------------------------------------------------------

/// A short fixed clip signalling whether an answer was right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Correct,
    Incorrect,
}

impl Cue {
    /// The text spoken for this cue.
    pub fn text(self) -> &'static str {
        match self {
            Cue::Correct => "Correct",
            Cue::Incorrect => "Incorrect",
        }
    }
}

/// Plays answer cues. Implementations must not block.
pub trait CuePlayer: Send + Sync {
    fn play_cue(&self, cue: Cue);
}

/// Cue player that stays silent.
pub struct SilentCues;

impl CuePlayer for SilentCues {
    fn play_cue(&self, _: Cue) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesis_request_wire_shape() {
        let req = SynthesisRequest {
            text: "Hello".into(),
            voice: "Kore".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"text": "Hello", "voice": "Kore"}));
    }

    #[test]
    fn explain_response_tolerates_missing_text() {
        let resp: ExplainResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.text.is_none());
    }

    #[test]
    fn cue_texts_are_fixed() {
        assert_eq!(Cue::Correct.text(), "Correct");
        assert_eq!(Cue::Incorrect.text(), "Incorrect");
    }
}

//! Error types shared across lumiere crates.
//!
//! `ServiceError` lives here rather than in `lumiere-speech` so that the
//! playback service, the explanation client, and any test double can all
//! classify failures by variant instead of by message text.

use thiserror::Error;

/// Errors that can occur when talking to the remote speech/explanation service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The service returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    Throttled { retry_after_ms: u64 },

    /// The service returned an error, or a success body without audio.
    #[error("speech synthesis failed: {0}")]
    SynthesisFailed(String),

    /// The audio payload could not be decoded.
    #[error("audio decoding failed: {0}")]
    DecodeFailed(String),

    /// The explanation request failed.
    #[error("explanation unavailable: {0}")]
    ExplanationUnavailable(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),
}

impl ServiceError {
    /// The transient notice shown to the learner for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            ServiceError::Throttled { .. } => "Too many requests. Please try again shortly.",
            ServiceError::DecodeFailed(_) => "Audio decoding failed. Please try again.",
            ServiceError::ExplanationUnavailable(_) => "Explanation is unavailable right now.",
            ServiceError::SynthesisFailed(_)
            | ServiceError::Timeout(_)
            | ServiceError::Network(_) => "Audio is unavailable right now.",
        }
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ServiceError::Throttled { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// Errors raised by the quiz engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// An operation was invoked on a session in the wrong lifecycle state.
    /// Always a caller bug.
    #[error("invalid quiz state: {0}")]
    InvalidState(String),
}

/// Errors raised by the local key/value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttled_has_distinct_message() {
        let throttled = ServiceError::Throttled {
            retry_after_ms: 5000,
        };
        let failed = ServiceError::SynthesisFailed("boom".into());
        assert_ne!(throttled.user_message(), failed.user_message());
        assert_eq!(throttled.retry_after_ms(), Some(5000));
        assert_eq!(failed.retry_after_ms(), None);
    }

    #[test]
    fn decode_failure_is_not_a_generic_failure() {
        let decode = ServiceError::DecodeFailed("bad base64".into());
        let network = ServiceError::Network("refused".into());
        assert_ne!(decode.user_message(), network.user_message());
    }

    #[test]
    fn display_includes_server_message() {
        let err = ServiceError::SynthesisFailed("quota exceeded".into());
        assert!(err.to_string().contains("quota exceeded"));
    }
}

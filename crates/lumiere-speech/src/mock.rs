//! Mock speech service for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use lumiere_core::traits::{
    ExplainRequest, ExplainResponse, SpeechService, SynthesisRequest, SynthesisResponse,
};
use lumiere_core::ServiceError;

use crate::audio::encode_clip;

/// A speech service that answers from fixed data without touching the network.
pub struct MockSpeechService {
    /// Transport text returned for every synthesis request.
    audio: String,
    /// When set, synthesis requests fail with this error.
    synthesis_error: Option<ServiceError>,
    /// Limits `synthesis_error` to the first N requests.
    failing_calls: Option<u32>,
    /// Explanation returned for every explain request.
    explanation: Option<String>,
    /// When set, every explain request fails with this error.
    explain_error: Option<ServiceError>,
    /// Simulated latency per request.
    delay: Duration,
    synth_calls: AtomicU32,
    explain_calls: AtomicU32,
    last_request: Mutex<Option<SynthesisRequest>>,
}

impl MockSpeechService {
    /// A mock that returns `samples` for any text.
    pub fn with_samples(samples: &[f32]) -> Self {
        Self::with_audio(&encode_clip(samples))
    }

    /// A mock that returns `audio` verbatim as the transport text.
    pub fn with_audio(audio: &str) -> Self {
        Self {
            audio: audio.to_string(),
            synthesis_error: None,
            failing_calls: None,
            explanation: None,
            explain_error: None,
            delay: Duration::ZERO,
            synth_calls: AtomicU32::new(0),
            explain_calls: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A mock whose synthesis always fails.
    pub fn failing(error: ServiceError) -> Self {
        let mut mock = Self::with_samples(&[]);
        mock.synthesis_error = Some(error);
        mock
    }

    /// Fail the first `times` synthesis requests, then answer normally.
    pub fn failing_first(mut self, error: ServiceError, times: u32) -> Self {
        self.synthesis_error = Some(error);
        self.failing_calls = Some(times);
        self
    }

    pub fn with_explanation(mut self, text: Option<&str>) -> Self {
        self.explanation = text.map(str::to_string);
        self
    }

    pub fn with_explain_error(mut self, error: ServiceError) -> Self {
        self.explain_error = Some(error);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of synthesis requests received.
    pub fn call_count(&self) -> u32 {
        self.synth_calls.load(Ordering::Relaxed)
    }

    /// Number of explain requests received.
    pub fn explain_count(&self) -> u32 {
        self.explain_calls.load(Ordering::Relaxed)
    }

    /// The last synthesis request received.
    pub fn last_request(&self) -> Option<SynthesisRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SpeechService for MockSpeechService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisResponse, ServiceError> {
        let call = self.synth_calls.fetch_add(1, Ordering::Relaxed);
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(request.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let fails = self.failing_calls.map_or(true, |n| call < n);
        match &self.synthesis_error {
            Some(error) if fails => Err(error.clone()),
            _ => Ok(SynthesisResponse {
                audio: self.audio.clone(),
            }),
        }
    }

    async fn explain(&self, _request: &ExplainRequest) -> Result<ExplainResponse, ServiceError> {
        self.explain_calls.fetch_add(1, Ordering::Relaxed);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.explain_error {
            Some(error) => Err(error.clone()),
            None => Ok(ExplainResponse {
                text: self.explanation.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::decode_clip;

    #[tokio::test]
    async fn returns_encoded_samples() {
        let mock = MockSpeechService::with_samples(&[0.5, -0.5]);
        let request = SynthesisRequest {
            text: "Hello".into(),
            voice: "Kore".into(),
        };

        let response = mock.synthesize(&request).await.unwrap();
        assert_eq!(decode_clip(&response.audio).unwrap().samples, vec![0.5, -0.5]);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.last_request(), Some(request));
    }

    #[tokio::test]
    async fn failing_mock_returns_its_error() {
        let mock = MockSpeechService::failing(ServiceError::Throttled {
            retry_after_ms: 1000,
        });
        let request = SynthesisRequest {
            text: "Hello".into(),
            voice: "Kore".into(),
        };

        let err = mock.synthesize(&request).await.unwrap_err();
        assert_eq!(err.retry_after_ms(), Some(1000));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn failing_first_recovers() {
        let mock = MockSpeechService::with_samples(&[0.5])
            .failing_first(ServiceError::SynthesisFailed("busy".into()), 1);
        let request = SynthesisRequest {
            text: "Hello".into(),
            voice: "Kore".into(),
        };

        assert!(mock.synthesize(&request).await.is_err());
        assert!(mock.synthesize(&request).await.is_ok());
        assert_eq!(mock.call_count(), 2);
    }
}

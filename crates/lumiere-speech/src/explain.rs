//! Plain-language explanations of phrases. Nothing is cached.

use std::sync::Arc;

use lumiere_core::traits::{ExplainRequest, SpeechService};
use lumiere_core::ServiceError;

use crate::notice::{LogNotices, NoticeSink};

/// Shown when the service answered without any text.
pub const NO_EXPLANATION: &str = "No explanation.";
/// Shown when the request failed.
pub const EXPLANATION_FAILED: &str = "Thinking failed.";

pub struct ExplanationClient {
    service: Arc<dyn SpeechService>,
    notices: Arc<dyn NoticeSink>,
}

impl ExplanationClient {
    pub fn new(service: Arc<dyn SpeechService>) -> Self {
        Self::with_notices(service, Arc::new(LogNotices))
    }

    pub fn with_notices(service: Arc<dyn SpeechService>, notices: Arc<dyn NoticeSink>) -> Self {
        Self { service, notices }
    }

    /// Explain `phrase`, always producing display text.
    pub async fn explain(&self, phrase: &str) -> String {
        match self.try_explain(phrase).await {
            Ok(Some(text)) => text,
            Ok(None) => NO_EXPLANATION.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "explanation failed");
                self.notices.notify(&e);
                EXPLANATION_FAILED.to_string()
            }
        }
    }

    /// Explain `phrase`. `Ok(None)` means the service had nothing to say.
    pub async fn try_explain(&self, phrase: &str) -> Result<Option<String>, ServiceError> {
        let request = ExplainRequest {
            text: phrase.to_string(),
        };
        let response = self.service.explain(&request).await.map_err(|e| match e {
            ServiceError::ExplanationUnavailable(_) => e,
            other => ServiceError::ExplanationUnavailable(other.to_string()),
        })?;

        Ok(response.text.filter(|t| !t.trim().is_empty()))
    }
}

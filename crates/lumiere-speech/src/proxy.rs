//! HTTP client for the speech/explanation proxy.
//!
//! The proxy exposes one endpoint, `POST {base}/api/proxy`, with a `type`
//! discriminator selecting text-to-speech or explanation. It keeps the
//! model credentials server-side; this client never sees them.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use lumiere_core::traits::{
    ExplainRequest, ExplainResponse, SpeechService, SynthesisRequest, SynthesisResponse,
};
use lumiere_core::ServiceError;

const PROXY_PATH: &str = "/api/proxy";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// Speech service backed by the HTTP proxy.
pub struct ProxyClient {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl ProxyClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ServiceError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, body: &ProxyRequest<'_>) -> Result<RawReply, ServiceError> {
        let response = self
            .client
            .post(format!("{}{PROXY_PATH}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        let retry_after_ms = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
            * 1000;
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        Ok(RawReply {
            status,
            retry_after_ms,
            body,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> ServiceError {
        if e.is_timeout() {
            ServiceError::Timeout(self.timeout_secs)
        } else {
            ServiceError::Network(e.to_string())
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ProxyRequest<'a> {
    Tts { text: &'a str, voice: &'a str },
    Explain { text: &'a str },
}

#[derive(Deserialize, Default)]
struct ProxyResponse {
    #[serde(default)]
    audio: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

struct RawReply {
    status: u16,
    retry_after_ms: u64,
    body: String,
}

impl RawReply {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The server's `error` field if the body carries one, else the raw body.
    fn error_message(&self) -> String {
        let message = serde_json::from_str::<ProxyResponse>(&self.body)
            .ok()
            .and_then(|r| r.error)
            .unwrap_or_else(|| self.body.trim().to_string());
        if message.is_empty() {
            format!("HTTP {}", self.status)
        } else {
            message
        }
    }
}

#[async_trait]
impl SpeechService for ProxyClient {
    fn name(&self) -> &str {
        "proxy"
    }

    #[instrument(skip(self, request), fields(voice = %request.voice, chars = request.text.len()))]
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisResponse, ServiceError> {
        let reply = self
            .post(&ProxyRequest::Tts {
                text: &request.text,
                voice: &request.voice,
            })
            .await?;

        if reply.status == 429 {
            return Err(ServiceError::Throttled {
                retry_after_ms: reply.retry_after_ms,
            });
        }
        if !reply.is_success() {
            let message = reply.error_message();
            tracing::warn!(status = reply.status, %message, "synthesis request rejected");
            return Err(ServiceError::SynthesisFailed(message));
        }

        let parsed: ProxyResponse = serde_json::from_str(&reply.body)
            .map_err(|e| ServiceError::SynthesisFailed(format!("malformed response: {e}")))?;
        if let Some(error) = parsed.error {
            return Err(ServiceError::SynthesisFailed(error));
        }

        match parsed.audio {
            Some(audio) if !audio.trim().is_empty() => Ok(SynthesisResponse { audio }),
            _ => Err(ServiceError::SynthesisFailed(
                "no audio data received".into(),
            )),
        }
    }

    #[instrument(skip(self, request), fields(chars = request.text.len()))]
    async fn explain(&self, request: &ExplainRequest) -> Result<ExplainResponse, ServiceError> {
        let reply = self
            .post(&ProxyRequest::Explain {
                text: &request.text,
            })
            .await
            .map_err(|e| ServiceError::ExplanationUnavailable(e.to_string()))?;

        if !reply.is_success() {
            return Err(ServiceError::ExplanationUnavailable(reply.error_message()));
        }

        let parsed: ProxyResponse = serde_json::from_str(&reply.body).map_err(|e| {
            ServiceError::ExplanationUnavailable(format!("malformed response: {e}"))
        })?;
        if let Some(error) = parsed.error {
            return Err(ServiceError::ExplanationUnavailable(error));
        }

        Ok(ExplainResponse { text: parsed.text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn hello() -> SynthesisRequest {
        SynthesisRequest {
            text: "Hello".into(),
            voice: "Kore".into(),
        }
    }

    #[tokio::test]
    async fn successful_synthesis() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/proxy"))
            .and(body_json(
                serde_json::json!({"type": "tts", "text": "Hello", "voice": "Kore"}),
            ))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"audio": "AAABAA=="})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ProxyClient::new(&server.uri(), 5).unwrap();
        let response = client.synthesize(&hello()).await.unwrap();
        assert_eq!(response.audio, "AAABAA==");
    }

    #[tokio::test]
    async fn rate_limiting() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/proxy"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let client = ProxyClient::new(&server.uri(), 5).unwrap();
        let err = client.synthesize(&hello()).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Throttled {
                retry_after_ms: 7000
            }
        );
    }

    #[tokio::test]
    async fn rate_limiting_without_header_uses_default() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/proxy"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = ProxyClient::new(&server.uri(), 5).unwrap();
        let err = client.synthesize(&hello()).await.unwrap_err();
        assert_eq!(err.retry_after_ms(), Some(5000));
    }

    #[tokio::test]
    async fn server_error_carries_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/proxy"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"error": "model overloaded"})),
            )
            .mount(&server)
            .await;

        let client = ProxyClient::new(&server.uri(), 5).unwrap();
        let err = client.synthesize(&hello()).await.unwrap_err();
        assert_eq!(err, ServiceError::SynthesisFailed("model overloaded".into()));
    }

    #[tokio::test]
    async fn plain_text_error_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/proxy"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = ProxyClient::new(&server.uri(), 5).unwrap();
        let err = client.synthesize(&hello()).await.unwrap_err();
        assert_eq!(err, ServiceError::SynthesisFailed("Bad Gateway".into()));
    }

    #[tokio::test]
    async fn success_without_audio_is_a_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/proxy"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = ProxyClient::new(&server.uri(), 5).unwrap();
        let err = client.synthesize(&hello()).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::SynthesisFailed("no audio data received".into())
        );
    }

    #[tokio::test]
    async fn success_with_error_field_is_a_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/proxy"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"error": "No audio data received"})),
            )
            .mount(&server)
            .await;

        let client = ProxyClient::new(&server.uri(), 5).unwrap();
        let err = client.synthesize(&hello()).await.unwrap_err();
        assert!(matches!(err, ServiceError::SynthesisFailed(_)));
    }

    #[tokio::test]
    async fn timeout_is_classified() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/proxy"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"audio": "AAAA"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = ProxyClient::new(&server.uri(), 1).unwrap();
        let err = client.synthesize(&hello()).await.unwrap_err();
        assert_eq!(err, ServiceError::Timeout(1));
    }

    #[tokio::test]
    async fn connection_refused_is_a_network_error() {
        // Nothing listens on port 9 (discard) in the test environment.
        let client = ProxyClient::new("http://127.0.0.1:9", 5).unwrap();
        let err = client.synthesize(&hello()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Network(_)));
    }

    #[tokio::test]
    async fn successful_explanation() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/proxy"))
            .and(body_json(
                serde_json::json!({"type": "explain", "text": "Break a leg"}),
            ))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"text": "A way to wish someone luck."})),
            )
            .mount(&server)
            .await;

        let client = ProxyClient::new(&server.uri(), 5).unwrap();
        let response = client
            .explain(&ExplainRequest {
                text: "Break a leg".into(),
            })
            .await
            .unwrap();
        assert_eq!(response.text.as_deref(), Some("A way to wish someone luck."));
    }

    #[tokio::test]
    async fn explanation_failure_is_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/proxy"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = ProxyClient::new(&server.uri(), 5).unwrap();
        let err = client
            .explain(&ExplainRequest {
                text: "Hello".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ExplanationUnavailable(_)));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ProxyClient::new("http://localhost:3000/", 5).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }
}

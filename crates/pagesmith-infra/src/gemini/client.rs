//! GeminiGenerator -- concrete [`PageGenerator`] implementation for Gemini.
//!
//! Makes exactly one `generateContent` call per page. The API key is wrapped
//! in [`SecretString`], sent in the `x-goog-api-key` header (never in the URL)
//! and never logged.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info_span, Instrument};

use pagesmith_core::generator::{normalize_generated, GenerationRequest, PageGenerator};
use pagesmith_types::config::GeneratorSettings;
use pagesmith_types::error::GenerationError;

use crate::error_body::truncate_error_body;

use super::types::{Content, GenerateContentRequest, GenerateContentResponse};

/// Gemini content generator.
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl GeminiGenerator {
    /// Create a generator bounded by `timeout` per request.
    pub fn new(api_key: SecretString, settings: &GeneratorSettings, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn to_gemini_request(request: &GenerationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::text(request.user_prompt.clone())],
            system_instruction: Content::text(request.system_instruction.clone()),
        }
    }

    fn map_transport_error(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::TimedOut {
                seconds: self.timeout.as_secs(),
            }
        } else {
            GenerationError::Request(err.without_url().to_string())
        }
    }

    async fn call(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&Self::to_gemini_request(request))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = truncate_error_body(response.text().await.unwrap_or_default());
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.map_transport_error(e)
            } else {
                GenerationError::Malformed(format!("failed to parse response: {e}"))
            }
        })?;

        let text = parsed.first_text().ok_or_else(|| {
            GenerationError::Malformed("response has no candidate text".to_string())
        })?;
        debug!(chars = text.len(), "generation response received");

        normalize_generated(text)
    }
}

// Not Debug: keeps the key out of any accidental `{:?}`.

impl PageGenerator for GeminiGenerator {
    fn is_configured(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let span = info_span!("gemini.generate_content", model = %self.model);
        self.call(request).instrument(span).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    fn request() -> GenerationRequest {
        GenerationRequest {
            system_instruction: "be terse".to_string(),
            user_prompt: "make a page".to_string(),
        }
    }

    fn generator(base_url: &str) -> GeminiGenerator {
        GeminiGenerator::new(
            SecretString::from("test-key-not-real"),
            &GeneratorSettings::default(),
            Duration::from_secs(5),
        )
        .with_base_url(base_url)
    }

    #[test]
    fn test_url_names_model() {
        let g = generator("http://localhost:9/");
        assert_eq!(
            g.url(),
            "http://localhost:9/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_blank_key_is_not_configured() {
        let g = GeminiGenerator::new(
            SecretString::from(" "),
            &GeneratorSettings::default(),
            Duration::from_secs(1),
        );
        assert!(!g.is_configured());
        assert!(generator("http://x").is_configured());
    }

    #[tokio::test]
    async fn test_generate_sends_key_header_and_strips_fence() {
        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["x-goog-api-key"], "test-key-not-real");
                assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be terse");
                assert_eq!(body["contents"][0]["parts"][0]["text"], "make a page");
                Json(json!({
                    "candidates": [{"content": {"parts": [{"text": "```html\n<html>hi</html>\n```"}]}}]
                }))
            }),
        );
        let base = test_server::spawn(router).await;

        let html = generator(&base).generate(&request()).await.unwrap();
        assert_eq!(html, "<html>hi</html>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "quota exceeded") }),
        );
        let base = test_server::spawn(router).await;

        let err = generator(&base).generate(&request()).await.unwrap_err();
        match err {
            GenerationError::Status { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_candidates_is_malformed() {
        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async { Json(json!({"candidates": []})) }),
        );
        let base = test_server::spawn(router).await;

        let err = generator(&base).generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_empty_text_is_empty_error() {
        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async {
                Json(json!({"candidates": [{"content": {"parts": [{"text": "```\n\n```"}]}}]}))
            }),
        );
        let base = test_server::spawn(router).await;

        let err = generator(&base).generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Empty));
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({}))
            }),
        );
        let base = test_server::spawn(router).await;

        let g = GeminiGenerator::new(
            SecretString::from("k"),
            &GeneratorSettings::default(),
            Duration::from_millis(200),
        )
        .with_base_url(base);

        let err = g.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::TimedOut { .. }));
    }
}

//! Gemini REST client behind the narrow text-generation capability
//!
//! The fallback loop and the HTTP handlers only ever see the
//! [`TextGenerator`] trait, so tests can swap in a scripted provider and
//! run without network access.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ProviderError, ProviderErrorKind};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Capability interface over the LLM provider
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Runs one free-text completion against `model` and returns the raw
    /// reply text.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ProviderError>;

    /// Lists the models the account can use for text generation.
    async fn list_models(&self) -> Result<Vec<String>, ProviderError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    status: Option<String>,
}

#[derive(Deserialize)]
struct ModelsResponse {
    models: Option<Vec<ModelInfo>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

/// Production [`TextGenerator`] talking to the Gemini REST API
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl GeminiClient {
    /// A `None` key is tolerated so the process can start without
    /// credentials; every call then fails with a provider error.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            api_key,
        }
    }

    fn key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ProviderError::other("GEMINI_API_KEY is not set"))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        let key = self.key()?;
        let url = format!("{BASE_URL}/{model}:generateContent?key={key}");
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!(model, "calling Gemini generateContent");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::other(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let err = classify_http_error(status, &text);
            error!(model, %status, "Gemini call failed: {}", err.message);
            return Err(err);
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::other(format!("invalid response body: {e}")))?;

        parsed
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| ProviderError::other("response carried no text candidates"))
    }

    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let key = self.key()?;
        let url = format!("{BASE_URL}?key={key}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::other(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_http_error(status, &text));
        }

        let parsed: ModelsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::other(format!("invalid response body: {e}")))?;

        Ok(parsed
            .models
            .unwrap_or_default()
            .into_iter()
            .filter(|model| {
                model
                    .supported_generation_methods
                    .iter()
                    .any(|method| method == "generateContent")
            })
            .map(|model| {
                model
                    .name
                    .strip_prefix("models/")
                    .unwrap_or(&model.name)
                    .to_string()
            })
            .collect())
    }
}

/// Maps an unsuccessful provider reply to a coarse error kind. The Gemini
/// error body carries a gRPC-style `error.status` alongside the HTTP code.
fn classify_http_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
    let parsed = serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .and_then(|e| e.error);
    let api_status = parsed
        .as_ref()
        .and_then(|e| e.status.as_deref())
        .unwrap_or("");
    let message = parsed
        .as_ref()
        .and_then(|e| e.message.clone())
        .unwrap_or_else(|| format!("provider returned HTTP {status}"));

    let kind = if status == reqwest::StatusCode::SERVICE_UNAVAILABLE || api_status == "UNAVAILABLE"
    {
        ProviderErrorKind::Overloaded
    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || api_status == "RESOURCE_EXHAUSTED"
    {
        ProviderErrorKind::RateLimited
    } else if status == reqwest::StatusCode::NOT_FOUND || api_status == "NOT_FOUND" {
        ProviderErrorKind::ModelUnavailable
    } else {
        ProviderErrorKind::Other
    };

    ProviderError::new(kind, message)
}

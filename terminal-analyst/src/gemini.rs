//! Google Gemini `generateContent` client
//!
//! Only the structured-output path is used: the request pins the response
//! MIME type to JSON and attaches a response schema, and the caller gets
//! back the raw text of the first candidate part.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use terminal_core::{Provider, TerminalError, TerminalResult};
use tracing::{debug, instrument};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default model for market summaries
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    /// Create a client; without a key every request fails with `CredentialMissing`
    pub fn new(api_key: Option<String>) -> TerminalResult<Self> {
        Self::with_base_url(GEMINI_API_BASE, api_key)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> TerminalResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent("OrangeReactor/1.0")
            .build()
            .map_err(|e| TerminalError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Run a prompt constrained to `schema` and return the response text
    #[instrument(skip(self, prompt, schema), fields(model = %self.model))]
    pub async fn generate_json(
        &self,
        prompt: &str,
        schema: serde_json::Value,
    ) -> TerminalResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| TerminalError::credential_missing("GEMINI_API_KEY is not set"))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        debug!("Requesting Gemini completion ({} prompt chars)", prompt.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TerminalError::network(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TerminalError::http_status(
                Provider::Gemini,
                status.as_u16(),
                body,
            ));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| TerminalError::malformed(format!("Failed to parse Gemini response: {}", e)))?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| TerminalError::malformed("No response text from Gemini"))
    }
}

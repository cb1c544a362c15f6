//! Gemini provider (Google Generative Language API).

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ContentGenerator, GenerateError, RevisionMode, prompts};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.95;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Gemini API configuration.
///
/// The API key is supplied by the caller; nothing here reads the environment.
#[derive(Clone)]
pub struct GeminiConfig {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    top_p: f32,
    timeout: Duration,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        url::Url::parse(trimmed).with_context(|| format!("Invalid Gemini base URL: {base_url}"))?;
        self.base_url = trimmed.to_string();
        Ok(self)
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub const fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

fn build_request<'a>(
    config: &GeminiConfig,
    system: &'a str,
    prompt: &'a str,
) -> GenerateRequest<'a> {
    GenerateRequest {
        contents: vec![Content {
            role: Some("user"),
            parts: vec![RequestPart { text: prompt }],
        }],
        system_instruction: Content {
            role: None,
            parts: vec![RequestPart { text: system }],
        },
        generation_config: GenerationConfig {
            temperature: config.temperature,
            top_p: config.top_p,
        },
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String, GenerateError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .map_or_else(|| "no candidates".to_string(), |r| format!("blocked: {r}"));
        return Err(GenerateError::EmptyResponse(reason));
    };

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.trim().is_empty() {
        let reason = candidate
            .finish_reason
            .unwrap_or_else(|| "no text parts".to_string());
        return Err(GenerateError::EmptyResponse(reason));
    }
    Ok(text)
}

/// Pull a readable message out of an error body, falling back to the raw body.
fn error_message_from_body(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body)
        && let Some(message) = json
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str)
    {
        return message.to_string();
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no response body".to_string()
    } else {
        trimmed.to_string()
    }
}

fn classify_ureq_error(err: ureq::Error) -> GenerateError {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            GenerateError::Http {
                status,
                message: error_message_from_body(&body),
            }
        }
        ureq::Error::Transport(transport) => GenerateError::Transport(transport.to_string()),
    }
}

/// Blocking Gemini client.
pub struct GeminiGenerator {
    config: GeminiConfig,
    agent: ureq::Agent,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(concat!("revise/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { config, agent }
    }
}

impl ContentGenerator for GeminiGenerator {
    fn generate(
        &self,
        topic: &str,
        mode: RevisionMode,
        detail: &str,
    ) -> Result<String, GenerateError> {
        let prompt = prompts::user_prompt(topic, mode, detail)?;
        let request = build_request(&self.config, prompts::system_instruction(), &prompt);
        let url = self.config.endpoint();

        tracing::debug!(model = %self.config.model, %mode, topic, "sending generateContent");
        let started = std::time::Instant::now();

        let response = self
            .agent
            .post(&url)
            .set("x-goog-api-key", &self.config.api_key)
            .set("Content-Type", "application/json")
            .send_json(&request)
            .map_err(classify_ureq_error)?;

        let parsed: GenerateResponse = response
            .into_json()
            .map_err(|e| GenerateError::MalformedResponse(e.to_string()))?;
        let text = extract_text(parsed)?;

        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis(),
            bytes = text.len(),
            "generateContent finished"
        );
        Ok(text)
    }
}

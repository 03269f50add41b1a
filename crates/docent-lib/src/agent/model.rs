use anyhow::{Context, bail};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MODEL_TEMPERATURE;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A text-completion model driving the reasoning loop.
pub trait ReasoningModel {
    /// Complete `prompt`, cutting the reply at the first of `stop`.
    fn complete(&mut self, prompt: &str, stop: &[&str]) -> anyhow::Result<String>;
}

/// Google Gemini through the `generateContent` REST endpoint.
pub struct GeminiModel {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
    base_url: String,
}

impl GeminiModel {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: MODEL_TEMPERATURE,
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API host (proxies, emulators).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    temperature: f32,
    stop_sequences: &'a [&'a str],
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl ReasoningModel for GeminiModel {
    fn complete(&mut self, prompt: &str, stop: &[&str]) -> anyhow::Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                stop_sequences: stop,
            },
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Calling Gemini");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .context("Failed to reach the Gemini API")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            bail!("Gemini API returned {status}: {detail}");
        }

        let parsed: GenerateResponse = response
            .json()
            .context("Failed to decode Gemini response")?;
        let text = extract_text(parsed)?;
        debug!(reply_len = text.len(), "Gemini replied");
        Ok(text)
    }
}

fn extract_text(response: GenerateResponse) -> anyhow::Result<String> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        bail!("Gemini returned no candidates");
    };
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();
    Ok(text)
}

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use culturehub_core::config::GeminiConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Single-shot text generation against Gemini's `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    api_key: SecretString,
    endpoint: String,
}

impl GeminiClient {
    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build gemini http client")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: generate_content_url(&config.base_url, &config.model),
        })
    }
}

fn generate_content_url(base_url: &str, model: &str) -> String {
    format!("{}/models/{}:generateContent", base_url.trim_end_matches('/'), model)
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl GenerateResponse {
    fn into_text(self) -> Result<String> {
        if let Some(error) = self.error {
            bail!("Gemini error: {}", error.message);
        }

        let text = self
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect::<String>())
            .unwrap_or_default();

        if text.trim().is_empty() {
            bail!("Gemini returned no text candidates");
        }
        Ok(text)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request =
            GenerateRequest { contents: vec![Content { role: "user", parts: vec![TextPart { text: prompt }] }] };

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .context("gemini request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Gemini API error: {} - {}", status, body);
        }

        let payload: GenerateResponse =
            response.json().await.context("gemini response was not valid json")?;
        payload.into_text()
    }
}

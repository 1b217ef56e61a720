//! Gemini generative-language API client.
//!
//! A thin wrapper over the `generateContent` REST endpoint. One request per
//! prompt, one attempt per request: summarization is best effort and the
//! caller falls back to canned text on any failure, so retrying here would
//! only slow the run down.
//!
//! The [`GenerateText`] trait is the seam between the pipeline and the
//! network; tests substitute a canned implementation.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

/// Trait for prompting a generative model.
pub trait GenerateText {
    /// Send a prompt to the model and return its free-form text response.
    async fn generate(&self, prompt: &str) -> Result<String, Box<dyn Error>>;
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The key stays out of Debug output and logs.
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl GeminiClient {
    /// Create a client with the default endpoint and a 30 second timeout.
    pub fn new(api_key: String) -> Result<Self, Box<dyn Error>> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            api_key,
            endpoint: GEMINI_ENDPOINT.to_string(),
        })
    }

    #[cfg(test)]
    fn with_endpoint(api_key: String, endpoint: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            endpoint,
        }
    }
}

impl GenerateText for GeminiClient {
    #[instrument(level = "info", skip_all)]
    async fn generate(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
        let body = GenerateContentRequest::from_prompt(prompt);

        // The key travels in a header, never in the URL: reqwest errors
        // carry the request URL in their Display output, which ends up in
        // the logs.
        let t0 = Instant::now();
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, elapsed_ms = t0.elapsed().as_millis() as u64, "Gemini API returned an error");
            return Err(format!("Gemini API error: {status} - {text}").into());
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed
            .first_text()
            .ok_or("Gemini API response contained no candidate text")?;

        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            bytes = text.len(),
            "Gemini API call succeeded"
        );
        Ok(text)
    }
}

/// Request body for `generateContent`.
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                max_output_tokens: 1024,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

/// Response body for `generateContent`. Only the fields on the path to the
/// candidate text are modeled.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, if present.
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .map(|p| p.text.clone())
    }
}

//! Gemini `generateContent` client
//!
//! Sends one PNG with a fixed instruction and returns the first text fragment
//! of the first candidate.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::InferenceConfig;
use crate::error::ExtractionError;

/// Returned when the model answers successfully but without any text
pub const NO_TEXT_DETECTED: &str = "No text detected.";

/// Turns an image into text
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, png: &[u8], credential: &str) -> Result<String, ExtractionError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 2],
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

// Every field is optional: the API sends explicit nulls as well as omitting keys
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponseContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, if present and not blank
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }
}

fn build_request<'a>(instruction: &'a str, png: &[u8]) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: [Content {
            parts: [
                RequestPart::Text { text: instruction },
                RequestPart::InlineData {
                    inline_data: InlineData {
                        mime_type: "image/png",
                        data: BASE64.encode(png),
                    },
                },
            ],
        }],
    }
}

/// HTTP client for the Gemini API
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    instruction: String,
}

impl GeminiClient {
    /// Create a client from configuration
    pub fn new(config: &InferenceConfig) -> Result<Self, ExtractionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self::with_http_client(builder.build()?, config))
    }

    /// Create a client around an existing reqwest client
    pub fn with_http_client(http: reqwest::Client, config: &InferenceConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            instruction: config.instruction.clone(),
        }
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl TextRecognizer for GeminiClient {
    async fn recognize(&self, png: &[u8], credential: &str) -> Result<String, ExtractionError> {
        let body = build_request(&self.instruction, png);

        debug!("Sending {} byte image to {}", png.len(), self.url());
        let resp = self
            .http
            .post(self.url())
            .query(&[("key", credential)])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ExtractionError::Http {
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await?;
        let parsed: GenerateContentResponse = serde_json::from_slice(&body)
            .map_err(|e| ExtractionError::InvalidResponse(e.to_string()))?;
        Ok(parsed
            .first_text()
            .map(str::to_string)
            .unwrap_or_else(|| NO_TEXT_DETECTED.to_string()))
    }
}

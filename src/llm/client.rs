use std::time::Duration;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for the Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key (from GEMINI_API_KEY, or API_KEY)
    pub api_key: String,
    /// Model to use (e.g., "gemini-3-flash-preview")
    pub model: String,
    /// Temperature for transcription and fact analysis
    pub temperature: f64,
    /// Temperature for evidence chat
    pub chat_temperature: f64,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// API root, overridable for proxies
    pub base_url: String,
}

impl GeminiConfig {
    /// Create config from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .context("GEMINI_API_KEY environment variable not set")?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.model = model;
        }
        Ok(config)
    }

    /// Create with default settings
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: "gemini-3-flash-preview".to_string(),
            temperature: 0.1,
            chat_temperature: 0.2,
            timeout_secs: 300,
            base_url: API_BASE.to_string(),
        }
    }
}

/// Token accounting reported by the service for one call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub prompt_tokens: u64,
    pub candidates_tokens: u64,
    pub total_tokens: u64,
}

/// One piece of user content
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    /// Raw file bytes, sent base64 encoded
    InlineData { mime_type: String, data: Vec<u8> },
}

/// A single-turn generation request
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub system: Option<String>,
    pub parts: Vec<Part>,
    pub temperature: f64,
}

/// Model reply text plus token usage
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    pub usage: Usage,
}

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Send one request and return the concatenated text of the first candidate
    pub async fn generate(&self, request: GenerateRequest) -> Result<Generation> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let body = WireRequest::from(&request);

        debug!("Calling {} with {} parts", self.config.model, request.parts.len());

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::from_status(status, body));
        }

        let response: WireResponse = response.json().await?;
        Generation::try_from(response)
    }
}

/// MIME type for an evidence file name, by extension
pub fn mime_type_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" | "aac" => "audio/aac",
        "ogg" | "opus" => "audio/ogg",
        "flac" => "audio/flac",
        "webm" => "audio/webm",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "txt" => "text/plain",
        "md" => "text/markdown",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent>,
    contents: Vec<WireContent>,
    generation_config: GenerationConfig,
}

impl From<&GenerateRequest> for WireRequest {
    fn from(request: &GenerateRequest) -> Self {
        Self {
            system_instruction: request.system.as_ref().map(|system| WireContent {
                role: None,
                parts: vec![WirePart::text(system)],
            }),
            contents: vec![WireContent {
                role: Some("user".to_string()),
                parts: request.parts.iter().map(WirePart::from).collect(),
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WireContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl WirePart {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }
}

impl From<&Part> for WirePart {
    fn from(part: &Part) -> Self {
        match part {
            Part::Text(text) => WirePart::text(text),
            Part::InlineData { mime_type, data } => WirePart {
                inline_data: Some(InlineData {
                    mime_type: mime_type.clone(),
                    data: STANDARD.encode(data),
                }),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<WireContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
    #[serde(default)]
    total_token_count: u64,
}

impl TryFrom<WireResponse> for Generation {
    type Error = Error;

    fn try_from(response: WireResponse) -> Result<Self> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or(Error::EmptyResponse)?;

        // A candidate with no text is an empty reply, not a failure
        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        let usage = response.usage_metadata.unwrap_or_default();
        Ok(Generation {
            text,
            usage: Usage {
                prompt_tokens: usage.prompt_token_count,
                candidates_tokens: usage.candidates_token_count,
                total_tokens: usage.total_token_count,
            },
        })
    }
}

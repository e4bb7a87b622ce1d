//! Client for the vision model that reads scoresheet photos

pub mod prompt;
pub mod response;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use smartstats_types::{Player, ScoresheetAnalysis};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use prompt::build_prompt;
pub use response::{parse_analysis, strip_code_fences};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const MAX_TOKENS: u32 = 4096;
pub const SUPPORTED_MEDIA_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("No API key configured. Set ANTHROPIC_API_KEY in .env or provide via Settings.")]
    MissingApiKey,
    #[error("Unsupported image type: {0}")]
    UnsupportedMediaType(String),
    #[error("Analysis request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Analysis service returned {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("No text response from the analysis service")]
    EmptyResponse,
    #[error("Could not parse analysis result: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl AnalyzeError {
    /// Errors caused by the caller rather than the upstream service
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingApiKey | Self::UnsupportedMediaType(_))
    }
}

/// A scoresheet photo as uploaded
#[derive(Debug, Clone, Copy)]
pub struct ScoresheetImage<'a> {
    pub data: &'a [u8],
    pub media_type: &'a str,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock {
    Image { source: ImageSource },
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ResponseBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct ScoresheetAnalyzer {
    client: Client,
    base_url: String,
    model: String,
}

impl ScoresheetAnalyzer {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Reads a scoresheet photo into per-player batting lines.
    ///
    /// Player names are steered towards `roster`, but the result is not
    /// matched against it here; callers attribute ids afterwards.
    pub async fn analyze(
        &self,
        api_key: &str,
        image: ScoresheetImage<'_>,
        roster: &[Player],
        notes: &str,
    ) -> Result<ScoresheetAnalysis, AnalyzeError> {
        if api_key.trim().is_empty() {
            return Err(AnalyzeError::MissingApiKey);
        }
        if !SUPPORTED_MEDIA_TYPES.contains(&image.media_type) {
            return Err(AnalyzeError::UnsupportedMediaType(
                image.media_type.to_string(),
            ));
        }

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            kind: "base64",
                            media_type: image.media_type.to_string(),
                            data: STANDARD.encode(image.data),
                        },
                    },
                    ContentBlock::Text {
                        text: build_prompt(roster, notes),
                    },
                ],
            }],
        };

        info!(
            "Analyzing scoresheet ({} bytes, {}, {} roster players)",
            image.data.len(),
            image.media_type,
            roster.len()
        );

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|error| error.error.message)
                .unwrap_or(body);
            warn!("Analysis service returned {}: {}", status, message);
            return Err(AnalyzeError::Api { status, message });
        }

        let body: MessagesResponse = response.json().await?;
        let text = body
            .content
            .into_iter()
            .find_map(|block| match block {
                ResponseBlock::Text { text } => Some(text),
                ResponseBlock::Other => None,
            })
            .ok_or(AnalyzeError::EmptyResponse)?;

        let analysis = parse_analysis(&text)?;
        debug!("Analysis found {} players", analysis.players.len());
        Ok(analysis)
    }
}

//! Client for the remote multimodal model (Gemini `generateContent`).

use std::{path::Path, time::Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    config::Config,
    encoder::encode_file,
    error::{FramelensError, Result},
    prompt::ANALYSIS_PROMPT,
    types::EncodedMedia,
};

/// Inline request payloads above this size are usually rejected upstream.
pub const INLINE_PAYLOAD_SOFT_LIMIT: usize = 20 * 1024 * 1024;

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
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

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Reject anything that is not tagged as video before it leaves the machine.
pub fn ensure_video(media: &EncodedMedia) -> Result<()> {
    if media.mime_type.starts_with("video/") {
        Ok(())
    } else {
        Err(FramelensError::Validation {
            mime_type: media.mime_type.clone(),
        })
    }
}

/// User-facing message for a failed analysis.
pub fn describe_error(err: &FramelensError) -> String {
    format!("Error: {}", err)
}

pub struct AnalysisClient {
    config: Config,
    client: Client,
}

impl AnalysisClient {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Send the video and the fixed instruction; return the model's raw answer.
    ///
    /// A single attempt with no timeout. Long videos can take several minutes.
    pub async fn analyze(&self, media: &EncodedMedia) -> Result<String> {
        ensure_video(media)?;

        let approx_len = media.approx_decoded_len();
        if approx_len > INLINE_PAYLOAD_SOFT_LIMIT {
            warn!(
                bytes = approx_len,
                limit = INLINE_PAYLOAD_SOFT_LIMIT,
                "video is larger than the usual inline payload limit, the request may be rejected"
            );
        }

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: &media.mime_type,
                            data: &media.data,
                        },
                    },
                    Part::Text {
                        text: ANALYSIS_PROMPT,
                    },
                ],
            }],
        };

        info!(
            model = %self.config.model,
            mime_type = %media.mime_type,
            bytes = approx_len,
            "sending video for analysis"
        );
        let started = Instant::now();

        let response = self
            .client
            .post(self.config.generate_content_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FramelensError::remote(format!(
                "model returned {}: {}",
                status,
                body.trim()
            )));
        }

        let text = response
            .json::<GenerateContentResponse>()
            .await?
            .into_text()
            .ok_or_else(|| FramelensError::remote("model response contained no text"))?;

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            chars = text.len(),
            "analysis received"
        );

        Ok(text)
    }

    pub async fn analyze_file(&self, path: &Path, mime_override: Option<&str>) -> Result<String> {
        let media = encode_file(path, mime_override).await?;
        self.analyze(&media).await
    }
}

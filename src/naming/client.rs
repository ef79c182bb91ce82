/// Client for the hosted generation service
///
/// Wraps the single `generateContent` call this application makes: inline
/// image bytes plus a style instruction go out, a short title comes back.
/// The caller suspends until the response or failure arrives.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::prompt;
use crate::config::Config;
use crate::state::data::NameStyle;

/// The one error message shown on an item when generation fails.
/// Underlying detail goes to the log, never to the UI.
pub const GENERATION_ERROR_MESSAGE: &str =
    "Couldn't generate a name for this image. Please try again.";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to the generation service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generation service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("generation service response contained no text candidate")]
    EmptyResponse,
}

#[derive(Debug, Clone)]
pub struct NamingClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl NamingClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            api_base: config.api_base.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    /// Request a name for one image. On success the returned text is
    /// trimmed and unwrapped from a single layer of surrounding quotes;
    /// an empty string is a valid result.
    pub async fn generate_name(
        &self,
        base64_data: &str,
        mime_type: &str,
        style: NameStyle,
    ) -> Result<String, GenerationError> {
        let result = self.request_name(base64_data, mime_type, style).await;
        if let Err(error) = &result {
            log::error!("name generation failed: {}", error);
        }
        result
    }

    async fn request_name(
        &self,
        base64_data: &str,
        mime_type: &str,
        style: NameStyle,
    ) -> Result<String, GenerationError> {
        let payload = GenerateRequest {
            contents: [RequestContent {
                parts: [
                    RequestPart {
                        inline_data: Some(InlineData {
                            mime_type,
                            data: base64_data,
                        }),
                        text: None,
                    },
                    RequestPart {
                        inline_data: None,
                        text: Some(prompt::instruction_for(style)),
                    },
                ],
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .find_map(|part| part.text)
            .ok_or(GenerationError::EmptyResponse)?;

        Ok(tidy_name(&text))
    }
}

/// Trim whitespace and strip one layer of matching straight quotes.
/// No further validation: the service is instructed to answer with the
/// bare title, this only cleans up when it does not comply.
fn tidy_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let bytes = trimmed.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return trimmed[1..trimmed.len() - 1].to_string();
        }
    }
    trimmed.to_string()
}

// ── Wire payloads ───────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 2],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

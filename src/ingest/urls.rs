/// Remote URL ingestion
///
/// Takes newline-separated URL text, fetches each line through the image
/// relay, and keeps only responses that actually carry an image media
/// type. Lines are independent: every failure is collected and reported
/// once for the whole pass, alongside whatever succeeded.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use futures::future::join_all;
use thiserror::Error;

use super::IngestReport;
use crate::config::Config;
use crate::state::data::ProcessedImage;

/// Display name used when a URL has no usable last path segment
pub const REMOTE_NAME_PLACEHOLDER: &str = "image-from-url";

#[derive(Debug, Error)]
enum FetchError {
    #[error("not a valid URL: {0}")]
    Parse(String),
    #[error("relay request failed: {0}")]
    Relay(#[from] reqwest::Error),
    #[error("relay returned HTTP {0}")]
    Status(u16),
    #[error("response is not an image (content type {0})")]
    NotAnImage(String),
}

#[derive(Debug, Clone)]
pub struct UrlFetcher {
    http: reqwest::Client,
    relay_base: String,
}

impl UrlFetcher {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            relay_base: config.relay_base.clone(),
        }
    }

    /// Fetch every non-empty line of `input` independently and await the
    /// whole pass together.
    pub async fn fetch_list(self, input: String) -> IngestReport {
        let lines: Vec<&str> = url_lines(&input);

        let results = join_all(lines.iter().map(|line| self.fetch_one(line))).await;

        let mut report = IngestReport::default();
        for (line, result) in lines.into_iter().zip(results) {
            match result {
                Ok(image) => report.accepted.push(image),
                Err(error) => {
                    log::warn!("failed to ingest {}: {}", line, error);
                    report.failed.push(line.to_string());
                }
            }
        }
        report
    }

    async fn fetch_one(&self, target: &str) -> Result<ProcessedImage, FetchError> {
        let parsed = reqwest::Url::parse(target)
            .map_err(|error| FetchError::Parse(error.to_string()))?;

        // The relay percent-encodes nothing itself; the target travels as
        // an encoded query parameter.
        let response = self
            .http
            .get(&self.relay_base)
            .query(&[("url", parsed.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string())
            .unwrap_or_default();
        let Some(mime) = image_mime(&content_type) else {
            return Err(FetchError::NotAnImage(if content_type.is_empty() {
                "missing".to_string()
            } else {
                content_type
            }));
        };

        let bytes = response.bytes().await?;

        Ok(ProcessedImage::new(
            BASE64.encode(&bytes),
            mime,
            display_name(&parsed),
        ))
    }
}

/// Non-empty trimmed lines of the URL input
fn url_lines(input: &str) -> Vec<&str> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// The base media type, if it is an image; drops any parameters
fn image_mime(content_type: &str) -> Option<String> {
    let base = content_type.split(';').next()?.trim().to_ascii_lowercase();
    base.starts_with("image/").then_some(base)
}

/// Last path segment of the URL, query already excluded; placeholder when
/// the path ends in a slash or has no segments
fn display_name(url: &reqwest::Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_string())
        .unwrap_or_else(|| REMOTE_NAME_PLACEHOLDER.to_string())
}

/// Aggregate banner text for a pass with failed URLs
pub fn failure_banner(failed: &[String]) -> String {
    format!(
        "Couldn't fetch: {}. Some sites block downloads; try saving the image and uploading it as a file instead.",
        failed.join(", ")
    )
}

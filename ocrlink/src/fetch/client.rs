use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::config::FetchConfig;
use crate::error::{OcrLinkError, Result};

/// Name used when the URL path has no usable last segment.
const FALLBACK_FILE_NAME: &str = "image";

/// Payload of a successful download.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    /// Last path segment of the source URL.
    pub file_name: String,
    /// MIME type sniffed from the payload, when recognizable.
    pub mime_type: Option<&'static str>,
}

impl FetchedImage {
    /// Extension matching the sniffed image type, if the payload is an image.
    pub fn image_extension(&self) -> Option<&'static str> {
        infer::get(&self.bytes)
            .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
            .map(|kind| kind.extension())
    }
}

#[derive(Clone, Debug)]
pub struct ImageFetcher {
    client: Client,
    max_bytes: u64,
}

impl ImageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| OcrLinkError::Fetch(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_bytes: config.max_bytes,
        })
    }

    pub async fn fetch(&self, url_str: &str) -> Result<FetchedImage> {
        let url = Url::parse(url_str)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(OcrLinkError::Fetch(format!(
                "Unsupported URL scheme '{}'",
                url.scheme()
            )));
        }

        let file_name = file_name_from_url(&url);

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| OcrLinkError::Fetch(describe_transport_error(&url, &e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OcrLinkError::Fetch(format!(
                "GET {url} returned {status}"
            )));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_bytes {
                return Err(OcrLinkError::Fetch(format!(
                    "Image too large: {len} bytes (max {} bytes)",
                    self.max_bytes
                )));
            }
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| OcrLinkError::Fetch(describe_transport_error(&url, &e)))?
        {
            if (bytes.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(OcrLinkError::Fetch(format!(
                    "Image exceeds {} bytes",
                    self.max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        let mime_type = infer::get(&bytes).map(|kind| kind.mime_type());

        tracing::debug!(
            url = %url,
            size = bytes.len(),
            mime_type = mime_type.unwrap_or("unknown"),
            "Image downloaded"
        );

        Ok(FetchedImage {
            bytes,
            file_name,
            mime_type,
        })
    }
}

fn describe_transport_error(url: &Url, err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("GET {url} timed out")
    } else if err.is_connect() {
        format!("GET {url} could not connect: {err}")
    } else {
        format!("GET {url} failed: {err}")
    }
}

/// Last non-empty path segment of `url`, or `"image"`.
pub fn file_name_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

//! Blocking HTTP image fetcher.

use recall_core::error::FetchError;
use recall_core::host::ImageFetcher;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use std::time::Duration;

/// Fetches remote images with a single bounded attempt.
pub struct HttpImageFetcher {
    client: Option<Client>,
    user_agent: String,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Request(format!("HTTP client build failed: {e}")))?;
        Ok(Self {
            client: Some(client),
            user_agent: user_agent.into(),
        })
    }

    /// A fetcher that refuses every request.
    pub fn offline() -> Self {
        Self {
            client: None,
            user_agent: String::new(),
        }
    }

    pub fn is_offline(&self) -> bool {
        self.client.is_none()
    }
}

/// Protocol-relative URLs are fetched over https.
fn absolute_url(url: &str) -> String {
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

/// Missing content types are let through; some servers omit them.
fn is_image_content_type(value: Option<&str>) -> bool {
    match value {
        Some(value) => {
            let mime = value.split(';').next().unwrap_or("").trim();
            mime.to_ascii_lowercase().starts_with("image/")
                || mime.eq_ignore_ascii_case("application/octet-stream")
        }
        None => true,
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let client = self.client.as_ref().ok_or(FetchError::Offline)?;
        let url = absolute_url(url);

        let resp = client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "image/*")
            .send()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if !is_image_content_type(content_type.as_deref()) {
            return Err(FetchError::ContentType(content_type.unwrap_or_default()));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        tracing::debug!(%url, size = bytes.len(), "fetched image");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_fetcher_refuses() {
        let fetcher = HttpImageFetcher::offline();
        assert!(fetcher.is_offline());
        assert!(matches!(
            fetcher.fetch("https://example.com/a.png"),
            Err(FetchError::Offline)
        ));
    }

    #[test]
    fn protocol_relative_urls_use_https() {
        assert_eq!(absolute_url("//cdn.example.com/a.png"), "https://cdn.example.com/a.png");
        assert_eq!(absolute_url("http://x/a.png"), "http://x/a.png");
    }

    #[test]
    fn content_type_check() {
        assert!(is_image_content_type(Some("image/png")));
        assert!(is_image_content_type(Some("Image/JPEG; charset=binary")));
        assert!(is_image_content_type(None));
        assert!(!is_image_content_type(Some("text/html; charset=utf-8")));
    }
}

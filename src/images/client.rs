//! Attachment fetch client.

use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::debug;

use crate::error::{Error, FetchError, Result};

/// Default e-Gov law API (v2) endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://laws.e-gov.go.jp/api/2";

/// Everything except RFC 3986 unreserved characters.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of attachment bytes.
///
/// `revision_id` routes the request to one revision of the statute; `src` is
/// the figure reference exactly as written in the document.
pub trait AttachmentClient {
    fn fetch_attachment(
        &self,
        revision_id: &str,
        src: &str,
    ) -> std::result::Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP client for the `attachment` endpoint.
#[derive(Debug, Clone)]
pub struct HttpAttachmentClient {
    base_url: String,
    client: Client,
}

impl HttpAttachmentClient {
    /// Create a client for the given API base URL.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("cannot create HTTP client: {e}")))?;
        Ok(Self { base_url, client })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn attachment_url(&self, revision_id: &str, src: &str) -> String {
        format!(
            "{}/attachment/{}?src={}",
            self.base_url,
            utf8_percent_encode(revision_id, COMPONENT),
            utf8_percent_encode(src, COMPONENT)
        )
    }
}

impl AttachmentClient for HttpAttachmentClient {
    fn fetch_attachment(
        &self,
        revision_id: &str,
        src: &str,
    ) -> std::result::Result<Vec<u8>, FetchError> {
        let url = self.attachment_url(revision_id, src);
        debug!(%url, "fetching attachment");

        let network = |reason: String| FetchError::Network {
            src: src.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(src.to_string()));
        }
        if !status.is_success() {
            return Err(network(format!("server returned {status}")));
        }

        let body = response.bytes().map_err(|e| network(e.to_string()))?;
        if body.is_empty() {
            return Err(FetchError::EmptyResponse(src.to_string()));
        }
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_url_encodes_src() {
        let client = HttpAttachmentClient::new("https://example.test/api/2/", DEFAULT_TIMEOUT)
            .unwrap();
        assert_eq!(client.base_url(), "https://example.test/api/2");
        assert_eq!(
            client.attachment_url("322AC0000000049_20240401_505AC0000000017", "./pict/a b.pdf"),
            "https://example.test/api/2/attachment/322AC0000000049_20240401_505AC0000000017?src=.%2Fpict%2Fa%20b.pdf"
        );
    }
}

//! Image acquisition for the export pipeline.
//!
//! References come in two shapes from the upstream flow: remote URLs (the
//! generation service returns hosted image links) and base64 `data:` URIs
//! (user-uploaded cover photos). Anything else is rejected and the caller
//! degrades that page.

use crate::error::AssetError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Resolves image references to raw encoded bytes. Cheap to clone; all
/// clones share one HTTP client.
#[derive(Debug, Clone, Default)]
pub struct ImageFetcher {
    client: reqwest::Client,
}

impl ImageFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Fetches the encoded bytes behind an image reference.
    ///
    /// Errors from here never abort an export; the pipeline logs them and
    /// renders the affected page without its image.
    pub async fn fetch(&self, reference: &str) -> Result<Vec<u8>, AssetError> {
        if let Some(rest) = reference.strip_prefix("data:") {
            return decode_data_uri(rest);
        }
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return self.fetch_remote(reference).await;
        }
        Err(AssetError::UnsupportedScheme(reference.to_string()))
    }

    async fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let fetch_err = |message: String| AssetError::Fetch {
            url: url.to_string(),
            message,
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?
            .error_for_status()
            .map_err(|e| fetch_err(e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

fn decode_data_uri(rest: &str) -> Result<Vec<u8>, AssetError> {
    let (_media_type, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| AssetError::DataUri("missing base64 payload".to_string()))?;
    STANDARD
        .decode(payload.trim())
        .map_err(|e| AssetError::DataUri(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    #[tokio::test]
    async fn test_data_uri_decodes() {
        let fetcher = ImageFetcher::new();
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(b"png-bytes"));
        let bytes = fetcher.fetch(&uri).await.unwrap();
        assert_eq!(bytes, b"png-bytes");
    }

    #[tokio::test]
    async fn test_data_uri_without_payload_is_rejected() {
        let fetcher = ImageFetcher::new();
        let result = fetcher.fetch("data:image/png,rawdata").await;
        assert!(matches!(result, Err(AssetError::DataUri(_))));
    }

    #[tokio::test]
    async fn test_data_uri_with_bad_base64_is_rejected() {
        let fetcher = ImageFetcher::new();
        let result = fetcher.fetch("data:image/png;base64,!!!not-base64!!!").await;
        assert!(matches!(result, Err(AssetError::DataUri(_))));
    }

    #[tokio::test]
    async fn test_unknown_scheme_is_rejected() {
        let fetcher = ImageFetcher::new();
        let result = fetcher.fetch("bad-url").await;
        assert!(matches!(result, Err(AssetError::UnsupportedScheme(_))));
    }
}

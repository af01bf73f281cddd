//! Media searcher trait for resolving illustration queries.
//!
//! The generation stages leave `[MEDIA: description]` markers in the
//! document body; this trait abstracts the image-search provider used
//! to turn a description into a displayable asset with attribution.

use async_trait::async_trait;
use url::Url;

use crate::error::{AuthoringError, Result};
use crate::security::SecretString;

/// Requested image orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
    Squarish,
}

impl Orientation {
    /// Query-parameter form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Squarish => "squarish",
        }
    }
}

/// A resolved media asset with attribution.
#[derive(Debug, Clone)]
pub struct MediaAsset {
    /// Displayable image URL
    pub asset_url: String,

    /// Name to credit
    pub attribution_name: String,

    /// Link for the credit
    pub attribution_link: String,
}

impl MediaAsset {
    /// Create a new asset.
    pub fn new(
        asset_url: impl Into<String>,
        attribution_name: impl Into<String>,
        attribution_link: impl Into<String>,
    ) -> Self {
        Self {
            asset_url: asset_url.into(),
            attribution_name: attribution_name.into(),
            attribution_link: attribution_link.into(),
        }
    }
}

/// Image search trait.
///
/// `Ok(None)` means the provider answered but had nothing for the query;
/// `Err` means the call itself failed. The media resolver treats both as
/// a skip, but tests can tell them apart.
#[async_trait]
pub trait MediaSearcher: Send + Sync {
    /// Search for one asset matching the query.
    async fn search(&self, query: &str, orientation: Orientation) -> Result<Option<MediaAsset>>;
}

/// Mock media searcher for testing.
#[derive(Default)]
pub struct MockMediaSearcher {
    assets: std::sync::RwLock<std::collections::HashMap<String, MediaAsset>>,
    fail_queries: std::sync::RwLock<Vec<String>>,
    calls: std::sync::RwLock<Vec<String>>,
}

impl MockMediaSearcher {
    /// Create a new mock searcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset for a query.
    pub fn with_asset(self, query: &str, asset: MediaAsset) -> Self {
        self.assets
            .write()
            .unwrap()
            .insert(query.to_string(), asset);
        self
    }

    /// Mark a query as failing with a transport error.
    pub fn fail_query(self, query: &str) -> Self {
        self.fail_queries.write().unwrap().push(query.to_string());
        self
    }

    /// Queries searched so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl MediaSearcher for MockMediaSearcher {
    async fn search(&self, query: &str, _orientation: Orientation) -> Result<Option<MediaAsset>> {
        self.calls.write().unwrap().push(query.to_string());

        if self.fail_queries.read().unwrap().contains(&query.to_string()) {
            return Err(AuthoringError::Media(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "mock connection refused",
            ))));
        }

        Ok(self.assets.read().unwrap().get(query).cloned())
    }
}

/// Unsplash-backed media searcher.
///
/// Uses the `photos/random` endpoint and builds referral-tagged
/// attribution links.
pub struct UnsplashSearcher {
    access_key: SecretString,
    client: reqwest::Client,
    base_url: String,
    /// `utm_source` tag for attribution links.
    pub app_name: String,
    /// Per-request timeout.
    pub timeout: std::time::Duration,
}

impl UnsplashSearcher {
    /// Create a new Unsplash searcher.
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            access_key: SecretString::new(access_key),
            client: reqwest::Client::new(),
            base_url: "https://api.unsplash.com".to_string(),
            app_name: "draftmill".to_string(),
            timeout: std::time::Duration::from_secs(10),
        }
    }

    /// Set the application name used in attribution links.
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    /// Set a custom base URL (for tests or proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Only https URLs on an unsplash.com host are usable as assets.
    fn valid_asset_url(url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => {
                parsed.scheme() == "https"
                    && parsed
                        .host_str()
                        .map(|h| h == "unsplash.com" || h.ends_with(".unsplash.com"))
                        .unwrap_or(false)
            }
            Err(_) => false,
        }
    }
}

#[async_trait]
impl MediaSearcher for UnsplashSearcher {
    async fn search(&self, query: &str, orientation: Orientation) -> Result<Option<MediaAsset>> {
        #[derive(serde::Deserialize)]
        struct Photo {
            urls: PhotoUrls,
            user: PhotoUser,
        }

        #[derive(serde::Deserialize)]
        struct PhotoUrls {
            regular: String,
        }

        #[derive(serde::Deserialize)]
        struct PhotoUser {
            name: String,
            username: String,
        }

        let response = self
            .client
            .get(format!("{}/photos/random", self.base_url))
            .query(&[("query", query), ("orientation", orientation.as_str())])
            .header(
                "Authorization",
                format!("Client-ID {}", self.access_key.expose()),
            )
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AuthoringError::Media(Box::new(e)))?;

        // 404 = nothing matched the query; every other failure is an error
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AuthoringError::Media(Box::new(std::io::Error::other(
                format!("unsplash API error: {}", response.status()),
            ))));
        }

        // The random endpoint returns an object, or an array when `count` is set
        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AuthoringError::Media(Box::new(e)))?;
        let photo_value = match value {
            serde_json::Value::Array(mut items) if !items.is_empty() => items.remove(0),
            other => other,
        };
        let photo: Photo = serde_json::from_value(photo_value)
            .map_err(|e| AuthoringError::Media(Box::new(e)))?;

        if !Self::valid_asset_url(&photo.urls.regular) {
            return Err(AuthoringError::Media(Box::new(std::io::Error::other(
                "unsplash returned an asset URL outside unsplash.com",
            ))));
        }

        let attribution_link = format!(
            "https://unsplash.com/@{}?utm_source={}&utm_medium=referral",
            photo.user.username, self.app_name
        );

        Ok(Some(MediaAsset::new(
            photo.urls.regular,
            photo.user.name,
            attribution_link,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_searcher_returns_configured_asset() {
        let searcher = MockMediaSearcher::new().with_asset(
            "standing desk",
            MediaAsset::new("https://images.unsplash.com/a.jpg", "Ana", "https://unsplash.com/@ana"),
        );

        let asset = searcher
            .search("standing desk", Orientation::Landscape)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(asset.attribution_name, "Ana");

        let missing = searcher
            .search("unknown", Orientation::Landscape)
            .await
            .unwrap();
        assert!(missing.is_none());

        assert_eq!(searcher.calls(), vec!["standing desk", "unknown"]);
    }

    #[tokio::test]
    async fn test_mock_searcher_fail_query() {
        let searcher = MockMediaSearcher::new().fail_query("flaky");
        let result = searcher.search("flaky", Orientation::Landscape).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_valid_asset_url() {
        assert!(UnsplashSearcher::valid_asset_url(
            "https://images.unsplash.com/photo-123"
        ));
        assert!(!UnsplashSearcher::valid_asset_url(
            "http://images.unsplash.com/photo-123"
        ));
        assert!(!UnsplashSearcher::valid_asset_url(
            "https://example.com/photo-123"
        ));
        assert!(!UnsplashSearcher::valid_asset_url("not a url"));
    }
}

//! Publishing host trait.
//!
//! The host is where finished documents land as human-reviewable drafts,
//! and where the corpus snapshot of previously produced articles comes
//! from. Submission is a single attempt with no idempotency guarantee:
//! calling `insert_draft` twice creates two drafts.

use async_trait::async_trait;

use crate::error::{HostError, HostResult};
use crate::security::HostCredentials;
use crate::types::article::ExistingArticle;

/// A draft ready for submission.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DraftSubmission {
    /// Article title
    pub title: String,

    /// Fully assembled HTML body
    pub html_body: String,

    /// Labels/tags
    pub labels: Vec<String>,
}

/// Receipt for a submitted draft.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DraftReceipt {
    /// Host-assigned identifier
    pub id: String,

    /// URL of the draft on the host
    pub url: Option<String>,
}

/// Publishing host trait.
#[async_trait]
pub trait PublishHost: Send + Sync {
    /// List previously produced articles (drafts and published).
    ///
    /// Callers treat failures as an empty snapshot; implementations
    /// should still return the real error so it can be logged.
    async fn list_articles(&self) -> HostResult<Vec<ExistingArticle>>;

    /// Submit a draft. Single attempt, never auto-publishes.
    async fn insert_draft(&self, submission: &DraftSubmission) -> HostResult<DraftReceipt>;
}

/// Blogger v3 publishing host.
///
/// Token acquisition/refresh is the caller's problem; this host takes a
/// ready access token.
pub struct BloggerHost {
    credentials: HostCredentials,
    client: reqwest::Client,
    base_url: String,
    /// Page size for the corpus listing.
    pub list_max_results: usize,
    /// Per-request timeout.
    pub timeout: std::time::Duration,
}

impl BloggerHost {
    /// Create a new Blogger host.
    pub fn new(credentials: HostCredentials) -> Self {
        Self {
            credentials,
            client: reqwest::Client::new(),
            base_url: "https://www.googleapis.com/blogger/v3".to_string(),
            list_max_results: 100,
            timeout: std::time::Duration::from_secs(30),
        }
    }

    /// Set a custom base URL (for tests or proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.credentials.access_token.expose())
    }
}

#[derive(serde::Deserialize)]
struct PostList {
    #[serde(default)]
    items: Vec<PostItem>,
}

#[derive(serde::Deserialize)]
struct PostItem {
    id: String,
    title: String,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(serde::Deserialize)]
struct InsertedPost {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

#[async_trait]
impl PublishHost for BloggerHost {
    async fn list_articles(&self) -> HostResult<Vec<ExistingArticle>> {
        let response = self
            .client
            .get(format!(
                "{}/blogs/{}/posts",
                self.base_url, self.credentials.blog_id
            ))
            .query(&[
                ("maxResults", self.list_max_results.to_string()),
                ("fetchBodies", "false".to_string()),
                ("status", "LIVE".to_string()),
                ("status", "DRAFT".to_string()),
            ])
            .header("Authorization", self.bearer())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| HostError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(HostError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let list: PostList = response
            .json()
            .await
            .map_err(|e| HostError::Malformed(e.to_string()))?;

        Ok(list
            .items
            .into_iter()
            .map(|item| {
                let published = item.status.as_deref().map(|s| s == "LIVE").unwrap_or(true);
                let mut article = ExistingArticle::new(item.id, item.title)
                    .with_labels(item.labels)
                    .with_published(published);
                if let Some(url) = item.url {
                    article = article.with_url(url);
                }
                article
            })
            .collect())
    }

    async fn insert_draft(&self, submission: &DraftSubmission) -> HostResult<DraftReceipt> {
        let body = serde_json::json!({
            "title": submission.title,
            "content": submission.html_body,
            "labels": submission.labels,
        });

        let response = self
            .client
            .post(format!(
                "{}/blogs/{}/posts",
                self.base_url, self.credentials.blog_id
            ))
            .query(&[("isDraft", "true")])
            .header("Authorization", self.bearer())
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| HostError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(HostError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let inserted: InsertedPost = response
            .json()
            .await
            .map_err(|e| HostError::Malformed(e.to_string()))?;

        Ok(DraftReceipt {
            id: inserted.id,
            url: inserted.url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blogger_host_builder() {
        let host = BloggerHost::new(HostCredentials::new("42", "token"))
            .with_base_url("http://localhost:9999");
        assert_eq!(host.base_url, "http://localhost:9999");
        assert_eq!(host.list_max_results, 100);
    }

    #[test]
    fn test_post_list_parsing() {
        let json = r#"{
            "items": [
                {"id": "1", "title": "A", "labels": ["Finance"], "url": "https://b.example/a", "status": "LIVE"},
                {"id": "2", "title": "B"}
            ]
        }"#;
        let list: PostList = serde_json::from_str(json).unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].labels, vec!["Finance"]);
        assert!(list.items[1].labels.is_empty());
    }
}

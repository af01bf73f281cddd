//! Topic and corpus article types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A chosen subject for one run.
///
/// Immutable once selected; every pipeline stage reads it, none mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// Working title of the subject
    pub title: String,

    /// Category from the run's category pool
    pub category: String,

    /// Supporting keywords, most important first
    pub keywords: Vec<String>,
}

impl Topic {
    /// Create a new topic.
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            keywords: Vec::new(),
        }
    }

    /// Set the supporting keywords.
    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keywords = keywords.into_iter().map(|k| k.into()).collect();
        self
    }

    /// Best keyword to fall back on when a media description is unusable.
    pub fn fallback_keyword(&self) -> &str {
        self.keywords
            .first()
            .map(|k| k.as_str())
            .unwrap_or(&self.category)
    }
}

/// Metadata of a previously produced article, as loaded from the host.
///
/// A read-only snapshot entry; used for duplicate checks and
/// related-content lookup only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingArticle {
    /// Host-assigned identifier
    pub id: String,

    /// Article title
    pub title: String,

    /// Labels/tags
    pub labels: BTreeSet<String>,

    /// Whether the article is live (false = still a draft)
    pub published: bool,

    /// Public URL, when the host provides one
    pub url: Option<String>,
}

impl ExistingArticle {
    /// Create a new article entry.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            labels: BTreeSet::new(),
            published: false,
            url: None,
        }
    }

    /// Set the labels.
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.labels = labels.into_iter().map(|l| l.into()).collect();
        self
    }

    /// Set the published flag.
    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Set the public URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_keyword() {
        let with_keywords = Topic::new("Standing desks", "Wellness").with_keywords(["desk", "posture"]);
        assert_eq!(with_keywords.fallback_keyword(), "desk");

        let bare = Topic::new("Standing desks", "Wellness");
        assert_eq!(bare.fallback_keyword(), "Wellness");
    }

    #[test]
    fn test_existing_article_builder() {
        let article = ExistingArticle::new("7", "VPNs compared")
            .with_labels(["Tech Tips", "Reviews"])
            .with_published(true)
            .with_url("https://blog.example/vpns");

        assert!(article.labels.contains("Reviews"));
        assert!(article.published);
    }
}

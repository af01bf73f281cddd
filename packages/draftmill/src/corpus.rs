//! Corpus index - snapshot of previously produced articles.
//!
//! Loaded once per run from the publishing host (best-effort: a host
//! failure yields an empty snapshot, never an error) and used for two
//! things only: rejecting near-duplicate topics and ranking related
//! articles for cross-linking. Nothing here mutates the snapshot.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::traits::host::PublishHost;
use crate::types::article::ExistingArticle;
use crate::types::config::RunConfig;

/// Words carrying no topical signal, stripped during title normalization.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "what", "which", "one", "ones", "your", "you",
    "yours", "how", "why", "when", "who", "are", "was", "were", "not", "but", "its", "has", "have",
    "had", "can", "will", "just", "really", "actually", "about", "from", "they", "them", "their",
    "all", "any", "some", "most", "more", "out", "get", "got", "into", "than", "then", "there",
    "here", "also", "does", "did", "should", "would", "could",
];

/// Normalize a title to its keyword set: lowercase, alphanumeric word
/// split, tokens longer than 2 characters, stop words removed.
pub fn title_keywords(title: &str) -> BTreeSet<String> {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() > 2)
        .filter(|token| !STOP_WORDS.contains(token))
        .map(|token| token.to_string())
        .collect()
}

/// Keyword overlap ratio: `|A ∩ B| / max(|A|, |B|)`.
///
/// Either side empty means no signal, reported as 0.0 rather than a
/// divide-by-zero.
pub fn keyword_overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let denom = a.len().max(b.len());
    if denom == 0 {
        return 0.0;
    }
    let shared = a.intersection(b).count();
    shared as f64 / denom as f64
}

/// Read-only snapshot of the host's articles for one run.
pub struct CorpusIndex {
    articles: Vec<ExistingArticle>,
    duplicate_threshold: f64,
}

impl CorpusIndex {
    /// Build an index from a known set of articles.
    pub fn from_articles(articles: Vec<ExistingArticle>, duplicate_threshold: f64) -> Self {
        Self {
            articles,
            duplicate_threshold,
        }
    }

    /// An empty index (used when the host is unreachable).
    pub fn empty(duplicate_threshold: f64) -> Self {
        Self::from_articles(Vec::new(), duplicate_threshold)
    }

    /// Load the snapshot from the host.
    ///
    /// Best-effort: a transport failure is logged and degrades to an
    /// empty snapshot, because a run without dedup beats no run at all.
    pub async fn load<H: PublishHost>(host: &H, config: &RunConfig) -> Self {
        match host.list_articles().await {
            Ok(articles) => {
                debug!(count = articles.len(), "loaded corpus snapshot");
                Self::from_articles(articles, config.duplicate_threshold)
            }
            Err(e) => {
                warn!(error = %e, "corpus load failed; continuing with empty snapshot");
                Self::empty(config.duplicate_threshold)
            }
        }
    }

    /// All articles in snapshot order (host returns newest first).
    pub fn articles(&self) -> &[ExistingArticle] {
        &self.articles
    }

    /// The `n` most recent titles.
    pub fn recent_titles(&self, n: usize) -> Vec<&str> {
        self.articles
            .iter()
            .take(n)
            .map(|a| a.title.as_str())
            .collect()
    }

    /// How many articles carry each of the given category labels.
    pub fn category_counts<'a>(&self, categories: &[&'a str]) -> HashMap<&'a str, usize> {
        categories
            .iter()
            .map(|&category| {
                let count = self
                    .articles
                    .iter()
                    .filter(|a| a.labels.contains(category))
                    .count();
                (category, count)
            })
            .collect()
    }

    /// Whether a candidate title duplicates anything in the snapshot.
    ///
    /// Exact-match fast path first (lowercased raw titles), then keyword
    /// overlap against the configured threshold. Titles that normalize to
    /// an empty keyword set are never overlap-duplicates.
    pub fn is_duplicate(&self, candidate_title: &str) -> bool {
        let candidate_raw = candidate_title.trim().to_lowercase();
        let candidate_keywords = title_keywords(candidate_title);

        for article in &self.articles {
            if article.title.trim().to_lowercase() == candidate_raw {
                return true;
            }

            let existing_keywords = title_keywords(&article.title);
            if candidate_keywords.is_empty() || existing_keywords.is_empty() {
                continue;
            }
            let overlap = keyword_overlap(&candidate_keywords, &existing_keywords);
            if overlap >= self.duplicate_threshold {
                debug!(
                    candidate = %candidate_title,
                    existing = %article.title,
                    overlap,
                    "duplicate topic"
                );
                return true;
            }
        }

        false
    }

    /// Convenience: duplicate check against a single title (tests, selector).
    pub fn title_is_duplicate_of(
        candidate: &str,
        existing: &str,
        threshold: f64,
    ) -> bool {
        Self::from_articles(vec![ExistingArticle::new("0", existing)], threshold)
            .is_duplicate(candidate)
    }

    /// Related articles for cross-linking, best first.
    ///
    /// Score = `2 × |label ∩| + |keyword ∩|`. Zero-scoring articles are
    /// excluded entirely rather than forcing unrelated links. Ties keep
    /// snapshot order.
    pub fn related(
        &self,
        title: &str,
        labels: &BTreeSet<String>,
        max_count: usize,
    ) -> Vec<&ExistingArticle> {
        let keywords = title_keywords(title);

        let mut scored: Vec<(usize, &ExistingArticle)> = self
            .articles
            .iter()
            .filter_map(|article| {
                let label_shared = article.labels.intersection(labels).count();
                let keyword_shared = title_keywords(&article.title)
                    .intersection(&keywords)
                    .count();
                let score = 2 * label_shared + keyword_shared;
                (score > 0).then_some((score, article))
            })
            .collect();

        // Stable sort keeps original order on ties
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.truncate(max_count);
        scored.into_iter().map(|(_, article)| article).collect()
    }
}

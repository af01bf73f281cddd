//! Final article assembly and submission.
//!
//! Wraps the resolved body in the blog's style shell, appends a
//! related-articles block and (in money mode) a disclosure, picks
//! labels, and hands the result to the publish host. Submissions always
//! go up as drafts; a person reviews before anything goes live.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::corpus::CorpusIndex;
use crate::error::Result;
use crate::traits::host::{DraftReceipt, DraftSubmission, PublishHost};
use crate::types::article::Topic;
use crate::types::config::RunMode;
use crate::types::document::Document;

/// Secondary labels sampled per article, on top of the category.
const TAGS_PER_ARTICLE: usize = 2;

const APPROVAL_TAGS: &[&str] = &["Guides", "How-To", "Research Notes"];
const MONEY_TAGS: &[&str] = &["Reviews", "Comparisons", "Tools"];

/// Inline style shell every article body is wrapped in.
const POST_CSS: &str = "\
<style>
    .post-body {
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
        line-height: 1.75;
        color: #1f2937;
        font-size: 1.125rem;
    }
    .post-body h2 {
        font-size: 1.75rem;
        font-weight: 700;
        color: #111827;
        margin: 3rem 0 1.25rem;
        letter-spacing: -0.025em;
    }
    .post-body h3 {
        font-size: 1.375rem;
        font-weight: 600;
        color: #374151;
        margin: 2rem 0 1rem;
    }
    .post-body p {
        margin-bottom: 1.5rem;
    }
    .post-body ul, .post-body ol {
        margin: 1.5rem 0;
        padding-left: 1.5rem;
    }
    .post-body li {
        margin-bottom: 0.75rem;
    }
    .post-body blockquote {
        border-left: 4px solid #3b82f6;
        padding: 1rem 1.5rem;
        background: #f8fafc;
        color: #475569;
        font-style: italic;
        margin: 2rem 0;
        border-radius: 0 8px 8px 0;
    }
    .related-posts {
        margin-top: 3rem;
        padding: 1.25rem;
        background: #f8fafc;
        border-radius: 8px;
        font-size: 1rem;
    }
    .disclaimer {
        background: #fef2f2;
        padding: 1.25rem;
        border-radius: 8px;
        font-size: 0.875rem;
        color: #991b1b;
        margin-top: 2rem;
        border: 1px solid #fecaca;
    }
</style>";

/// Disclosure appended in money mode. Worded for a research blog: the
/// writer compares and summarizes, they do not claim to have used every
/// product.
const MONEY_DISCLOSURE: &str = "\
<div class=\"disclaimer\">
    <strong>Disclosure:</strong> This article summarizes research and publicly available
    information; I haven't personally used every product mentioned. Some links may be
    affiliate links, which support this site at no extra cost to you.
</div>";

/// Assembles a [`DraftSubmission`] from pipeline output.
pub struct ArticleAssembler {
    mode: RunMode,
    rng: StdRng,
}

impl ArticleAssembler {
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(mode: RunMode, seed: u64) -> Self {
        Self {
            mode,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn tag_pool(&self) -> &'static [&'static str] {
        match self.mode {
            RunMode::Approval => APPROVAL_TAGS,
            RunMode::Money => MONEY_TAGS,
        }
    }

    /// Assemble the final submission: shell, related links, disclosure,
    /// labels.
    pub fn assemble(
        &mut self,
        document: &Document,
        topic: &Topic,
        corpus: &CorpusIndex,
        max_related: usize,
    ) -> DraftSubmission {
        let mut inner = document.body.clone();

        let related = related_block(corpus, &document.title, document, max_related);
        if let Some(block) = related {
            inner.push_str(&block);
        }

        if self.mode == RunMode::Money {
            inner.push_str(MONEY_DISCLOSURE);
        }

        let html_body = format!("{POST_CSS}<div class=\"post-body\">{inner}</div>");

        let mut labels = vec![topic.category.clone()];
        let mut pool: Vec<&str> = self
            .tag_pool()
            .iter()
            .copied()
            .filter(|tag| *tag != topic.category)
            .collect();
        pool.shuffle(&mut self.rng);
        for tag in pool.into_iter().take(TAGS_PER_ARTICLE) {
            labels.push(tag.to_string());
        }

        debug!(labels = ?labels, "assembled submission");
        DraftSubmission {
            title: document.title.clone(),
            html_body,
            labels,
        }
    }
}

/// Related-articles block, or `None` when nothing in the corpus scores.
///
/// Only articles with a known URL get a link; the rest appear as plain
/// titles.
fn related_block(
    corpus: &CorpusIndex,
    title: &str,
    document: &Document,
    max_related: usize,
) -> Option<String> {
    let related = corpus.related(title, &document.labels, max_related);
    if related.is_empty() {
        return None;
    }

    let mut block = String::from(
        "<div class=\"related-posts\"><strong>Related reading:</strong><ul>",
    );
    for article in &related {
        match &article.url {
            Some(url) => {
                block.push_str(&format!(
                    "<li><a href=\"{url}\">{}</a></li>",
                    article.title
                ));
            }
            None => {
                block.push_str(&format!("<li>{}</li>", article.title));
            }
        }
    }
    block.push_str("</ul></div>");
    Some(block)
}

/// Submit the assembled article as a draft.
///
/// Single attempt; a host failure surfaces to the caller instead of
/// being retried, because a duplicate draft is worse than a missed run.
pub async fn publish<H: PublishHost>(
    host: &H,
    submission: &DraftSubmission,
) -> Result<DraftReceipt> {
    let receipt = host.insert_draft(submission).await?;
    info!(id = %receipt.id, "draft submitted");
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockHost;
    use crate::types::article::ExistingArticle;

    fn document() -> Document {
        Document::new(
            "Budgeting Apps: Which Ones People Actually Keep Using",
            "<h2>Findings</h2><p>body</p>",
        )
        .with_label("Finance")
    }

    fn topic() -> Topic {
        Topic::new(
            "Budgeting Apps: Which Ones People Actually Keep Using",
            "Finance",
        )
    }

    #[test]
    fn test_assemble_wraps_shell_and_labels() {
        let corpus = CorpusIndex::empty(0.70);
        let mut assembler = ArticleAssembler::with_seed(RunMode::Money, 1);

        let submission = assembler.assemble(&document(), &topic(), &corpus, 3);

        assert!(submission.html_body.starts_with("<style>"));
        assert!(submission.html_body.contains("<div class=\"post-body\">"));
        assert!(submission.html_body.contains("<h2>Findings</h2>"));
        assert_eq!(submission.labels.len(), 1 + TAGS_PER_ARTICLE);
        assert_eq!(submission.labels[0], "Finance");
        for tag in &submission.labels[1..] {
            assert!(MONEY_TAGS.contains(&tag.as_str()));
        }
    }

    #[test]
    fn test_money_mode_appends_disclosure() {
        let corpus = CorpusIndex::empty(0.70);
        let mut assembler = ArticleAssembler::with_seed(RunMode::Money, 1);

        let submission = assembler.assemble(&document(), &topic(), &corpus, 3);
        assert!(submission.html_body.contains("Disclosure:"));
    }

    #[test]
    fn test_approval_mode_has_no_disclosure() {
        let corpus = CorpusIndex::empty(0.70);
        let mut assembler = ArticleAssembler::with_seed(RunMode::Approval, 1);

        let submission = assembler.assemble(&document(), &topic(), &corpus, 3);
        assert!(!submission.html_body.contains("Disclosure:"));
        for tag in &submission.labels[1..] {
            assert!(APPROVAL_TAGS.contains(&tag.as_str()));
        }
    }

    #[test]
    fn test_related_block_links_only_known_urls() {
        let corpus = CorpusIndex::from_articles(
            vec![
                ExistingArticle::new("1", "Budgeting Spreadsheets People Swear By")
                    .with_labels(["Finance"])
                    .with_url("https://blog.example/budgeting-spreadsheets"),
                ExistingArticle::new("2", "Cashback Apps Worth the Signup")
                    .with_labels(["Finance"]),
            ],
            0.70,
        );
        let mut assembler = ArticleAssembler::with_seed(RunMode::Money, 1);

        let submission = assembler.assemble(&document(), &topic(), &corpus, 3);

        assert!(submission.html_body.contains("Related reading:"));
        assert!(submission
            .html_body
            .contains("<a href=\"https://blog.example/budgeting-spreadsheets\">"));
        assert!(submission
            .html_body
            .contains("<li>Cashback Apps Worth the Signup</li>"));
    }

    #[test]
    fn test_no_related_block_when_nothing_scores() {
        let corpus = CorpusIndex::from_articles(
            vec![ExistingArticle::new("1", "Sourdough Starters for Beginners")
                .with_labels(["Baking"])],
            0.70,
        );
        let mut assembler = ArticleAssembler::with_seed(RunMode::Approval, 1);

        let submission = assembler.assemble(&document(), &topic(), &corpus, 3);
        assert!(!submission.html_body.contains("Related reading:"));
    }

    #[test]
    fn test_category_never_doubled_in_labels() {
        let corpus = CorpusIndex::empty(0.70);
        // "Reviews" is both a plausible category and a money tag
        let topic = Topic::new("Email Tools Compared", "Reviews");
        let document = Document::new("Email Tools Compared", "<p>body</p>");

        for seed in 0..20 {
            let mut assembler = ArticleAssembler::with_seed(RunMode::Money, seed);
            let submission = assembler.assemble(&document, &topic, &corpus, 3);
            let unique: std::collections::BTreeSet<_> = submission.labels.iter().collect();
            assert_eq!(unique.len(), submission.labels.len());
        }
    }

    #[tokio::test]
    async fn test_publish_returns_receipt() {
        let host = MockHost::new();
        let submission = DraftSubmission {
            title: "T".into(),
            html_body: "<p>b</p>".into(),
            labels: vec!["Finance".into()],
        };

        let receipt = publish(&host, &submission).await.unwrap();
        assert!(!receipt.id.is_empty());
        assert_eq!(host.inserted().len(), 1);
    }

    #[tokio::test]
    async fn test_publish_surfaces_host_failure() {
        let host = MockHost::new().fail_insert();
        let submission = DraftSubmission {
            title: "T".into(),
            html_body: "<p>b</p>".into(),
            labels: vec![],
        };

        assert!(publish(&host, &submission).await.is_err());
    }
}

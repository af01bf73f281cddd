//! Shared test doubles.
//!
//! Hand-written mocks rather than a mocking framework: the traits are
//! small, and scripted queues make multi-stage pipeline tests read as a
//! transcript of the run.

use std::collections::VecDeque;
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;

use crate::error::{AuthoringError, HostError, HostResult, Result};
use crate::traits::generator::{Effort, GenerateRequest, ModelReply, TextModel};
use crate::traits::host::{DraftReceipt, DraftSubmission, PublishHost};
use crate::types::article::ExistingArticle;

/// One scripted model turn.
enum MockReply {
    Text(String),
    Failure(String),
}

/// What the mock observed about one `generate` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub conversation_len: usize,
    pub effort: Effort,
    pub had_schema: bool,
    pub last_user: String,
}

/// Scripted [`TextModel`].
///
/// Replies are consumed in order; an exhausted queue echoes the last
/// user turn so unscripted calls fail loudly in assertions rather than
/// panicking mid-run.
#[derive(Default)]
pub struct MockModel {
    replies: Mutex<VecDeque<MockReply>>,
    calls: RwLock<Vec<RecordedCall>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Text(text.into()));
        self
    }

    /// Queue a call failure.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Failure(message.into()));
        self
    }

    /// Calls observed so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl TextModel for MockModel {
    async fn generate(&self, request: &GenerateRequest) -> Result<ModelReply> {
        let last_user = request.last_user_content().unwrap_or_default().to_string();
        self.calls.write().unwrap().push(RecordedCall {
            conversation_len: request.conversation.len(),
            effort: request.effort,
            had_schema: request.schema.is_some(),
            last_user: last_user.clone(),
        });

        match self.replies.lock().unwrap().pop_front() {
            Some(MockReply::Text(text)) => Ok(ModelReply::from_text(text)),
            Some(MockReply::Failure(message)) => Err(AuthoringError::model(
                std::io::Error::other(message),
            )),
            None => Ok(ModelReply::from_text(format!("echo: {last_user}"))),
        }
    }
}

/// In-memory [`PublishHost`].
#[derive(Default)]
pub struct MockHost {
    articles: RwLock<Vec<ExistingArticle>>,
    inserted: RwLock<Vec<DraftSubmission>>,
    fail_list: RwLock<bool>,
    fail_insert: RwLock<bool>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the corpus listing with an article.
    pub fn with_article(self, article: ExistingArticle) -> Self {
        self.articles.write().unwrap().push(article);
        self
    }

    /// Make `list_articles` fail.
    pub fn fail_list(self) -> Self {
        *self.fail_list.write().unwrap() = true;
        self
    }

    /// Make `insert_draft` fail.
    pub fn fail_insert(self) -> Self {
        *self.fail_insert.write().unwrap() = true;
        self
    }

    /// Submissions accepted so far.
    pub fn inserted(&self) -> Vec<DraftSubmission> {
        self.inserted.read().unwrap().clone()
    }
}

#[async_trait]
impl PublishHost for MockHost {
    async fn list_articles(&self) -> HostResult<Vec<ExistingArticle>> {
        if *self.fail_list.read().unwrap() {
            return Err(HostError::Rejected {
                status: 503,
                message: "mock list failure".into(),
            });
        }
        Ok(self.articles.read().unwrap().clone())
    }

    async fn insert_draft(&self, submission: &DraftSubmission) -> HostResult<DraftReceipt> {
        if *self.fail_insert.read().unwrap() {
            return Err(HostError::Rejected {
                status: 500,
                message: "mock insert failure".into(),
            });
        }
        let mut inserted = self.inserted.write().unwrap();
        inserted.push(submission.clone());
        Ok(DraftReceipt {
            id: format!("draft-{}", inserted.len()),
            url: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::generator::Turn;

    #[tokio::test]
    async fn test_mock_model_consumes_replies_in_order() {
        let model = MockModel::new().with_reply("first").with_reply("second");
        let request = GenerateRequest::new("sys").turn(Turn::user("hello"));

        assert_eq!(model.generate(&request).await.unwrap().text, "first");
        assert_eq!(model.generate(&request).await.unwrap().text, "second");
        assert!(model
            .generate(&request)
            .await
            .unwrap()
            .text
            .starts_with("echo:"));
    }

    #[tokio::test]
    async fn test_mock_model_records_calls() {
        let model = MockModel::new().with_reply("ok");
        let request = GenerateRequest::new("sys")
            .turn(Turn::user("question"))
            .effort(Effort::Max)
            .with_schema(serde_json::json!({"type": "object"}));

        model.generate(&request).await.unwrap();

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].effort, Effort::Max);
        assert!(calls[0].had_schema);
        assert_eq!(calls[0].last_user, "question");
    }

    #[tokio::test]
    async fn test_mock_model_failure() {
        let model = MockModel::new().with_failure("down");
        let request = GenerateRequest::new("sys").turn(Turn::user("hi"));
        assert!(model.generate(&request).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_host_tracks_inserts() {
        let host = MockHost::new();
        let submission = DraftSubmission {
            title: "T".into(),
            html_body: "<p>b</p>".into(),
            labels: vec![],
        };

        let first = host.insert_draft(&submission).await.unwrap();
        let second = host.insert_draft(&submission).await.unwrap();

        assert_eq!(first.id, "draft-1");
        assert_eq!(second.id, "draft-2");
        assert_eq!(host.inserted().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_host_failures() {
        let host = MockHost::new().fail_list();
        assert!(host.list_articles().await.is_err());

        let host = MockHost::new().fail_insert();
        let submission = DraftSubmission {
            title: "T".into(),
            html_body: String::new(),
            labels: vec![],
        };
        assert!(host.insert_draft(&submission).await.is_err());
    }
}

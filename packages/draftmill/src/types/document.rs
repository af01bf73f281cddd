//! The accumulating work product of the pipeline.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// An article document. Each pipeline stage returns a new one built
/// from the previous body plus a transformation instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Article title
    pub title: String,

    /// HTML body, possibly still carrying `[MEDIA: ...]` markers
    pub body: String,

    /// Labels assigned so far
    pub labels: BTreeSet<String>,
}

impl Document {
    /// Create a new document.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            labels: BTreeSet::new(),
        }
    }

    /// Add a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }

    /// Return a copy with the body replaced.
    pub fn with_body(&self, body: impl Into<String>) -> Self {
        Self {
            title: self.title.clone(),
            body: body.into(),
            labels: self.labels.clone(),
        }
    }

    /// Body length in characters (not bytes).
    pub fn body_chars(&self) -> usize {
        self.body.chars().count()
    }
}

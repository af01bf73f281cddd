//! Staged Article Authoring Library
//!
//! A library for producing human-reviewable blog drafts with a
//! generative model: pick a non-duplicate topic, vary the writing voice,
//! run a plan/draft/critique/style pipeline, resolve media markers with
//! attribution, and submit the result to a publish host as a draft.
//!
//! # Design Philosophy
//!
//! **"Degrade, don't abort"**
//!
//! - Only the plan and draft stages can fail a run
//! - Improvement stages keep the previous text when they can't improve it
//! - Media and dedup are best-effort; an unillustrated, unchecked run
//!   still beats no run
//! - Everything lands as a draft; a person decides what goes live
//!
//! # Usage
//!
//! ```rust,ignore
//! use draftmill::run::ArticleRun;
//! use draftmill::testing::{MockHost, MockModel};
//! use draftmill::traits::media::MockMediaSearcher;
//! use draftmill::types::config::{RunConfig, RunMode};
//!
//! let model = MockModel::new();
//! let searcher = MockMediaSearcher::new();
//! let host = MockHost::new();
//! let config = RunConfig::default().with_mode(RunMode::Approval);
//!
//! let report = ArticleRun::new(&model, Some(&searcher), &host, config)
//!     .execute()
//!     .await?;
//! println!("submitted {}", report.receipt.id);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (TextModel, MediaSearcher, PublishHost)
//! - [`types`] - Data types (Topic, Plan, Document, RunConfig)
//! - [`pipeline`] - The four-stage authoring pipeline
//! - [`corpus`] - Existing-article snapshot, dedup, related scoring
//! - [`selector`] - Topic selection with fallback table
//! - [`variation`] - Per-run persona/format/tone/quirk selection
//! - [`media`] - `[MEDIA: ...]` marker resolution
//! - [`publish`] - Final assembly and draft submission
//! - [`run`] - End-to-end orchestration
//! - [`security`] - Credential handling
//! - [`testing`] - Mock implementations for testing

pub mod corpus;
pub mod error;
pub mod media;
pub mod pipeline;
pub mod publish;
pub mod run;
pub mod runlog;
pub mod sanitize;
pub mod security;
pub mod selector;
pub mod testing;
pub mod traits;
pub mod types;
pub mod variation;

#[cfg(feature = "anthropic")]
pub mod ai;

// Re-export core types at crate root
pub use error::{AuthoringError, HostError};
pub use traits::{
    generator::{Effort, GenerateRequest, ModelReply, TextModel, Turn},
    host::{BloggerHost, DraftReceipt, DraftSubmission, PublishHost},
    media::{MediaAsset, MediaSearcher, Orientation, UnsplashSearcher},
};
pub use types::{
    article::{ExistingArticle, Topic},
    config::{RunConfig, RunMode},
    document::Document,
    plan::{Plan, PlanSection},
    variation::{StyleChoice, VariationProfile},
};

pub use corpus::CorpusIndex;
pub use pipeline::{ArticlePipeline, Outcome, PipelineOutput};
pub use run::{ArticleRun, RunReport};
pub use security::{HostCredentials, SecretString};

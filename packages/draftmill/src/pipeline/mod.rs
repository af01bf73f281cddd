//! The staged authoring pipeline.
//!
//! Four stages over one growing conversation: plan, draft, critique
//! plus revision, then a stylistic pass in a fresh context. The first
//! two stages are load-bearing and abort the run on failure; the last
//! two improve the draft when they can and keep the previous text when
//! they can't. A short or failed improvement never loses work already
//! done.

pub mod parse;
pub mod prompts;

use tracing::{debug, info, warn};

use crate::error::{AuthoringError, Result};
use crate::pipeline::parse::{extract_json, ParseAttempt};
use crate::pipeline::prompts::{
    build_system_prompt, draft_prompt, plan_prompt, style_prompt, CRITIQUE_PROMPT,
    PLAN_RELAXED_SUFFIX, REVISE_PROMPT,
};
use crate::sanitize::sanitize_html;
use crate::traits::generator::{Effort, GenerateRequest, TextModel, Turn};
use crate::types::article::Topic;
use crate::types::config::RunConfig;
use crate::types::document::Document;
use crate::types::plan::Plan;
use crate::types::variation::VariationProfile;

/// What became of an optional improvement stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The stage's output replaced the working text.
    Applied,
    /// The previous text was kept; the reason says why.
    Kept { reason: String },
}

impl Outcome {
    pub fn applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    fn kept(reason: impl Into<String>) -> Self {
        Outcome::Kept {
            reason: reason.into(),
        }
    }
}

/// Everything the pipeline produced for one topic.
#[derive(Debug)]
pub struct PipelineOutput {
    pub plan: Plan,
    pub document: Document,
    /// Critique-and-revise stage result.
    pub revise: Outcome,
    /// Stylistic pass result.
    pub style: Outcome,
}

/// Runs the four authoring stages against a [`TextModel`].
///
/// Consumed by [`ArticlePipeline::run`]; the conversation it
/// accumulates is not reusable across topics.
pub struct ArticlePipeline<'a, M: TextModel> {
    model: &'a M,
    config: &'a RunConfig,
    system: String,
    conversation: Vec<Turn>,
}

impl<'a, M: TextModel> ArticlePipeline<'a, M> {
    pub fn new(model: &'a M, config: &'a RunConfig, profile: &VariationProfile) -> Self {
        Self {
            model,
            config,
            system: build_system_prompt(profile),
            conversation: Vec::new(),
        }
    }

    /// Run all stages for one topic.
    pub async fn run(mut self, topic: &Topic) -> Result<PipelineOutput> {
        let plan = self.plan(topic).await?;
        info!(title = %plan.working_title, angle = %plan.contrarian_angle, "plan accepted");

        let draft = self.draft(&plan).await?;
        debug!(chars = draft.len(), "draft complete");

        let (body, revise) = self.critique_and_revise(draft).await;
        if let Outcome::Kept { reason } = &revise {
            warn!(%reason, "revision kept the draft");
        }

        let (body, style) = self.stylistic_pass(body).await;
        if let Outcome::Kept { reason } = &style {
            warn!(%reason, "stylistic pass kept the previous text");
        }

        let document = Document::new(plan.working_title.clone(), body);
        Ok(PipelineOutput {
            plan,
            document,
            revise,
            style,
        })
    }

    fn record(&mut self, user: String, assistant: &str) {
        self.conversation.push(Turn::user(user));
        self.conversation.push(Turn::assistant(assistant));
    }

    /// Stage 1: plan. Structured attempt first, then a relaxed retry
    /// that asks for bare JSON. Two failures abort the run.
    async fn plan(&mut self, topic: &Topic) -> Result<Plan> {
        let prompt = plan_prompt(&topic.title);

        let structured = GenerateRequest::new(&self.system)
            .turn(Turn::user(prompt.clone()))
            .effort(Effort::Medium)
            .max_output(2048)
            .with_schema(serde_json::json!(schemars::schema_for!(Plan)));

        let first = match self.model.generate(&structured).await {
            Ok(reply) => match self.accept_plan(topic, &reply.text) {
                Ok(plan) => {
                    self.record(prompt, &reply.text);
                    return Ok(plan);
                }
                Err(e) => e,
            },
            Err(e) => e,
        };
        warn!(error = %first, "structured plan attempt failed; retrying relaxed");

        let relaxed_prompt = format!("{prompt}{PLAN_RELAXED_SUFFIX}");
        let relaxed = GenerateRequest::new(&self.system)
            .turn(Turn::user(relaxed_prompt.clone()))
            .effort(Effort::Medium)
            .max_output(2048);

        let reply = self
            .model
            .generate(&relaxed)
            .await
            .map_err(|e| AuthoringError::stage("plan", e))?;
        let plan = self
            .accept_plan(topic, &reply.text)
            .map_err(|e| AuthoringError::stage("plan", e))?;

        self.record(relaxed_prompt, &reply.text);
        Ok(plan)
    }

    /// Parse, validate, and normalize a plan reply.
    fn accept_plan(&self, topic: &Topic, text: &str) -> Result<Plan> {
        let value = match extract_json(text) {
            ParseAttempt::Parsed(value) => value,
            ParseAttempt::Unparseable { reason } => {
                return Err(AuthoringError::Unparseable { reason });
            }
        };
        let mut plan: Plan = serde_json::from_value(value)?;
        plan.validate()?;
        plan.normalize_media_queries(topic);
        Ok(plan)
    }

    /// Stage 2: draft. A failure or an implausibly short body aborts.
    async fn draft(&mut self, plan: &Plan) -> Result<String> {
        let prompt = draft_prompt(plan);
        let request = GenerateRequest::new(&self.system)
            .conversation(self.conversation.clone())
            .turn(Turn::user(prompt.clone()))
            .effort(Effort::High)
            .max_output(8192);

        let reply = self
            .model
            .generate(&request)
            .await
            .map_err(|e| AuthoringError::stage("draft", e))?;

        let draft = sanitize_html(&reply.text);
        if draft.len() < self.config.min_stage_output_chars {
            return Err(AuthoringError::stage(
                "draft",
                std::io::Error::other(format!(
                    "draft too short: {} chars (minimum {})",
                    draft.len(),
                    self.config.min_stage_output_chars
                )),
            ));
        }

        self.record(prompt, &reply.text);
        Ok(draft)
    }

    /// Stage 3: self-critique, then a rewrite that applies it. Both
    /// calls must succeed and produce a plausible body for the rewrite
    /// to replace the draft.
    async fn critique_and_revise(&mut self, draft: String) -> (String, Outcome) {
        let critique_request = GenerateRequest::new(&self.system)
            .conversation(self.conversation.clone())
            .turn(Turn::user(CRITIQUE_PROMPT))
            .effort(Effort::Max)
            .max_output(2048);

        let critique = match self.model.generate(&critique_request).await {
            Ok(reply) => reply.text,
            Err(e) => return (draft, Outcome::kept(format!("critique failed: {e}"))),
        };
        self.record(CRITIQUE_PROMPT.to_string(), &critique);

        let revise_request = GenerateRequest::new(&self.system)
            .conversation(self.conversation.clone())
            .turn(Turn::user(REVISE_PROMPT))
            .effort(Effort::Max)
            .max_output(8192);

        let revised = match self.model.generate(&revise_request).await {
            Ok(reply) => sanitize_html(&reply.text),
            Err(e) => return (draft, Outcome::kept(format!("revision failed: {e}"))),
        };

        if revised.len() < self.config.min_stage_output_chars {
            return (
                draft,
                Outcome::kept(format!(
                    "revision too short: {} chars (minimum {})",
                    revised.len(),
                    self.config.min_stage_output_chars
                )),
            );
        }

        self.record(REVISE_PROMPT.to_string(), &revised);
        (revised, Outcome::Applied)
    }

    /// Stage 4: stylistic pass in a fresh context. The model sees only
    /// the article text, not the conversation that produced it.
    async fn stylistic_pass(&self, body: String) -> (String, Outcome) {
        let request = GenerateRequest::new(&self.system)
            .turn(Turn::user(style_prompt(&body)))
            .effort(Effort::High)
            .max_output(8192);

        let styled = match self.model.generate(&request).await {
            Ok(reply) => sanitize_html(&reply.text),
            Err(e) => return (body, Outcome::kept(format!("stylistic pass failed: {e}"))),
        };

        if styled.len() < self.config.min_stage_output_chars {
            return (
                body,
                Outcome::kept(format!(
                    "styled text too short: {} chars (minimum {})",
                    styled.len(),
                    self.config.min_stage_output_chars
                )),
            );
        }

        (styled, Outcome::Applied)
    }
}

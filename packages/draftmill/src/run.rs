//! End-to-end run orchestration.
//!
//! One run produces one draft on the host: corpus snapshot, topic
//! selection, variation, the four authoring stages, media resolution,
//! assembly, submission, run log. The media searcher is optional; the
//! model and host are not.

use chrono::Utc;
use tracing::{info, warn};

use crate::corpus::CorpusIndex;
use crate::error::Result;
use crate::media::{MarkerOutcome, MediaResolver};
use crate::pipeline::{ArticlePipeline, Outcome};
use crate::publish::{publish, ArticleAssembler};
use crate::runlog::{RunLog, RunLogEntry};
use crate::selector::TopicSelector;
use crate::traits::generator::TextModel;
use crate::traits::host::{DraftReceipt, PublishHost};
use crate::traits::media::MediaSearcher;
use crate::types::article::Topic;
use crate::types::config::RunConfig;
use crate::variation::VariationSelector;

/// What a completed run produced.
#[derive(Debug)]
pub struct RunReport {
    pub topic: Topic,
    pub final_title: String,
    pub receipt: DraftReceipt,
    pub media: Vec<MarkerOutcome>,
    pub revise: Outcome,
    pub style: Outcome,
}

/// One full authoring run.
pub struct ArticleRun<'a, M, S, H>
where
    M: TextModel,
    S: MediaSearcher,
    H: PublishHost,
{
    model: &'a M,
    searcher: Option<&'a S>,
    host: &'a H,
    config: RunConfig,
}

impl<'a, M, S, H> ArticleRun<'a, M, S, H>
where
    M: TextModel,
    S: MediaSearcher,
    H: PublishHost,
{
    pub fn new(model: &'a M, searcher: Option<&'a S>, host: &'a H, config: RunConfig) -> Self {
        Self {
            model,
            searcher,
            host,
            config,
        }
    }

    /// Execute the run through to a submitted draft.
    pub async fn execute(&self) -> Result<RunReport> {
        let corpus = CorpusIndex::load(self.host, &self.config).await;

        // Sub-seeds keep the selectors independent under a shared seed
        let mut topics = match self.config.seed {
            Some(seed) => TopicSelector::with_seed(self.config.mode, seed),
            None => TopicSelector::new(self.config.mode),
        };
        let mut variations = match self.config.seed {
            Some(seed) => VariationSelector::with_seed(seed.wrapping_add(1)),
            None => VariationSelector::new(),
        };
        let mut assembler = match self.config.seed {
            Some(seed) => ArticleAssembler::with_seed(self.config.mode, seed.wrapping_add(2)),
            None => ArticleAssembler::new(self.config.mode),
        };

        let topic = topics.select(self.model, &corpus, &self.config).await;
        info!(title = %topic.title, category = %topic.category, "topic selected");

        let profile = variations.choose();
        info!(
            persona = %profile.persona.name,
            format = %profile.format.name,
            tone = %profile.tone.name,
            "variation chosen"
        );

        let pipeline = ArticlePipeline::new(self.model, &self.config, &profile);
        let output = pipeline.run(&topic).await?;

        let resolver = MediaResolver::new(self.searcher, self.config.media_search_delay_ms);
        let resolved = resolver
            .resolve(&output.document.body, topic.fallback_keyword())
            .await;
        info!(
            resolved = resolved.resolved_count(),
            total = resolved.outcomes.len(),
            "media markers resolved"
        );

        let document = output
            .document
            .with_body(resolved.body)
            .with_label(topic.category.clone());

        let submission = assembler.assemble(&document, &topic, &corpus, self.config.max_related);
        let receipt = publish(self.host, &submission).await?;

        if let Some(path) = &self.config.run_log_path {
            RunLog::new(path).append(&RunLogEntry {
                timestamp: Utc::now(),
                mode: self.config.mode.as_str().to_string(),
                category: topic.category.clone(),
                topic_title: topic.title.clone(),
                final_title: submission.title.clone(),
                receipt_id: receipt.id.clone(),
                receipt_url: receipt.url.clone(),
            });
        }

        if let Outcome::Kept { reason } = &output.revise {
            warn!(%reason, "draft shipped without revision");
        }

        Ok(RunReport {
            topic,
            final_title: submission.title,
            receipt,
            media: resolved.outcomes,
            revise: output.revise,
            style: output.style,
        })
    }
}

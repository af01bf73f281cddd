//! Command-line runner: one invocation, one submitted draft.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use draftmill::ai::anthropic::AnthropicModel;
use draftmill::media::MarkerOutcome;
use draftmill::pipeline::Outcome;
use draftmill::run::ArticleRun;
use draftmill::security::HostCredentials;
use draftmill::traits::host::BloggerHost;
use draftmill::traits::media::UnsplashSearcher;
use draftmill::types::config::{RunConfig, RunMode};

#[derive(Parser, Debug)]
#[command(name = "draftmill", about = "Generate one blog draft and submit it for review")]
struct Cli {
    /// Run mode: approval (trust-building) or money (monetizable)
    #[arg(long, default_value = "approval")]
    mode: RunMode,

    /// Model identifier passed to the provider
    #[arg(long)]
    model: Option<String>,

    /// Seed for reproducible topic/variation selection
    #[arg(long)]
    seed: Option<u64>,

    /// Append a JSON-lines record of the run to this file
    #[arg(long)]
    run_log: Option<PathBuf>,

    /// Duplicate-detection keyword overlap threshold
    #[arg(long)]
    duplicate_threshold: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real deployments set the environment directly
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,draftmill=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = RunConfig::default().with_mode(cli.mode);
    if let Some(model) = cli.model {
        config = config.with_model(model);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(path) = cli.run_log {
        config = config.with_run_log(path);
    }
    if let Some(threshold) = cli.duplicate_threshold {
        config = config.with_duplicate_threshold(threshold);
    }

    let model = AnthropicModel::from_env(config.model.clone())
        .context("failed to build Anthropic model (is ANTHROPIC_API_KEY set?)")?;

    // Images are optional: without a key the run publishes unillustrated
    let searcher = match std::env::var("UNSPLASH_ACCESS_KEY") {
        Ok(key) if !key.is_empty() => Some(UnsplashSearcher::new(key)),
        _ => {
            tracing::warn!("UNSPLASH_ACCESS_KEY not set; media markers will be stripped");
            None
        }
    };

    let blog_id =
        std::env::var("BLOGGER_BLOG_ID").context("BLOGGER_BLOG_ID must be set")?;
    let access_token =
        std::env::var("BLOGGER_ACCESS_TOKEN").context("BLOGGER_ACCESS_TOKEN must be set")?;
    let host = BloggerHost::new(HostCredentials::new(blog_id, access_token));

    let report = ArticleRun::new(&model, searcher.as_ref(), &host, config)
        .execute()
        .await
        .context("article run failed")?;

    println!("Draft submitted");
    println!("  topic:    {} [{}]", report.topic.title, report.topic.category);
    println!("  title:    {}", report.final_title);
    println!("  draft id: {}", report.receipt.id);
    if let Some(url) = &report.receipt.url {
        println!("  url:      {url}");
    }
    let resolved = report
        .media
        .iter()
        .filter(|o| matches!(o, MarkerOutcome::Resolved { .. }))
        .count();
    println!("  media:    {resolved}/{} markers resolved", report.media.len());
    if let Outcome::Kept { reason } = &report.revise {
        println!("  note:     revision skipped ({reason})");
    }
    if let Outcome::Kept { reason } = &report.style {
        println!("  note:     stylistic pass skipped ({reason})");
    }

    Ok(())
}

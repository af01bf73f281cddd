//! Integration tests for the full authoring run.
//!
//! These tests script the model turn by turn and verify the whole loop:
//! 1. Corpus snapshot and topic selection
//! 2. Plan / draft / critique / style stages
//! 3. Media marker resolution
//! 4. Assembly, labels, and draft submission

use draftmill::media::MarkerOutcome;
use draftmill::pipeline::Outcome;
use draftmill::run::ArticleRun;
use draftmill::testing::{MockHost, MockModel};
use draftmill::traits::media::{MediaAsset, MockMediaSearcher};
use draftmill::types::article::ExistingArticle;
use draftmill::types::config::{RunConfig, RunMode};

fn config() -> RunConfig {
    let mut config = RunConfig::default()
        .with_mode(RunMode::Approval)
        .with_min_stage_output_chars(20)
        .with_seed(7);
    config.media_search_delay_ms = 0;
    config
}

fn plan_json() -> String {
    serde_json::json!({
        "working_title": "Standing Desks: What the Studies Say",
        "hook_concept": "Open with the mismatch between marketing and research",
        "contrarian_angle": "Standing all day is not the point",
        "sections": [
            {
                "header": "What the studies measured",
                "key_point": "Mostly discomfort, not output",
                "supporting_element": "Three study designs compared"
            },
            {
                "header": "Where the hype comes from",
                "key_point": "Vendor-funded summaries",
                "supporting_element": "Press release vs paper wording"
            }
        ],
        "caveat": "Small sample sizes throughout",
        "media_queries": ["standing desk office", "person stretching at desk"]
    })
    .to_string()
}

fn draft_html() -> String {
    format!(
        "<h2>What the studies measured</h2><p>{}</p>\n\
         [MEDIA: standing desk office]\n\
         <h2>Where the hype comes from</h2><p>{}</p>\n\
         [MEDIA: person stretching at desk]\n\
         <p>Closing takeaways.</p>",
        "findings paragraph ".repeat(8),
        "hype paragraph ".repeat(8),
    )
}

fn long_html(tag: &str) -> String {
    format!(
        "<h2>{tag}</h2><p>{}</p>\n[MEDIA: standing desk office]\n[MEDIA: person stretching at desk]",
        "substantive paragraph ".repeat(8)
    )
}

fn asset(username: &str) -> MediaAsset {
    MediaAsset::new(
        format!("https://images.unsplash.com/{username}.jpg"),
        username.to_string(),
        format!("https://unsplash.com/@{username}"),
    )
}

/// A fully scripted model: topic, plan, draft, critique, revision,
/// stylistic pass.
fn scripted_model() -> MockModel {
    MockModel::new()
        .with_reply(
            r#"{"title": "Standing Desks: Hype or Legit?", "category": "Wellness", "keywords": ["standing desk", "office health"]}"#,
        )
        .with_reply(plan_json())
        .with_reply(draft_html())
        .with_reply("## Issues Found\n1. [quote] - slightly vendor-flavored phrasing")
        .with_reply(long_html("revised"))
        .with_reply(long_html("styled"))
}

#[tokio::test]
async fn test_full_run_submits_draft_with_resolved_media() {
    let model = scripted_model();
    let searcher = MockMediaSearcher::new()
        .with_asset("standing desk office", asset("alice"))
        .with_asset("person stretching at desk", asset("bob"));
    let host = MockHost::new();

    let report = ArticleRun::new(&model, Some(&searcher), &host, config())
        .execute()
        .await
        .unwrap();

    assert_eq!(report.topic.category, "Wellness");
    assert_eq!(report.final_title, "Standing Desks: What the Studies Say");
    assert_eq!(report.receipt.id, "draft-1");
    assert!(report.revise.applied());
    assert!(report.style.applied());
    assert_eq!(report.media.len(), 2);
    assert!(report
        .media
        .iter()
        .all(|o| matches!(o, MarkerOutcome::Resolved { .. })));

    let inserted = host.inserted();
    assert_eq!(inserted.len(), 1);
    let submission = &inserted[0];
    assert!(!submission.html_body.contains("[MEDIA:"));
    assert!(submission.html_body.contains("unsplash.com/@alice"));
    assert!(submission.html_body.contains("unsplash.com/@bob"));
    assert!(submission.html_body.starts_with("<style>"));
    assert!(submission.labels.contains(&"Wellness".to_string()));
    assert_eq!(submission.labels.len(), 3);
}

#[tokio::test]
async fn test_partial_media_failure_still_publishes() {
    let model = scripted_model();
    // First query resolves, second errors out
    let searcher = MockMediaSearcher::new()
        .with_asset("standing desk office", asset("alice"))
        .fail_query("person stretching at desk");
    let host = MockHost::new();

    let report = ArticleRun::new(&model, Some(&searcher), &host, config())
        .execute()
        .await
        .unwrap();

    assert_eq!(report.media.len(), 2);
    assert!(matches!(report.media[0], MarkerOutcome::Resolved { .. }));
    assert!(matches!(report.media[1], MarkerOutcome::Skipped { .. }));

    let inserted = host.inserted();
    assert!(!inserted[0].html_body.contains("[MEDIA:"));
    assert!(inserted[0].html_body.contains("unsplash.com/@alice"));
}

#[tokio::test]
async fn test_run_without_searcher_strips_markers() {
    let model = scripted_model();
    let host = MockHost::new();

    let report = ArticleRun::<_, MockMediaSearcher, _>::new(&model, None, &host, config())
        .execute()
        .await
        .unwrap();

    assert!(report
        .media
        .iter()
        .all(|o| matches!(o, MarkerOutcome::Skipped { .. })));
    assert!(!host.inserted()[0].html_body.contains("[MEDIA:"));
}

#[tokio::test]
async fn test_failed_style_pass_keeps_revision() {
    let model = MockModel::new()
        .with_reply(
            r#"{"title": "Fresh Topic", "category": "Wellness", "keywords": []}"#,
        )
        .with_reply(plan_json())
        .with_reply(draft_html())
        .with_reply("critique text")
        .with_reply(long_html("revised body"))
        .with_failure("overloaded");
    let host = MockHost::new();

    let report = ArticleRun::<_, MockMediaSearcher, _>::new(&model, None, &host, config())
        .execute()
        .await
        .unwrap();

    assert!(report.revise.applied());
    assert!(matches!(report.style, Outcome::Kept { .. }));
    assert!(host.inserted()[0].html_body.contains("revised body"));
}

#[tokio::test]
async fn test_plan_failure_aborts_without_submission() {
    let model = MockModel::new()
        .with_reply(r#"{"title": "Fresh Topic", "category": "Wellness", "keywords": []}"#)
        .with_failure("overloaded")
        .with_failure("still overloaded");
    let host = MockHost::new();

    let result = ArticleRun::<_, MockMediaSearcher, _>::new(&model, None, &host, config())
        .execute()
        .await;

    assert!(result.is_err());
    assert!(host.inserted().is_empty());
}

#[tokio::test]
async fn test_duplicate_model_topic_replaced_by_fallback() {
    let existing = ExistingArticle::new(
        "1",
        "Budgeting Apps: Which Ones People Actually Keep Using",
    )
    .with_labels(["Finance"]);
    let host = MockHost::new().with_article(existing);

    let model = MockModel::new()
        // Near-rephrase of the existing title; selector must reject it
        .with_reply(
            r#"{"title": "Budget apps people keep using", "category": "Finance", "keywords": []}"#,
        )
        .with_reply(plan_json())
        .with_reply(draft_html())
        .with_reply("critique")
        .with_reply(long_html("revised"))
        .with_reply(long_html("styled"));

    let config = config().with_mode(RunMode::Money);
    let report = ArticleRun::<_, MockMediaSearcher, _>::new(&model, None, &host, config)
        .execute()
        .await
        .unwrap();

    assert_ne!(report.topic.title, "Budget apps people keep using");
    assert_eq!(host.inserted().len(), 1);
}

#[tokio::test]
async fn test_host_list_failure_still_produces_draft() {
    let model = scripted_model();
    let host = MockHost::new().fail_list();

    let report = ArticleRun::<_, MockMediaSearcher, _>::new(&model, None, &host, config())
        .execute()
        .await
        .unwrap();

    assert_eq!(report.receipt.id, "draft-1");
}

#[tokio::test]
async fn test_insert_failure_surfaces() {
    let model = scripted_model();
    let host = MockHost::new().fail_insert();

    let result = ArticleRun::<_, MockMediaSearcher, _>::new(&model, None, &host, config())
        .execute()
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_money_mode_adds_disclosure() {
    let model = MockModel::new()
        .with_reply(
            r#"{"title": "Email Tools Under $20 Tested", "category": "SaaS Reviews", "keywords": []}"#,
        )
        .with_reply(plan_json())
        .with_reply(draft_html())
        .with_reply("critique")
        .with_reply(long_html("revised"))
        .with_reply(long_html("styled"));
    let host = MockHost::new();
    let config = config().with_mode(RunMode::Money);

    ArticleRun::<_, MockMediaSearcher, _>::new(&model, None, &host, config)
        .execute()
        .await
        .unwrap();

    assert!(host.inserted()[0].html_body.contains("Disclosure:"));
}

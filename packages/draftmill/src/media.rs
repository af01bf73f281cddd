//! Media marker resolution.
//!
//! Drafts carry `[MEDIA: description]` markers where illustrations
//! belong. This module replaces each marker with attributed figure
//! markup when a search succeeds and removes the marker when it
//! doesn't. Whatever happens, no marker survives into the published
//! body.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, warn};

use crate::traits::media::{MediaAsset, MediaSearcher, Orientation};

fn marker_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[MEDIA:([^\]]*)\]").unwrap())
}

/// What happened to one marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerOutcome {
    /// Replaced with figure markup.
    Resolved { query: String },
    /// Removed without a replacement.
    Skipped { query: String, reason: String },
}

/// A body with every marker resolved or removed.
#[derive(Debug)]
pub struct ResolvedBody {
    pub body: String,
    /// Per-marker outcomes in document order.
    pub outcomes: Vec<MarkerOutcome>,
}

impl ResolvedBody {
    pub fn resolved_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, MarkerOutcome::Resolved { .. }))
            .count()
    }
}

/// Resolves markers against an optional [`MediaSearcher`].
///
/// Without a searcher every marker is stripped; the article publishes
/// unillustrated rather than not at all.
pub struct MediaResolver<'a, S: MediaSearcher> {
    searcher: Option<&'a S>,
    search_delay: Duration,
}

impl<'a, S: MediaSearcher> MediaResolver<'a, S> {
    pub fn new(searcher: Option<&'a S>, search_delay_ms: u64) -> Self {
        Self {
            searcher,
            search_delay: Duration::from_millis(search_delay_ms),
        }
    }

    /// Resolve every marker in `body`.
    ///
    /// Markers are handled in document order. A marker whose
    /// description is too short to search searches `fallback_query`
    /// instead. Search failures skip the marker; they never abort.
    pub async fn resolve(&self, body: &str, fallback_query: &str) -> ResolvedBody {
        let markers: Vec<(String, String)> = marker_pattern()
            .captures_iter(body)
            .map(|cap| (cap[0].to_string(), cap[1].trim().to_string()))
            .collect();

        let Some(searcher) = self.searcher else {
            if !markers.is_empty() {
                debug!(count = markers.len(), "no media searcher; stripping markers");
            }
            let outcomes = markers
                .iter()
                .map(|(_, query)| MarkerOutcome::Skipped {
                    query: query.clone(),
                    reason: "no media searcher configured".into(),
                })
                .collect();
            return ResolvedBody {
                body: marker_pattern().replace_all(body, "").into_owned(),
                outcomes,
            };
        };

        let mut resolved = body.to_string();
        let mut outcomes = Vec::with_capacity(markers.len());

        for (i, (marker, description)) in markers.iter().enumerate() {
            if i > 0 && !self.search_delay.is_zero() {
                tokio::time::sleep(self.search_delay).await;
            }

            let query = if description.len() < 3 {
                fallback_query
            } else {
                description.as_str()
            };

            let outcome = match searcher.search(query, Orientation::Landscape).await {
                Ok(Some(asset)) => {
                    resolved = resolved.replacen(marker.as_str(), &figure_markup(&asset), 1);
                    MarkerOutcome::Resolved {
                        query: query.to_string(),
                    }
                }
                Ok(None) => {
                    resolved = resolved.replacen(marker.as_str(), "", 1);
                    MarkerOutcome::Skipped {
                        query: query.to_string(),
                        reason: "no result".into(),
                    }
                }
                Err(e) => {
                    warn!(query, error = %e, "media search failed; dropping marker");
                    resolved = resolved.replacen(marker.as_str(), "", 1);
                    MarkerOutcome::Skipped {
                        query: query.to_string(),
                        reason: e.to_string(),
                    }
                }
            };
            outcomes.push(outcome);
        }

        // Anything the pass missed (duplicated markers, odd nesting)
        // still has to go
        let body = marker_pattern().replace_all(&resolved, "").into_owned();
        ResolvedBody { body, outcomes }
    }
}

/// Figure markup with the attribution the asset license requires.
fn figure_markup(asset: &MediaAsset) -> String {
    format!(
        "<figure style=\"margin: 20px 0; text-align: center;\">\
         <img src=\"{src}\" alt=\"{alt}\" style=\"max-width: 100%; border-radius: 8px;\">\
         <figcaption style=\"font-size: 12px; color: #999; margin-top: 8px;\">\
         Photo by <a href=\"{link}\" rel=\"nofollow\">{name}</a></figcaption>\
         </figure>",
        src = asset.asset_url,
        alt = asset.attribution_name,
        link = asset.attribution_link,
        name = asset.attribution_name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::media::MockMediaSearcher;

    fn asset(name: &str) -> MediaAsset {
        MediaAsset {
            asset_url: format!("https://images.unsplash.com/{name}"),
            attribution_name: name.to_string(),
            attribution_link: format!("https://unsplash.com/@{name}"),
        }
    }

    #[tokio::test]
    async fn test_markers_replaced_with_figures() {
        let searcher = MockMediaSearcher::new()
            .with_asset("desk setup", asset("alice"))
            .with_asset("coffee cup", asset("bob"));
        let resolver = MediaResolver::new(Some(&searcher), 0);

        let body = "<p>a</p>[MEDIA: desk setup]<p>b</p>[MEDIA: coffee cup]<p>c</p>";
        let out = resolver.resolve(body, "fallback").await;

        assert_eq!(out.resolved_count(), 2);
        assert!(out.body.contains("Photo by <a href=\"https://unsplash.com/@alice\""));
        assert!(out.body.contains("unsplash.com/@bob"));
        assert!(!out.body.contains("[MEDIA:"));
    }

    #[tokio::test]
    async fn test_no_result_removes_marker() {
        let searcher = MockMediaSearcher::new().with_asset("desk setup", asset("alice"));
        let resolver = MediaResolver::new(Some(&searcher), 0);

        let body = "<p>a</p>[MEDIA: desk setup]<p>b</p>[MEDIA: nothing matches]<p>c</p>";
        let out = resolver.resolve(body, "fallback").await;

        assert_eq!(out.resolved_count(), 1);
        assert!(!out.body.contains("[MEDIA:"));
        assert_eq!(
            out.outcomes[1],
            MarkerOutcome::Skipped {
                query: "nothing matches".into(),
                reason: "no result".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_search_failure_removes_marker_and_continues() {
        let searcher = MockMediaSearcher::new()
            .fail_query("broken query")
            .with_asset("coffee cup", asset("bob"));
        let resolver = MediaResolver::new(Some(&searcher), 0);

        let body = "[MEDIA: broken query]<p>middle</p>[MEDIA: coffee cup]";
        let out = resolver.resolve(body, "fallback").await;

        assert_eq!(out.resolved_count(), 1);
        assert!(!out.body.contains("[MEDIA:"));
        assert!(matches!(&out.outcomes[0], MarkerOutcome::Skipped { .. }));
    }

    #[tokio::test]
    async fn test_middle_marker_failure_leaves_neighbors_resolved() {
        let searcher = MockMediaSearcher::new()
            .with_asset("first concept", asset("alice"))
            .fail_query("second concept")
            .with_asset("third concept", asset("carol"));
        let resolver = MediaResolver::new(Some(&searcher), 0);

        let body =
            "[MEDIA: first concept]<p>a</p>[MEDIA: second concept]<p>b</p>[MEDIA: third concept]";
        let out = resolver.resolve(body, "fallback").await;

        assert_eq!(out.resolved_count(), 2);
        assert!(out.body.contains("unsplash.com/@alice"));
        assert!(out.body.contains("unsplash.com/@carol"));
        assert!(!out.body.contains("second concept"));
        assert_eq!(searcher.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_short_description_uses_fallback_query() {
        let searcher = MockMediaSearcher::new().with_asset("standing desk", asset("carol"));
        let resolver = MediaResolver::new(Some(&searcher), 0);

        let out = resolver.resolve("<p>x</p>[MEDIA: ]", "standing desk").await;

        assert_eq!(out.resolved_count(), 1);
        assert_eq!(
            out.outcomes[0],
            MarkerOutcome::Resolved {
                query: "standing desk".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_no_searcher_strips_all_markers() {
        let resolver: MediaResolver<'_, MockMediaSearcher> = MediaResolver::new(None, 0);

        let body = "<p>a</p>[MEDIA: one]<p>b</p>[MEDIA: two]";
        let out = resolver.resolve(body, "fallback").await;

        assert!(!out.body.contains("[MEDIA:"));
        assert_eq!(out.resolved_count(), 0);
        assert_eq!(out.outcomes.len(), 2);
    }

    #[tokio::test]
    async fn test_body_without_markers_unchanged() {
        let searcher = MockMediaSearcher::new();
        let resolver = MediaResolver::new(Some(&searcher), 0);

        let body = "<p>plain article body</p>";
        let out = resolver.resolve(body, "fallback").await;

        assert_eq!(out.body, body);
        assert!(out.outcomes.is_empty());
        assert!(searcher.calls().is_empty());
    }
}

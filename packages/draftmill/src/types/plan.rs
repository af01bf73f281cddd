//! Article plan produced by the first pipeline stage.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AuthoringError, Result};
use crate::types::article::Topic;

/// Number of media queries every plan must carry forward.
pub const REQUIRED_MEDIA_QUERIES: usize = 2;

/// One planned article section.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlanSection {
    /// Section header (useful, not clever)
    pub header: String,

    /// The one thing this section establishes
    pub key_point: String,

    /// Concrete supporting element: a comparison, a finding, a caveat
    #[serde(default)]
    pub supporting_element: String,
}

/// The article plan: angle, structure, and media hooks for the draft.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Plan {
    /// Title that promises specific value
    pub working_title: String,

    /// One-sentence description of the opening approach
    pub hook_concept: String,

    /// What conventional wisdom the article pushes against
    pub contrarian_angle: String,

    /// Ordered sections
    pub sections: Vec<PlanSection>,

    /// One honest limitation to include
    #[serde(default)]
    pub caveat: String,

    /// Visual concepts for illustration search
    #[serde(default)]
    pub media_queries: Vec<String>,
}

impl Plan {
    /// Structural validation before the plan is passed forward.
    ///
    /// The media-query count is deliberately not validated here;
    /// [`Plan::normalize_media_queries`] repairs it instead.
    pub fn validate(&self) -> Result<()> {
        if self.working_title.trim().is_empty() {
            return Err(AuthoringError::InvalidPlan {
                reason: "empty working_title".into(),
            });
        }
        if self.contrarian_angle.trim().is_empty() {
            return Err(AuthoringError::InvalidPlan {
                reason: "empty contrarian_angle".into(),
            });
        }
        if self.sections.is_empty() {
            return Err(AuthoringError::InvalidPlan {
                reason: "no sections".into(),
            });
        }
        if self.sections.iter().any(|s| s.header.trim().is_empty()) {
            return Err(AuthoringError::InvalidPlan {
                reason: "section with empty header".into(),
            });
        }
        Ok(())
    }

    /// Force exactly [`REQUIRED_MEDIA_QUERIES`] usable media queries.
    ///
    /// Near-empty entries are dropped, missing entries are padded with
    /// topic-derived defaults, extras are truncated.
    pub fn normalize_media_queries(&mut self, topic: &Topic) {
        self.media_queries.retain(|q| q.trim().len() > 2);
        self.media_queries.truncate(REQUIRED_MEDIA_QUERIES);

        let defaults = [
            format!("{} overview", topic.title),
            format!("{} concept", topic.category),
        ];
        for default in defaults {
            if self.media_queries.len() >= REQUIRED_MEDIA_QUERIES {
                break;
            }
            if !self.media_queries.contains(&default) {
                self.media_queries.push(default);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> Plan {
        Plan {
            working_title: "Standing Desks: What the Studies Say".into(),
            hook_concept: "Open with the mismatch between marketing and research".into(),
            contrarian_angle: "Standing all day is not the point".into(),
            sections: vec![PlanSection {
                header: "What the studies measured".into(),
                key_point: "Most measured discomfort, not productivity".into(),
                supporting_element: "Comparison of three study designs".into(),
            }],
            caveat: "Small sample sizes throughout".into(),
            media_queries: vec!["standing desk office".into(), "ergonomic posture".into()],
        }
    }

    #[test]
    fn test_valid_plan_passes() {
        assert!(sample_plan().validate().is_ok());
    }

    #[test]
    fn test_missing_sections_rejected() {
        let mut plan = sample_plan();
        plan.sections.clear();
        assert!(matches!(
            plan.validate(),
            Err(AuthoringError::InvalidPlan { .. })
        ));
    }

    #[test]
    fn test_single_media_query_padded_to_two() {
        let topic = Topic::new("Standing desks", "Wellness");
        let mut plan = sample_plan();
        plan.media_queries = vec!["standing desk office".into()];

        plan.normalize_media_queries(&topic);

        assert_eq!(plan.media_queries.len(), REQUIRED_MEDIA_QUERIES);
        assert_eq!(plan.media_queries[0], "standing desk office");
    }

    #[test]
    fn test_near_empty_queries_replaced() {
        let topic = Topic::new("Standing desks", "Wellness");
        let mut plan = sample_plan();
        plan.media_queries = vec!["  ".into(), "a".into()];

        plan.normalize_media_queries(&topic);

        assert_eq!(plan.media_queries.len(), REQUIRED_MEDIA_QUERIES);
        assert!(plan.media_queries[0].contains("Standing desks"));
    }

    #[test]
    fn test_extra_queries_truncated() {
        let topic = Topic::new("Standing desks", "Wellness");
        let mut plan = sample_plan();
        plan.media_queries = vec!["one fine".into(), "two fine".into(), "three fine".into()];

        plan.normalize_media_queries(&topic);

        assert_eq!(plan.media_queries.len(), REQUIRED_MEDIA_QUERIES);
    }
}

//! Topic selection.
//!
//! A topic comes from the model when possible and from a static fallback
//! table when it must. The model is asked for a suggestion in an
//! under-represented category, checked against the corpus for
//! duplication, and replaced by a table entry on any failure. A run
//! never aborts at this stage.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::corpus::{title_keywords, CorpusIndex};
use crate::pipeline::parse::{extract_json, ParseAttempt};
use crate::traits::generator::{Effort, GenerateRequest, TextModel, Turn};
use crate::types::article::Topic;
use crate::types::config::{RunConfig, RunMode};

/// Category pools per run mode. Labels appear verbatim on published
/// articles, so changing one orphans existing posts from the counts.
const APPROVAL_CATEGORIES: &[&str] = &["Productivity", "Wellness", "Tech Tips"];
const MONEY_CATEGORIES: &[&str] = &["SaaS Reviews", "Hosting", "Finance"];

/// Fallback topic table, per mode: (category, title).
const APPROVAL_FALLBACKS: &[(&str, &str)] = &[
    ("Productivity", "Why Your To-Do List Keeps Failing You"),
    ("Productivity", "The Two-Minute Rule, Tested for a Month"),
    ("Productivity", "Deep Work Is Harder Than the Book Admits"),
    ("Productivity", "What Actually Happens When You Batch Your Email"),
    ("Productivity", "Time Blocking for People Who Hate Calendars"),
    ("Wellness", "I Read the Sleep Hygiene Research So You Don't Have To"),
    ("Wellness", "Walking Meetings: Useful Habit or Office Theater?"),
    ("Wellness", "What the 10,000 Steps Number Actually Comes From"),
    ("Wellness", "Desk Stretches That People Actually Keep Doing"),
    ("Wellness", "Caffeine Timing: What the Research Really Says"),
    ("Tech Tips", "Browser Tab Overload and What Finally Fixed Mine"),
    ("Tech Tips", "Password Managers Explained for Skeptics"),
    ("Tech Tips", "Keyboard Shortcuts Worth the Muscle Memory"),
    ("Tech Tips", "What to Check Before Your Laptop Slows to a Crawl"),
    ("Tech Tips", "Backing Up Photos Without a Subscription"),
];

const MONEY_FALLBACKS: &[(&str, &str)] = &[
    ("SaaS Reviews", "Notion vs Obsidian: What the Forums Actually Argue About"),
    ("SaaS Reviews", "Email Marketing Tools Under $20 a Month, Compared"),
    ("SaaS Reviews", "Project Trackers People Abandon, and the Ones They Keep"),
    ("SaaS Reviews", "Free Tiers That Are Actually Usable in 2026"),
    ("SaaS Reviews", "Screen Recording Tools: What You Get at Each Price"),
    ("Hosting", "Shared Hosting vs a Cheap VPS: Where the Line Really Is"),
    ("Hosting", "What 'Unlimited Bandwidth' Actually Means in Hosting Plans"),
    ("Hosting", "Static Site Hosts Compared on the Things That Break"),
    ("Hosting", "Moving a Small Site Between Hosts Without Downtime"),
    ("Hosting", "Managed WordPress Hosting: When the Markup Is Worth It"),
    ("Finance", "Budgeting Apps: Which Ones People Actually Keep Using"),
    ("Finance", "High-Yield Savings Accounts: Reading Past the Headline Rate"),
    ("Finance", "Cashback Cards vs Points Cards for Normal Spending"),
    ("Finance", "What Robo-Advisors Charge, Explained With Real Numbers"),
    ("Finance", "Subscription Audits: Finding the Charges You Forgot"),
];

/// Shape the model is asked to return a suggestion in.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TopicSuggestion {
    /// Proposed article title.
    pub title: String,
    /// One of the offered category labels.
    pub category: String,
    /// A few search-friendly keywords for the topic.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Picks the next topic for a run.
pub struct TopicSelector {
    mode: RunMode,
    rng: StdRng,
}

impl TopicSelector {
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

    fn categories(&self) -> &'static [&'static str] {
        match self.mode {
            RunMode::Approval => APPROVAL_CATEGORIES,
            RunMode::Money => MONEY_CATEGORIES,
        }
    }

    fn fallback_table(&self) -> &'static [(&'static str, &'static str)] {
        match self.mode {
            RunMode::Approval => APPROVAL_FALLBACKS,
            RunMode::Money => MONEY_FALLBACKS,
        }
    }

    /// The category with the fewest published articles, ties broken by
    /// pool order.
    fn under_represented_category(&self, corpus: &CorpusIndex) -> &'static str {
        let counts = corpus.category_counts(self.categories());
        self.categories()
            .iter()
            .copied()
            .min_by_key(|c| counts.get(c).copied().unwrap_or(0))
            .unwrap_or(self.categories()[0])
    }

    /// Select a topic, preferring a fresh model suggestion.
    ///
    /// Any failure along the model path (call error, unparseable reply,
    /// duplicate title) falls through to [`Self::fallback`].
    pub async fn select<M: TextModel>(
        &mut self,
        model: &M,
        corpus: &CorpusIndex,
        config: &RunConfig,
    ) -> Topic {
        match self.suggest(model, corpus, config).await {
            Ok(topic) => {
                debug!(title = %topic.title, category = %topic.category, "model topic accepted");
                topic
            }
            Err(reason) => {
                warn!(%reason, "model topic rejected; using fallback table");
                self.fallback(corpus)
            }
        }
    }

    async fn suggest<M: TextModel>(
        &mut self,
        model: &M,
        corpus: &CorpusIndex,
        config: &RunConfig,
    ) -> Result<Topic, String> {
        let category = self.under_represented_category(corpus);
        let recent = corpus.recent_titles(config.recent_titles_window);

        let mut prompt = format!(
            "Suggest one blog article topic in the category \"{category}\".\n\
             The title should read like something a person would search for, not a listicle.\n\
             Offer 3-6 short keywords a stock photo search could use.\n"
        );
        if !recent.is_empty() {
            prompt.push_str("\nDo not repeat or closely rephrase any of these recent titles:\n");
            for title in &recent {
                prompt.push_str("- ");
                prompt.push_str(title);
                prompt.push('\n');
            }
        }

        let request = GenerateRequest::new(
            "You suggest blog topics. Reply with the requested structure only.",
        )
        .turn(Turn::user(prompt))
        .effort(Effort::Low)
        .max_output(1024)
        .with_schema(serde_json::json!(schemars::schema_for!(TopicSuggestion)));

        let reply = model
            .generate(&request)
            .await
            .map_err(|e| format!("model call failed: {e}"))?;

        let value = match extract_json(&reply.text) {
            ParseAttempt::Parsed(value) => value,
            ParseAttempt::Unparseable { reason } => {
                return Err(format!("topic reply: {reason}"));
            }
        };
        let suggestion: TopicSuggestion = serde_json::from_value(value)
            .map_err(|e| format!("topic reply did not match schema: {e}"))?;

        let title = suggestion.title.trim().to_string();
        if title.is_empty() {
            return Err("suggested title was empty".into());
        }

        // A category outside the pool would create a stray label; pull
        // it back into the pool rather than reject the whole suggestion.
        let category = if self.categories().contains(&suggestion.category.as_str()) {
            suggestion.category
        } else {
            debug!(suggested = %suggestion.category, corrected = category, "category not in pool");
            category.to_string()
        };

        if corpus.is_duplicate(&title) {
            return Err(format!("suggested title duplicates corpus: {title}"));
        }

        let keywords: Vec<String> = suggestion
            .keywords
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .take(5)
            .collect();
        let keywords = if keywords.is_empty() {
            title_keywords(&title).into_iter().take(5).collect()
        } else {
            keywords
        };

        Ok(Topic::new(title, category).with_keywords(keywords))
    }

    /// Pick from the static table: shuffled, first non-duplicate wins.
    ///
    /// If every entry duplicates the corpus the first shuffled entry is
    /// used anyway; a repeated topic is better than a skipped run.
    pub fn fallback(&mut self, corpus: &CorpusIndex) -> Topic {
        let mut entries: Vec<(&str, &str)> = self.fallback_table().to_vec();
        entries.shuffle(&mut self.rng);

        let (category, title) = entries
            .iter()
            .copied()
            .find(|(_, title)| !corpus.is_duplicate(title))
            .unwrap_or_else(|| {
                warn!("entire fallback table duplicates corpus; reusing a topic");
                entries[0]
            });

        let keywords: Vec<String> = title_keywords(title).into_iter().take(5).collect();
        Topic::new(title, category).with_keywords(keywords)
    }
}

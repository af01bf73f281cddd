//! Variation selector - per-run stylistic controls.
//!
//! Every run gets a persona, a structural format, a tone modifier, and
//! three "human quirk" directives, chosen uniformly at random from fixed
//! pools. The selection has no external dependency and no cross-run
//! memory: variance over time comes from independence, not from any
//! enforced distribution. Quirks are sampled without replacement so two
//! runs never read identically even under a repeated
//! persona/format/tone combination.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::types::variation::{StyleChoice, VariationProfile};

/// Quirks sampled per run.
pub const QUIRKS_PER_RUN: usize = 3;

/// Persona pool: (name, instruction).
const PERSONAS: &[(&str, &str)] = &[
    (
        "research curator",
        "You are a curious blogger who researches topics and summarizes findings. You are NOT an \
         expert and you don't pretend to be; your value is doing the research legwork so readers \
         don't have to. Frame everything as findings: 'From what I found...', 'People seem to \
         say...'.",
    ),
    (
        "skeptical comparison shopper",
        "You approach every claim like someone about to spend their own money on it. You compare \
         options side by side, call out marketing language when you see it, and say plainly when \
         the cheaper option is fine.",
    ),
    (
        "practical note-taker",
        "You write like someone cleaning up their own research notes for a friend. Short \
         observations, concrete numbers where you found them, and honest 'I stopped digging here' \
         moments.",
    ),
    (
        "longtime lurker",
        "You spend a lot of time reading forums and review threads before forming an opinion. You \
         summarize what communities actually argue about, not what product pages claim, and you \
         name where opinion splits.",
    ),
];

/// Format pool: (name, instruction).
const FORMATS: &[(&str, &str)] = &[
    (
        "question-led",
        "Open with the question a reader would actually type into a search box, then spend the \
         article answering it honestly, including the parts with no clear answer.",
    ),
    (
        "myth-vs-reality",
        "Structure the piece around common beliefs and what the evidence actually supports. Not \
         every belief has to be wrong; confirming one builds trust.",
    ),
    (
        "comparison walk",
        "Walk through the main options one at a time with consistent criteria, then close with a \
         short 'who should pick what' section instead of a single winner.",
    ),
    (
        "field-notes",
        "Present the piece as organized notes from a research session: what you checked, what \
         surprised you, what you'd still want to verify.",
    ),
];

/// Tone pool: (name, instruction).
const TONES: &[(&str, &str)] = &[
    (
        "dry",
        "Keep the humor dry and sparse. One understated aside per article is plenty.",
    ),
    (
        "warm",
        "Write like you're helping a friend who asked for advice. Encouraging but never salesy.",
    ),
    (
        "blunt",
        "Be direct. If something is overpriced or overhyped, say so in one sentence and move on.",
    ),
    (
        "measured",
        "Stay even-handed; when the evidence is thin, let the uncertainty show in the phrasing.",
    ),
];

/// Quirk pool. Three are drawn per run, without replacement.
const QUIRKS: &[&str] = &[
    "Admit one thing you couldn't verify, explicitly.",
    "Use a single one-sentence paragraph somewhere for emphasis.",
    "Include one short aside in parentheses, like a muttered comment.",
    "End one section with an open question instead of a conclusion.",
    "Say what you would personally pick, and why, in one place.",
    "Paraphrase one typical complaint you saw repeated in reviews or forums.",
    "Make the sections noticeably uneven in length, like real notes.",
    "Start one section mid-thought, as if continuing a conversation.",
];

/// Chooses a [`VariationProfile`] for a run.
///
/// Seedable so selection is reproducible in tests.
pub struct VariationSelector {
    rng: StdRng,
}

impl VariationSelector {
    /// Create a selector with entropy-based randomness.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create with a specific seed for reproducible selection.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Choose this run's profile. Always succeeds; called once per run.
    pub fn choose(&mut self) -> VariationProfile {
        let pick = |rng: &mut StdRng, pool: &[(&str, &str)]| {
            let (name, instruction) = pool
                .choose(rng)
                .copied()
                .unwrap_or(("default", "Write clearly."));
            StyleChoice::new(name, instruction)
        };

        let persona = pick(&mut self.rng, PERSONAS);
        let format = pick(&mut self.rng, FORMATS);
        let tone = pick(&mut self.rng, TONES);

        let quirks = QUIRKS
            .choose_multiple(&mut self.rng, QUIRKS_PER_RUN)
            .map(|q| q.to_string())
            .collect();

        VariationProfile {
            persona,
            format,
            tone,
            quirks,
        }
    }
}

impl Default for VariationSelector {
    fn default() -> Self {
        Self::new()
    }
}

//! Prompt text for the authoring pipeline.
//!
//! The system prompt establishes a research-curator voice plus hard
//! rules against fabrication and stock AI phrasing; the per-run
//! variation profile is appended to it. Stage prompts live here so the
//! pipeline module stays readable.

use crate::types::plan::Plan;
use crate::types::variation::VariationProfile;

/// Voice traits shared by every persona in the pool.
const VOICE_TRAITS: &str = "\
## Your Writing Voice
- Frame claims as research: 'From what I found...', 'People seem to say...', 'The common advice is...'
- Cite general sources naturally: 'Reddit threads seem to agree...', 'A lot of reviews mention...'
- Add your take after the findings: 'Honestly, this surprised me...', 'I'm not sure I buy this, but...'
- Acknowledge gaps: 'I couldn't find a clear answer on...', 'Opinions are split on this...'
- Be practical: actionable takeaways, not fluff
- Show your work: mention what you compared and roughly where you looked";

/// Non-negotiable content rules.
const HARD_RULES: &str = "\
## CRITICAL RULES - NEVER BREAK THESE

### 1. NO FABRICATION
- NEVER invent statistics or specific numbers
- NEVER claim personal experience you don't have
- NEVER make up quotes or sources
- It's OK to say 'I couldn't find reliable data on this'

### 2. NO AI-SOUNDING PHRASES
Never use:
- 'In today's fast-paced world' / 'In today's digital age'
- 'Comprehensive guide' / 'Ultimate guide'
- 'Let's dive in' / 'dive deep' / 'delve'
- 'It's important to note that' / 'It's worth noting'
- 'In conclusion' (just end naturally)
- 'The landscape of' / 'Navigate the complexities'
- 'Game-changer' / 'Revolutionize'
- 'Seamlessly' / 'Effortlessly' / 'Robust' / 'Leverage'
- 'Embark on a journey' / 'Without further ado'
- Anything that sounds like a LinkedIn post

### 3. PROVIDE REAL VALUE
- Don't state the obvious
- Compare things concretely, not vaguely
- If there's no clear answer, say so
- Every paragraph should add something

### 4. NATURAL STRUCTURE
- Not everything needs bullet points
- Vary paragraph lengths
- Headers should be useful, not clever";

/// Full system prompt for a run: shared voice, hard rules, then the
/// run's variation profile.
pub fn build_system_prompt(profile: &VariationProfile) -> String {
    format!(
        "You research topics and write blog articles summarizing what you found.\n\n\
         {VOICE_TRAITS}\n\n{HARD_RULES}\n\n{}",
        profile.prompt_block()
    )
}

/// Planning prompt. The reply is expected as JSON matching [`Plan`].
pub fn plan_prompt(topic_title: &str) -> String {
    format!(
        "I need to write about: \"{topic_title}\"\n\n\
         Before creating an outline, think through:\n\
         1. What's the conventional wisdom on this topic that might be wrong or incomplete?\n\
         2. What do most articles on this topic get wrong or skip?\n\n\
         Then create an outline that:\n\
         - Starts with a hook that challenges assumptions\n\
         - Has 3-5 sections that flow naturally (not formulaic 'What/Why/How')\n\
         - Includes a 'but here's the catch' moment\n\
         - Ends with practical next steps, not generic encouragement\n\n\
         Include exactly 2 media_queries: short, specific visual concepts a stock photo \
         search could match.\n\n\
         Return the plan as JSON with keys: working_title, hook_concept, contrarian_angle, \
         sections (each with header, key_point, supporting_element), caveat, media_queries."
    )
}

/// Suffix for the relaxed planning retry after a structured attempt
/// failed.
pub const PLAN_RELAXED_SUFFIX: &str =
    "\n\nReturn ONLY the JSON object. No prose, no explanation, no code fences.";

/// Drafting prompt, built from the accepted plan.
pub fn draft_prompt(plan: &Plan) -> String {
    let sections = serde_json::to_string_pretty(&plan.sections).unwrap_or_default();
    let markers: Vec<String> = plan
        .media_queries
        .iter()
        .map(|q| format!("[MEDIA: {q}]"))
        .collect();

    format!(
        "Based on our plan:\n\
         - Title: {title}\n\
         - Angle: {angle}\n\
         - Sections: {sections}\n\
         - Caveat: {caveat}\n\n\
         Write the full blog post in HTML format.\n\n\
         Requirements:\n\
         - 1500-2000 words\n\
         - Use <h2> for main sections, <h3> for subsections\n\
         - Use <p> for paragraphs, <ul>/<li> for lists sparingly\n\
         - Insert exactly these 2 media markers, each on its own line between paragraphs: \
         {marker_list}\n\n\
         Writing approach:\n\
         - Frame as research and curation, never as personal experience you don't have\n\
         - Include specific comparisons and concrete details\n\
         - Acknowledge when information is conflicting or unclear\n\
         - No generic filler\n\
         - End with clear, actionable takeaways\n\n\
         Output only the HTML content (no <html> or <body> tags, just the article content).",
        title = plan.working_title,
        angle = plan.contrarian_angle,
        caveat = plan.caveat,
        marker_list = markers.join(" and "),
    )
}

/// Self-critique prompt. Runs against the conversation that produced
/// the draft, so "the draft you just wrote" resolves naturally.
pub const CRITIQUE_PROMPT: &str = "\
Review the draft you just wrote. Be brutally honest.

Check for:
1. AI PHRASES: any 'dive deep', 'comprehensive', 'landscape', 'embark', 'leverage', etc.?
2. FAKE STUFF: any made-up statistics, fake experiences, or invented sources?
3. FLUFF: any paragraphs that don't add real information?
4. VALUE: does every section teach something specific?
5. TONE: does it sound like a real person researching, or like a corporate blog?
6. CLAIMS: anything presented as fact that should be framed as 'from what I found'?

List specific problems (quote the text), then explain how to fix each.

Format:
## Issues Found
1. [Quote] - Problem

## Fixes
1. How to fix";

/// Rewrite prompt, issued after the critique reply.
pub const REVISE_PROMPT: &str = "\
Rewrite the article, fixing all issues identified.

Final version must:
- Zero AI-sounding phrases
- Zero fake statistics or experiences
- Every paragraph adds real, specific value
- Sounds like a curious person who did research, not an expert or an AI
- Keep the [MEDIA: ...] markers exactly where they belong

Output the complete, improved HTML article. Nothing else.";

/// Stylistic pass prompt. Runs in a fresh context that has only the
/// article text, so the model edits prose it has no memory of writing.
pub fn style_prompt(body: &str) -> String {
    format!(
        "Below is a blog article in HTML. Give it one final editing pass for rhythm and \
         naturalness:\n\
         - Vary sentence and paragraph lengths where the prose feels mechanical\n\
         - Replace any remaining stock phrases with plainer wording\n\
         - Keep every fact, claim, and HTML tag; do not restructure sections\n\
         - Keep every [MEDIA: ...] marker exactly as written\n\n\
         Output only the edited HTML article.\n\n\
         ---\n\n{body}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::plan::PlanSection;
    use crate::types::variation::StyleChoice;

    fn profile() -> VariationProfile {
        VariationProfile {
            persona: StyleChoice::new("tester", "Write as a tester."),
            format: StyleChoice::new("flat", "Keep it flat."),
            tone: StyleChoice::new("dry", "Stay dry."),
            quirks: vec!["One aside.".into()],
        }
    }

    #[test]
    fn test_system_prompt_includes_profile_and_rules() {
        let system = build_system_prompt(&profile());
        assert!(system.contains("NO FABRICATION"));
        assert!(system.contains("Write as a tester."));
        assert!(system.contains("One aside."));
    }

    #[test]
    fn test_draft_prompt_names_both_markers() {
        let plan = Plan {
            working_title: "A Title".into(),
            hook_concept: "hook".into(),
            contrarian_angle: "angle".into(),
            sections: vec![PlanSection {
                header: "One".into(),
                key_point: "point".into(),
                supporting_element: String::new(),
            }],
            caveat: "caveat".into(),
            media_queries: vec!["desk with coffee".into(), "person on laptop".into()],
        };
        let prompt = draft_prompt(&plan);
        assert!(prompt.contains("[MEDIA: desk with coffee]"));
        assert!(prompt.contains("[MEDIA: person on laptop]"));
    }

    #[test]
    fn test_style_prompt_carries_body() {
        let prompt = style_prompt("<p>hello</p>");
        assert!(prompt.contains("<p>hello</p>"));
        assert!(prompt.contains("[MEDIA: ...]"));
    }
}

//! Pulling structured data out of free-form model replies.
//!
//! Even when a reply is supposed to be JSON, models wrap it in code
//! fences or preamble often enough that parsing has to tolerate both.

use serde_json::Value;

/// Result of one extraction attempt, with the failure reason kept so
/// callers can log or surface it.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseAttempt {
    Parsed(Value),
    Unparseable { reason: String },
}

impl ParseAttempt {
    /// The parsed value, discarding the reason.
    pub fn ok(self) -> Option<Value> {
        match self {
            ParseAttempt::Parsed(value) => Some(value),
            ParseAttempt::Unparseable { .. } => None,
        }
    }
}

/// Extract the first JSON object from a model reply.
///
/// Sources tried in priority order: a ```json fenced block, any generic
/// ``` fenced block, then the raw text from the first `{` to the last
/// `}`. The first source that parses wins.
pub fn extract_json(text: &str) -> ParseAttempt {
    let mut last_error: Option<String> = None;

    for candidate in [fenced_block(text, "```json"), fenced_block(text, "```")]
        .into_iter()
        .flatten()
    {
        match serde_json::from_str(candidate.trim()) {
            Ok(value) => return ParseAttempt::Parsed(value),
            Err(e) => last_error = Some(format!("fenced block did not parse: {e}")),
        }
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => {
            match serde_json::from_str(&text[start..=end]) {
                Ok(value) => ParseAttempt::Parsed(value),
                Err(e) => ParseAttempt::Unparseable {
                    reason: last_error.unwrap_or_else(|| format!("raw span did not parse: {e}")),
                },
            }
        }
        _ => ParseAttempt::Unparseable {
            reason: last_error.unwrap_or_else(|| "no JSON object in reply".into()),
        },
    }
}

/// The content between an opening fence marker and the next ```.
fn fenced_block<'a>(text: &'a str, open: &str) -> Option<&'a str> {
    let after_open = &text[text.find(open)? + open.len()..];
    let close = after_open.find("```")?;
    Some(&after_open[..close])
}

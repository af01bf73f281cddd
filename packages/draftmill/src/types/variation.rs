//! Stylistic variation profile for one run.

use serde::{Deserialize, Serialize};

/// One named option on a style axis (persona, format, or tone).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleChoice {
    /// Short name, useful in logs
    pub name: String,

    /// The instruction injected into prompts
    pub instruction: String,
}

impl StyleChoice {
    /// Create a new style choice.
    pub fn new(name: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
        }
    }
}

/// The stylistic controls for one run.
///
/// Chosen once at run start, read-only afterward, and threaded unmodified
/// into every generation stage's instructions. Selection is independent
/// per run; there is deliberately no cross-run memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariationProfile {
    /// Voice/role the writer assumes
    pub persona: StyleChoice,

    /// Structural instruction
    pub format: StyleChoice,

    /// Tone modifier
    pub tone: StyleChoice,

    /// Small set of "human quirk" directives
    pub quirks: Vec<String>,
}

impl VariationProfile {
    /// Render the profile as a prompt block.
    pub fn prompt_block(&self) -> String {
        let quirks = self
            .quirks
            .iter()
            .map(|q| format!("- {}", q))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "## This Run's Voice\n\
             Persona: {}\n\
             Structure: {}\n\
             Tone: {}\n\
             \n\
             ## Human Touches (work these in naturally)\n\
             {}",
            self.persona.instruction, self.format.instruction, self.tone.instruction, quirks
        )
    }
}

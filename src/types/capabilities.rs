//! Gateway capability introspection

use serde::{Deserialize, Serialize};

/// What a gateway (or a single provider) can do.
///
/// Built from whichever providers were actually configured at startup;
/// a capability is only reported when at least one registered provider
/// carries it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Chat-style text generation.
    pub chat: bool,
    /// Constrained-JSON output mode.
    pub json_mode: bool,
    /// Text embeddings (powers the semantic cache).
    pub embeddings: bool,
    /// Multimodal image analysis.
    pub vision: bool,
}

impl Capabilities {
    /// Capabilities of a plain text provider with a JSON-mode mechanism.
    pub fn chat_with_json() -> Self {
        Self {
            chat: true,
            json_mode: true,
            ..Self::default()
        }
    }

    /// Merge: a capability is present if either side has it.
    pub fn union(self, other: Self) -> Self {
        Self {
            chat: self.chat || other.chat,
            json_mode: self.json_mode || other.json_mode,
            embeddings: self.embeddings || other.embeddings,
            vision: self.vision || other.vision,
        }
    }
}

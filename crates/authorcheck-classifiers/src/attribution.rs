//! Human/AI attribution of classifier labels

use serde::{Deserialize, Serialize};

/// Label fragments that mark a label as machine-written.
///
/// Matched case-sensitively as substrings against whatever label the model
/// emits. The detector's vocabulary is `Human` / `ChatGPT`; a model with a
/// different vocabulary is silently mapped to `Human`.
pub const AI_LABEL_MARKERS: [&str; 2] = ["ChatGPT", "AI"];

/// Which kind of writer a label is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribution {
    /// AI-attributed
    Ai,
    /// Human-attributed
    Human,
}

impl Attribution {
    pub fn from_label(label: &str) -> Self {
        if AI_LABEL_MARKERS.iter().any(|marker| label.contains(marker)) {
            Self::Ai
        } else {
            Self::Human
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ai => "AI-attributed",
            Self::Human => "Human-attributed",
        }
    }
}

impl std::fmt::Display for Attribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detector_vocabulary() {
        assert_eq!(Attribution::from_label("ChatGPT"), Attribution::Ai);
        assert_eq!(Attribution::from_label("Human"), Attribution::Human);
    }

    #[test]
    fn test_substring_and_case() {
        assert_eq!(Attribution::from_label("AI-generated"), Attribution::Ai);
        assert_eq!(Attribution::from_label("LABEL_ChatGPT"), Attribution::Ai);
        // Case-sensitive: "ai" inside ordinary words does not count
        assert_eq!(Attribution::from_label("chatgpt"), Attribution::Human);
        assert_eq!(Attribution::from_label("maintainer"), Attribution::Human);
        assert_eq!(Attribution::from_label(""), Attribution::Human);
    }

    #[test]
    fn test_display() {
        assert_eq!(Attribution::Ai.to_string(), "AI-attributed");
        assert_eq!(Attribution::Human.to_string(), "Human-attributed");
    }
}

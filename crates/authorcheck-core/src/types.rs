//! Request and score types

use serde::{Deserialize, Serialize};

/// A single piece of text submitted for analysis.
///
/// The text may be empty or whitespace-only; validation happens in the
/// interaction layer, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub text: String,
}

impl ClassificationRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// True when the text has no non-whitespace characters
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// One entry of a classifier's ranked output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Sort entries by descending score. NaN scores sink to the end.
pub fn rank_descending(scores: &mut [LabelScore]) {
    scores.sort_by(|a, b| match (a.score.is_nan(), b.score.is_nan()) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
        (false, false) => b.score.total_cmp(&a.score),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(ClassificationRequest::new("").is_blank());
        assert!(ClassificationRequest::new(" \n\t ").is_blank());
        assert!(!ClassificationRequest::new("  hi ").is_blank());
    }

    #[test]
    fn test_rank_descending() {
        let mut scores = vec![
            LabelScore::new("Human", 0.2),
            LabelScore::new("broken", f32::NAN),
            LabelScore::new("ChatGPT", 0.8),
        ];
        rank_descending(&mut scores);
        assert_eq!(scores[0].label, "ChatGPT");
        assert_eq!(scores[1].label, "Human");
        assert_eq!(scores[2].label, "broken");
    }
}

//! Turns interaction outcomes into what the page displays.

use crate::interaction::{Outcome, Verdict};
use authorcheck_classifiers::Attribution;
use authorcheck_core::LabelScore;
use serde::Serialize;

pub const RESULT_HEADING: &str = "🎉 Here's the result!";
pub const AI_VERDICT: &str = "I think a friendly robot wrote this! 🤖";
pub const HUMAN_VERDICT: &str = "This sounds like a human wrote it! 🧑‍🎨";
pub const EMPTY_INPUT_MESSAGE: &str = "Oopsie! Please write something in the text box first. 😅";

/// Sidebar copy describing the app and its model
pub const ABOUT_TEXT: &str = "Hello there! This little app uses a smart AI to guess if text is from a human or another AI. Just pop your text in the box and see the magic happen! 💖";
pub const MODEL_TYPE: &str = "A special text-classifying robot! 🤖";
pub const MODEL_BASED_ON: &str = "The super-smart RoBERTa~";

/// Page-facing rendering of an [`Outcome`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OutcomeView {
    Idle,
    Cleared { input: String },
    ValidationError { message: String },
    Classified(AnalysisView),
}

/// Styling of the verdict banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisView {
    pub heading: &'static str,
    pub verdict: &'static str,
    pub tone: Tone,
    pub attribution: Attribution,
    /// Progress bar fill, 0.0-1.0
    pub progress: f32,
    /// e.g. "Confidence: 87%"
    pub progress_text: String,
    pub details: DetailsView,
}

/// The expandable "nerdy details" panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsView {
    pub top_guess: String,
    /// e.g. "87.12%"
    pub confidence_score: String,
    pub results: Vec<LabelScore>,
    pub model: Option<String>,
    pub latency_ms: f64,
}

pub fn present(outcome: &Outcome) -> OutcomeView {
    match outcome {
        Outcome::Idle => OutcomeView::Idle,
        Outcome::Cleared => OutcomeView::Cleared {
            input: String::new(),
        },
        Outcome::ValidationError(_) => OutcomeView::ValidationError {
            message: EMPTY_INPUT_MESSAGE.to_string(),
        },
        Outcome::Classified(verdict) => OutcomeView::Classified(present_verdict(verdict)),
    }
}

fn present_verdict(verdict: &Verdict) -> AnalysisView {
    let (text, tone) = match verdict.attribution {
        Attribution::Ai => (AI_VERDICT, Tone::Error),
        Attribution::Human => (HUMAN_VERDICT, Tone::Success),
    };

    AnalysisView {
        heading: RESULT_HEADING,
        verdict: text,
        tone,
        attribution: verdict.attribution,
        progress: verdict.score,
        progress_text: format!("Confidence: {}", format_percent(verdict.score, 0)),
        details: DetailsView {
            top_guess: verdict.label.clone(),
            confidence_score: format_percent(verdict.score, 2),
            results: verdict.ranked.clone(),
            model: verdict.model.clone(),
            latency_ms: verdict.latency_us as f64 / 1000.0,
        },
    }
}

/// Format a 0-1 fraction as a percentage with `decimals` places
pub fn format_percent(fraction: f32, decimals: usize) -> String {
    format!("{:.*}%", decimals, f64::from(fraction) * 100.0)
}

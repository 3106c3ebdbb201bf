//! Interaction handling: one input string plus one trigger in, one outcome out.
//!
//! Nothing here renders anything; [`crate::presentation`] turns an
//! [`Outcome`] into what the page shows.

use authorcheck_classifiers::{Attribution, ClassificationResult, SharedClassifier};
use authorcheck_core::{ClassificationRequest, Error, LabelScore, Result};
use serde::{Deserialize, Serialize};

/// Message carried by the validation outcome for blank submissions
pub const EMPTY_INPUT: &str = "empty input";

/// What the user did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// "Analyze" was pressed
    Submit,
    /// "Clear" was pressed
    Clear,
    /// Page rendered without a button press
    #[default]
    None,
}

/// Result of one interaction
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing to show below the input area
    Idle,
    /// Input reset to empty
    Cleared,
    /// Submit with blank input
    ValidationError(String),
    /// The model's verdict
    Classified(Verdict),
}

impl Outcome {
    /// Metrics label for the outcome
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Cleared => "cleared",
            Self::ValidationError(_) => "validation_error",
            Self::Classified(_) => "classified",
        }
    }
}

/// A classification mapped to a human/AI attribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub label: String,
    pub score: f32,
    pub attribution: Attribution,
    pub ranked: Vec<LabelScore>,
    pub model: Option<String>,
    pub latency_us: u64,
}

impl Verdict {
    /// Scores are clamped into [0, 1]; a NaN score means the model misbehaved.
    pub fn from_result(result: ClassificationResult) -> Result<Self> {
        if result.score.is_nan() {
            return Err(Error::inference(format!(
                "Model returned a NaN score for label '{}'",
                result.label
            )));
        }

        Ok(Self {
            attribution: Attribution::from_label(&result.label),
            score: result.score.clamp(0.0, 1.0),
            label: result.label,
            ranked: result.ranked,
            model: result.model,
            latency_us: result.latency_us,
        })
    }
}

/// Decide the outcome of one interaction.
///
/// Only a submit with non-blank text touches the classifier; it is fetched
/// (loading it on first use) and invoked exactly once with the text as
/// typed. Load and inference errors propagate to the caller.
pub async fn handle(classifier: &SharedClassifier, input: &str, trigger: Trigger) -> Result<Outcome> {
    let outcome = match trigger {
        Trigger::None => Outcome::Idle,
        Trigger::Clear => Outcome::Cleared,
        Trigger::Submit => {
            let request = ClassificationRequest::new(input);
            if request.is_blank() {
                tracing::debug!("Rejecting blank submission");
                Outcome::ValidationError(EMPTY_INPUT.to_string())
            } else {
                let handle = classifier.get().await?;
                let result = handle.classify(&request.text).await?;
                let verdict = Verdict::from_result(result)?;

                tracing::info!(
                    label = %verdict.label,
                    score = verdict.score,
                    attribution = %verdict.attribution,
                    chars = request.text.chars().count(),
                    latency_us = verdict.latency_us,
                    "Text classified"
                );
                Outcome::Classified(verdict)
            }
        }
    };

    metrics::counter!("authorcheck_requests_total", "outcome" => outcome.kind()).increment(1);
    Ok(outcome)
}

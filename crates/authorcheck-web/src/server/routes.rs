use crate::interaction::{self, Trigger};
use crate::presentation::{present, OutcomeView, ABOUT_TEXT, MODEL_BASED_ON, MODEL_TYPE};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Health
// ============================================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================================
// Analysis
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub trigger: Trigger,
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<OutcomeView>, ApiError> {
    let outcome = interaction::handle(&state.classifier, &req.text, req.trigger).await?;
    Ok(Json(present(&outcome)))
}

/// Error returned by API handlers
#[derive(Debug)]
pub struct ApiError(pub authorcheck_core::Error);

impl From<authorcheck_core::Error> for ApiError {
    fn from(err: authorcheck_core::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            authorcheck_core::Error::ModelLoad(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        metrics::counter!("authorcheck_errors_total", "kind" => self.0.kind()).increment(1);
        tracing::error!(kind = self.0.kind(), error = %self.0, "Analysis failed");

        (
            status,
            Json(serde_json::json!({
                "error": self.0.to_string(),
                "kind": self.0.kind(),
            })),
        )
            .into_response()
    }
}

// ============================================================================
// Model info (sidebar)
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub architecture: &'static str,
    pub device: String,
    pub max_length: usize,
    pub loaded: bool,
    pub load_count: usize,
    /// Sidebar copy
    pub about: &'static str,
    pub model_type: &'static str,
    pub based_on: &'static str,
}

pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfo> {
    let config = state.classifier.config();
    Json(ModelInfo {
        id: config.model_id(),
        name: config.name.clone(),
        description: config.description.clone(),
        architecture: config.architecture.as_str(),
        device: config.inference.device.clone(),
        max_length: config.inference.max_length,
        loaded: state.classifier.is_loaded(),
        load_count: state.classifier.load_count(),
        about: ABOUT_TEXT,
        model_type: MODEL_TYPE,
        based_on: MODEL_BASED_ON,
    })
}

// ============================================================================
// Prometheus metrics
// ============================================================================

pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics recorder not installed").into_response(),
    }
}

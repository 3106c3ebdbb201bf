//! HTTP-level tests for the authorcheck web shell
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`, backed
//! by scripted loaders so no model is downloaded.

use async_trait::async_trait;
use authorcheck_classifiers::{ClassificationResult, Classifier, ModelConfig, ModelLoader};
use authorcheck_core::{Error, LabelScore, Result};
use authorcheck_web::{build_app, AppConfig, AppState};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

struct FixedClassifier {
    scores: Vec<LabelScore>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ClassificationResult::from_scores(self.scores.clone())
            .map(|r| r.with_model("fixed"))
            .ok_or_else(|| Error::inference("no scores"))
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct BrokenClassifier;

#[async_trait]
impl Classifier for BrokenClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
        Err(Error::inference("tensor shape mismatch"))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

#[derive(Clone, Copy)]
enum Behavior {
    Scores(f32, f32),
    FailLoad,
    FailInference,
}

struct TestLoader {
    behavior: Behavior,
    loads: AtomicUsize,
    calls: Arc<AtomicUsize>,
}

impl TestLoader {
    fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            loads: AtomicUsize::new(0),
            calls: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelLoader for TestLoader {
    async fn load_classifier(&self, _config: &ModelConfig) -> Result<Box<dyn Classifier>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Scores(human, chatgpt) => Ok(Box::new(FixedClassifier {
                scores: vec![
                    LabelScore::new("Human", human),
                    LabelScore::new("ChatGPT", chatgpt),
                ],
                calls: Arc::clone(&self.calls),
            })),
            Behavior::FailLoad => Err(Error::model_load("weights not found")),
            Behavior::FailInference => Ok(Box::new(BrokenClassifier)),
        }
    }
}

fn app_with(loader: Arc<TestLoader>) -> Router {
    build_app(AppState::new(AppConfig::default(), loader))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn analyze(app: &Router, text: &str, trigger: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "text": text, "trigger": trigger }).to_string(),
        ))
        .unwrap();

    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_index_page_is_served() {
    let app = app_with(TestLoader::new(Behavior::Scores(0.5, 0.5)));

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("AI vs Human Writer"));
}

#[tokio::test]
async fn test_unknown_route_serves_page() {
    let app = app_with(TestLoader::new(Behavior::Scores(0.5, 0.5)));

    let request = Request::builder().uri("/about").body(Body::empty()).unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("AI vs Human Writer"));
}

#[tokio::test]
async fn test_unknown_asset_is_404() {
    let app = app_with(TestLoader::new(Behavior::Scores(0.5, 0.5)));

    let request = Request::builder()
        .uri("/no-such-file.png")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let app = app_with(TestLoader::new(Behavior::Scores(0.5, 0.5)));

    let (status, body) = get_json(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_empty_submit_shows_validation_message() {
    let loader = TestLoader::new(Behavior::Scores(0.5, 0.5));
    let app = app_with(loader.clone());

    let (status, body) = analyze(&app, "   \n", "submit").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "validation_error");
    assert_eq!(
        body["message"],
        "Oopsie! Please write something in the text box first. 😅"
    );
    assert_eq!(loader.loads(), 0);
}

#[tokio::test]
async fn test_clear_resets_input_without_loading() {
    let loader = TestLoader::new(Behavior::Scores(0.5, 0.5));
    let app = app_with(loader.clone());

    let (status, body) = analyze(&app, "some draft", "clear").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "cleared");
    assert_eq!(body["input"], "");
    assert_eq!(loader.loads(), 0);
    assert_eq!(loader.calls(), 0);
}

#[tokio::test]
async fn test_missing_trigger_is_idle() {
    let loader = TestLoader::new(Behavior::Scores(0.5, 0.5));
    let app = app_with(loader.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"text":"hello"}"#))
        .unwrap();
    let (status, body) = send(&app, request).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "idle");
    assert_eq!(loader.calls(), 0);
}

#[tokio::test]
async fn test_submit_ai_text() {
    let loader = TestLoader::new(Behavior::Scores(0.1288, 0.8712));
    let app = app_with(loader.clone());

    let (status, body) = analyze(&app, "As an AI language model, I can help.", "submit").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "classified");
    assert_eq!(body["heading"], "🎉 Here's the result!");
    assert_eq!(body["verdict"], "I think a friendly robot wrote this! 🤖");
    assert_eq!(body["tone"], "error");
    assert_eq!(body["attribution"], "ai");
    assert_eq!(body["progress_text"], "Confidence: 87%");
    assert_eq!(body["details"]["top_guess"], "ChatGPT");
    assert_eq!(body["details"]["confidence_score"], "87.12%");
    assert_eq!(body["details"]["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["details"]["model"], "fixed");
    assert_eq!(loader.calls(), 1);
}

#[tokio::test]
async fn test_submit_human_text() {
    let app = app_with(TestLoader::new(Behavior::Scores(0.92, 0.08)));

    let (status, body) = analyze(&app, "went to the shop, forgot the milk again", "submit").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verdict"], "This sounds like a human wrote it! 🧑‍🎨");
    assert_eq!(body["tone"], "success");
    assert_eq!(body["attribution"], "human");
    assert_eq!(body["progress_text"], "Confidence: 92%");
}

#[tokio::test]
async fn test_model_loads_once_across_requests() {
    let loader = TestLoader::new(Behavior::Scores(0.3, 0.7));
    let app = app_with(loader.clone());

    let (_, info) = get_json(&app, "/api/model").await;
    assert_eq!(info["loaded"], false);
    assert_eq!(info["load_count"], 0);

    for text in ["first", "second", "third"] {
        let (status, _) = analyze(&app, text, "submit").await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, info) = get_json(&app, "/api/model").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["loaded"], true);
    assert_eq!(info["load_count"], 1);
    assert_eq!(info["id"], "Hello-SimpleAI/chatgpt-detector-roberta");
    assert!(info["about"].as_str().unwrap().starts_with("Hello there!"));
    assert_eq!(info["model_type"], "A special text-classifying robot! 🤖");
    assert_eq!(info["based_on"], "The super-smart RoBERTa~");
    assert_eq!(loader.loads(), 1);
    assert_eq!(loader.calls(), 3);
}

#[tokio::test]
async fn test_load_failure_is_503_and_retried() {
    let loader = TestLoader::new(Behavior::FailLoad);
    let app = app_with(loader.clone());

    let (status, body) = analyze(&app, "hello", "submit").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "model_load");
    assert!(body["error"].as_str().unwrap().contains("weights not found"));

    let (status, _) = analyze(&app, "hello again", "submit").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(loader.loads(), 2);
}

#[tokio::test]
async fn test_inference_failure_is_500() {
    let app = app_with(TestLoader::new(Behavior::FailInference));

    let (status, body) = analyze(&app, "hello", "submit").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "inference");
}

#[tokio::test]
async fn test_metrics_without_recorder_is_404() {
    let app = app_with(TestLoader::new(Behavior::Scores(0.5, 0.5)));

    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn allow_origin_for(app: &Router, origin: &str) -> Option<String> {
    let request = Request::builder()
        .uri("/api/health")
        .header(header::ORIGIN, origin)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .map(|v| v.to_str().unwrap().to_string())
}

#[tokio::test]
async fn test_cors_allows_page_origin() {
    let app = app_with(TestLoader::new(Behavior::Scores(0.5, 0.5)));

    assert_eq!(
        allow_origin_for(&app, "http://localhost:8501").await,
        Some("http://localhost:8501".to_string())
    );
}

#[tokio::test]
async fn test_cors_rejects_unrelated_origin() {
    let app = app_with(TestLoader::new(Behavior::Scores(0.5, 0.5)));

    assert_eq!(allow_origin_for(&app, "https://elsewhere.example").await, None);
}

#[tokio::test]
async fn test_unknown_trigger_is_rejected() {
    let loader = TestLoader::new(Behavior::Scores(0.5, 0.5));
    let app = app_with(loader.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"text":"hello","trigger":"explode"}"#))
        .unwrap();
    let (status, _) = send(&app, request).await;

    assert!(status.is_client_error());
    assert_eq!(loader.calls(), 0);
}

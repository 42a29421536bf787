// Integration tests for the Gemini provider client
//
// A local axum server stands in for the generateContent endpoint.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use emotion_ai::provider::{AudioClassifier, GeminiClassifier, ProviderConfig, ANALYSIS_PROMPT};
use emotion_ai::{normalize, Emotion, ProviderError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(String, HashMap<String, String>, Value)>>>,
}

async fn generate_content(
    State(captured): State<Captured>,
    Path(model_call): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    captured
        .requests
        .lock()
        .unwrap()
        .push((model_call.clone(), query, body));

    if model_call.starts_with("broken-model") {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": {"message": "model unavailable"}})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "text": "```json\n{\"primary_emotion\": \"shocked\", \"confidence\": 0.66}\n```\n"
                    }]
                }
            }]
        })),
    )
}

async fn spawn_mock() -> (String, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .route("/v1beta/models/:model_call", post(generate_content))
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), captured)
}

fn config_for(base_url: &str, model: &str) -> ProviderConfig {
    ProviderConfig {
        api_key: Some("test-key".to_string()),
        model: model.to_string(),
        base_url: base_url.to_string(),
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn test_classify_sends_prompt_and_audio() {
    let (base_url, captured) = spawn_mock().await;
    let classifier = GeminiClassifier::new(&config_for(&base_url, "gemini-test")).unwrap();

    let text = classifier.classify(ANALYSIS_PROMPT, b"RIFF").await.unwrap();
    assert!(text.starts_with("```json"));
    assert!(text.ends_with("```"));

    let result = normalize(&text).into_result();
    assert_eq!(result.emotion, Emotion::Surprised);
    assert_eq!(result.confidence, 0.66);

    let requests = captured.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);

    let (model_call, query, body) = &requests[0];
    assert_eq!(model_call, "gemini-test:generateContent");
    assert_eq!(query.get("key").map(String::as_str), Some("test-key"));
    assert_eq!(body["contents"][0]["parts"][0]["text"], ANALYSIS_PROMPT);
    assert_eq!(
        body["contents"][0]["parts"][1]["inline_data"]["mime_type"],
        "audio/wav"
    );
    assert_eq!(body["contents"][0]["parts"][1]["inline_data"]["data"], "UklGRg==");
}

#[tokio::test]
async fn test_http_error_status_is_reported() {
    let (base_url, _captured) = spawn_mock().await;
    let classifier = GeminiClassifier::new(&config_for(&base_url, "broken-model")).unwrap();

    let err = classifier.classify(ANALYSIS_PROMPT, b"RIFF").await.unwrap_err();
    match err {
        ProviderError::Status { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("model unavailable"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_unreachable_provider_is_http_error() {
    // Bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let classifier =
        GeminiClassifier::new(&config_for(&format!("http://{}", addr), "gemini-test")).unwrap();

    let err = classifier.classify(ANALYSIS_PROMPT, b"RIFF").await.unwrap_err();
    assert!(matches!(err, ProviderError::Http(_)));
}

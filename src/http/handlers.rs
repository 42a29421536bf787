use super::state::AppState;
use crate::audio::{decode_base64_audio, WavInfo};
use crate::emotion::{normalize, EmotionResult, Normalized};
use crate::provider::{classify_with_timeout, ANALYSIS_PROMPT};
use crate::session::{SessionSnapshot, DEFAULT_SESSION_ID};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body of POST /api/analyze-chunk
///
/// Fields are kept loose so that a wrong type maps to the documented error
/// instead of a generic extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeChunkRequest {
    /// Base64 WAV or `data:audio/wav;base64,...`
    ///
    /// `Some(Value::Null)` when the key is sent as `null`.
    #[serde(default, deserialize_with = "present_value")]
    pub audio: Option<Value>,

    /// Defaults to "default"
    pub session_id: Option<Value>,
}

/// Keep an explicit `null` distinct from a missing key
fn present_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct EndSessionRequest {
    pub session_id: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub gemini_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub configured: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Parse a JSON body, treating anything unparsable as absent
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Option<T> {
    serde_json::from_slice(body).ok()
}

fn session_id_from(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        None | Some(Value::Null) => DEFAULT_SESSION_ID.to_string(),
        Some(other) => other.to_string(),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            gemini_configured: state.is_provider_configured(),
        }),
    )
}

/// GET /api/check-status
pub async fn check_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatusResponse {
        configured: state.is_provider_configured(),
    })
}

/// POST /api/analyze-chunk
/// Classify one audio clip and record the result in the caller's session
pub async fn analyze_chunk(State(state): State<AppState>, body: Bytes) -> Response {
    let req: AnalyzeChunkRequest = match parse_body(&body) {
        Some(req) => req,
        None => return error_response(StatusCode::BAD_REQUEST, "No audio data provided"),
    };

    let Some(audio) = req.audio else {
        return error_response(StatusCode::BAD_REQUEST, "No audio data provided");
    };
    let session_id = session_id_from(req.session_id);

    let Some(classifier) = state.classifier.as_ref() else {
        error!("Gemini API key not configured");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "API key not configured");
    };

    let audio_bytes = match audio.as_str().map(decode_base64_audio) {
        Some(Ok(bytes)) => bytes,
        Some(Err(e)) => {
            warn!("Invalid audio format: {}", e);
            return error_response(StatusCode::BAD_REQUEST, "Invalid audio data format");
        }
        None => {
            warn!("Invalid audio format: audio is not a string");
            return error_response(StatusCode::BAD_REQUEST, "Invalid audio data format");
        }
    };

    match WavInfo::probe(&audio_bytes) {
        Some(wav) => info!(
            "Received audio: {} bytes, {:.1}s, {}Hz, {}ch, {}-bit (session={})",
            audio_bytes.len(),
            wav.duration_seconds,
            wav.sample_rate,
            wav.channels,
            wav.bits_per_sample,
            session_id
        ),
        None => info!(
            "Received audio: {} bytes (session={})",
            audio_bytes.len(),
            session_id
        ),
    }

    let text = match classify_with_timeout(
        classifier.as_ref(),
        ANALYSIS_PROMPT,
        &audio_bytes,
        state.provider_timeout,
    )
    .await
    {
        Ok(text) => text,
        Err(e) => {
            error!("{} provider error: {}", classifier.name(), e);
            return Json(EmotionResult::fallback_with_error(e)).into_response();
        }
    };

    let result = match normalize(&text) {
        Normalized::Parsed(result) => result,
        Normalized::Fallback => {
            warn!("Could not parse JSON from provider response; returning default result");
            debug!("Unparsed provider response: {}", text);
            return Json(EmotionResult::fallback()).into_response();
        }
    };

    state.sessions.record_result(&session_id, result.clone());

    info!(
        "Emotion detected: {} (conf={:.2}) for session {}",
        result.emotion, result.confidence, session_id
    );

    Json(result).into_response()
}

/// POST /api/end-session
/// Drop a session's history
pub async fn end_session(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let req: EndSessionRequest = parse_body(&body).unwrap_or_default();
    let session_id = session_id_from(req.session_id);

    if !state.sessions.end_session(&session_id) {
        debug!("End requested for unknown session {}", session_id);
    }

    Json(MessageResponse {
        message: "Session ended".to_string(),
    })
}

/// GET /api/sessions/:session_id
/// Current history of a session
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.sessions.snapshot(&session_id) {
        Some(snapshot) => Json::<SessionSnapshot>(snapshot).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("Session {} not found", session_id),
        ),
    }
}

/// GET|POST /admin/cleanup
/// Sweep idle sessions now; safe to call from an external cron
pub async fn admin_cleanup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(expected) = state.admin_token.as_deref() {
        let provided = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .or_else(|| params.get("token").map(String::as_str));

        let authorized = provided
            .map(|p| p.strip_prefix("Bearer ").unwrap_or(p))
            .is_some_and(|p| p == expected);

        if !authorized {
            warn!("Rejected unauthorized cleanup request");
            return error_response(StatusCode::UNAUTHORIZED, "unauthorized");
        }
    }

    Json(state.cleanup.run_once(Utc::now())).into_response()
}

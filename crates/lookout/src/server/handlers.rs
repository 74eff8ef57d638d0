//! Route handlers.

use super::error::ApiError;
use super::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use lookout_core::{AnswerFailure, Question};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider: String,
    pub configured: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let qa = state.lookout.qa();
    Json(HealthResponse {
        status: "ok",
        provider: qa.provider_name().to_string(),
        configured: qa.is_configured(),
    })
}

/// Body of `POST /ai/question`.
///
/// `detections` holds detector records in any shape the normalizer accepts.
/// It is optional in the schema so that "not run" can be told apart from
/// "ran and found nothing" (`[]`).
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    #[serde(default)]
    pub detections: Option<Vec<Value>>,
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct QuestionResponse {
    pub answer: String,
    /// Set when `answer` is a configuration message or a raw provider payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

pub async fn ask_question(
    State(state): State<AppState>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let Json(request) = payload?;
    let question = Question::new(request.question.unwrap_or_default())
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let raw = request.detections.ok_or_else(|| {
        ApiError::InvalidRequest("detections are required; run detection first".to_string())
    })?;

    let (detections, report) = state.lookout.normalizer().normalize_with_report(&raw);
    tracing::info!(
        detections = report.kept,
        dropped = report.dropped,
        provider = state.lookout.qa().provider_name(),
        "Answering question"
    );

    let answer = state.lookout.ask(&detections, &question).await;
    let error = answer.failure().map(AnswerFailure::kind);
    let answer = answer.into_reply().map_err(ApiError::Upstream)?;
    Ok(Json(QuestionResponse { answer, error }))
}

/// Body of `POST /detections/normalize`.
#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub boxes: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub detections: lookout_core::DetectionSet,
    pub dropped: usize,
}

pub async fn normalize_detections(
    State(state): State<AppState>,
    payload: Result<Json<NormalizeRequest>, JsonRejection>,
) -> Result<Json<NormalizeResponse>, ApiError> {
    let Json(request) = payload?;
    let (detections, report) = state
        .lookout
        .normalizer()
        .normalize_with_report(&request.boxes);
    Ok(Json(NormalizeResponse {
        detections,
        dropped: report.dropped,
    }))
}

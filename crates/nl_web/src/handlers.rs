use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nl_core::{NewsletterReport, NewsletterRequest, Tone};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ToneInfo {
    pub key: Tone,
    pub label: &'static str,
    pub description: &'static str,
}

pub enum ApiError {
    BadRequest(String),
    /// Details stay in the server log; clients only learn that the run failed.
    Generation,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Generation => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "newsletter generation failed" })),
            )
                .into_response(),
        }
    }
}

pub async fn list_tones() -> Json<Vec<ToneInfo>> {
    Json(
        Tone::ALL
            .into_iter()
            .map(|tone| ToneInfo {
                key: tone,
                label: tone.label(),
                description: tone.description(),
            })
            .collect(),
    )
}

pub async fn create_newsletter(
    State(state): State<AppState>,
    payload: Result<Json<NewsletterRequest>, JsonRejection>,
) -> Result<Json<NewsletterReport>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    match state.manager.run(&request).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            error!("❌ Newsletter run for '{}' failed: {}", request.topic, e);
            Err(ApiError::Generation)
        }
    }
}

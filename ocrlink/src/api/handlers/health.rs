use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

/// `GET /`
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Liveness probe", body = String, content_type = "text/plain"),
    )
)]
pub async fn hello() -> &'static str {
    "Hello, World!"
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub ocr: OcrStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct OcrStatus {
    pub status: String,
    pub languages: String,
}

/// `GET /health`
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let recognizer = state.recognition.recognizer();

    let ocr_status = OcrStatus {
        status: if recognizer.is_available() {
            "available"
        } else {
            "unavailable"
        }
        .to_string(),
        languages: recognizer.languages().to_string(),
    };

    Json(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ocr: ocr_status,
    })
}

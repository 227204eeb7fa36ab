use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ocrlink API",
        version = "0.1.0",
        description = "Downloads an image by URL and returns the text found in it.",
    ),
    paths(
        handlers::health::hello,
        handlers::health::health_check,
        handlers::recognize::recognize,
    ),
    components(schemas(
        handlers::recognize::RecognizeRequest,
        handlers::recognize::ErrorBody,
        handlers::health::HealthData,
        handlers::health::OcrStatus,
    )),
    tags(
        (name = "health", description = "Liveness and health checks"),
        (name = "ocr", description = "Text recognition from image URLs"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}

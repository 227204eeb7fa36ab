use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub const MISSING_IMAGE_URL: &str = "Please provide an image URL";
pub const FAILED_TO_SAVE: &str = "Failed to save image";
pub const FAILED_TO_PROCESS: &str = "Failed to process image";

#[derive(Error, Debug)]
pub enum OcrLinkError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Storage error: {0}")]
    Store(String),

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("OCR unavailable: {0}")]
    RecognitionUnavailable(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl OcrLinkError {
    /// Status and client-facing message. Internal causes never leave the process.
    pub fn public_parts(&self) -> (StatusCode, String) {
        match self {
            OcrLinkError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            OcrLinkError::InvalidBody(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            OcrLinkError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone()),
            OcrLinkError::Store(_) | OcrLinkError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, FAILED_TO_SAVE.to_string())
            }
            OcrLinkError::Fetch(_)
            | OcrLinkError::UrlParse(_)
            | OcrLinkError::Recognition(_)
            | OcrLinkError::RecognitionUnavailable(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                FAILED_TO_PROCESS.to_string(),
            ),
            OcrLinkError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for OcrLinkError {
    fn into_response(self) -> Response {
        let (status, message) = self.public_parts();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, OcrLinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_validation_maps_to_bad_request() {
        let response = OcrLinkError::Validation(MISSING_IMAGE_URL.to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Please provide an image URL" })
        );
    }

    #[tokio::test]
    async fn test_store_failure_hides_cause() {
        let response =
            OcrLinkError::Store("disk full at /var/lib/uploads".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Failed to save image" })
        );
    }

    #[test]
    fn test_fetch_and_recognition_share_public_message() {
        let fetch = OcrLinkError::Fetch("connection refused".to_string()).public_parts();
        let recognition = OcrLinkError::Recognition("bad pix".to_string()).public_parts();
        let unavailable = OcrLinkError::RecognitionUnavailable("no tessdata".to_string()).public_parts();

        assert_eq!(fetch, recognition);
        assert_eq!(fetch, unavailable);
        assert_eq!(fetch.1, FAILED_TO_PROCESS);
    }
}

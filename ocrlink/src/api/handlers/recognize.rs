use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::extractors::AppJson;
use crate::api::state::AppState;
use crate::error::{OcrLinkError, Result, MISSING_IMAGE_URL};

#[derive(Debug, Default, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecognizeRequest {
    /// Absolute http(s) URL of the image to read.
    ///
    /// Any JSON value is accepted here; falsy ones count as missing and
    /// anything else goes on to the download.
    #[schema(value_type = Option<String>, example = "https://example.com/hello.png")]
    pub image_url: Option<Value>,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Please provide an image URL")]
    pub error: String,
}

/// `POST /recognize`
#[utoipa::path(
    post,
    path = "/recognize",
    tag = "ocr",
    request_body = RecognizeRequest,
    responses(
        (status = 200, description = "Recognized text", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing image URL or malformed body", body = ErrorBody),
        (status = 500, description = "Image could not be saved or processed", body = ErrorBody),
    )
)]
pub async fn recognize(
    State(state): State<AppState>,
    AppJson(req): AppJson<RecognizeRequest>,
) -> Result<String> {
    let image_url = match req.image_url.filter(is_truthy) {
        Some(Value::String(url)) => url,
        Some(other) => other.to_string(),
        None => return Err(OcrLinkError::Validation(MISSING_IMAGE_URL.to_string())),
    };

    tracing::info!(image_url = %image_url, "Recognition requested");

    // Detached so cleanup still runs if the client goes away mid-request.
    let service = state.recognition.clone();
    tokio::spawn(async move { service.recognize_url(&image_url).await })
        .await
        .map_err(|e| OcrLinkError::Internal(format!("Recognition task failed: {e}")))?
}

/// `null`, `false`, `0` and `""` count as no URL at all.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_falsy_values_count_as_missing() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&value), "{value} should be falsy");
        }
    }

    #[test]
    fn test_other_values_reach_the_download() {
        for value in [json!("  "), json!("x"), json!(123), json!(true), json!([]), json!({})] {
            assert!(is_truthy(&value), "{value} should be truthy");
        }
    }
}

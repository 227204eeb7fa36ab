use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::OcrLinkError;

/// JSON body extractor that treats an absent or non-JSON body as `T::default()`.
///
/// Clients that post nothing, or post form data, get the same validation
/// message as clients that post `{}`.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = OcrLinkError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let declared_json = is_json_content_type(req.headers());

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                OcrLinkError::PayloadTooLarge(rejection.body_text())
            } else {
                OcrLinkError::InvalidBody("Failed to read request body".to_string())
            }
        })?;

        if !declared_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(AppJson(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(AppJson)
            .map_err(map_json_error)
    }
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

fn map_json_error(err: serde_json::Error) -> OcrLinkError {
    use serde_json::error::Category;

    match err.classify() {
        Category::Syntax | Category::Eof => {
            OcrLinkError::InvalidBody(format!("JSON syntax error: {err}"))
        }
        Category::Data | Category::Io => OcrLinkError::InvalidBody(format!("Invalid JSON: {err}")),
    }
}

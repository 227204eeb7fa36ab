// Common test utilities for integration tests
#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use ocrlink::api::{create_router, AppState};
use ocrlink::config::{Config, FetchConfig};
use ocrlink::error::{OcrLinkError, Result};
use ocrlink::fetch::ImageFetcher;
use ocrlink::ocr::TextRecognizer;
use ocrlink::services::RecognitionService;
use ocrlink::storage::ScratchStore;

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Stand-in OCR engine: "recognizes" the staged file by returning its bytes.
#[derive(Default)]
pub struct EchoRecognizer {
    pub fail: bool,
    pub delay: Option<Duration>,
    calls: AtomicUsize,
}

impl EchoRecognizer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextRecognizer for EchoRecognizer {
    async fn recognize(&self, path: &Path) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let bytes = tokio::fs::read(path).await?;
        if self.fail {
            return Err(OcrLinkError::Recognition(
                "simulated engine failure".to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn is_available(&self) -> bool {
        !self.fail
    }

    fn languages(&self) -> &str {
        "eng"
    }
}

pub struct TestApp {
    pub router: Router,
    pub scratch: TempDir,
}

/// Timeouts applied to a `TestApp`'s pipeline.
pub struct Timeouts {
    pub fetch_secs: u64,
    pub recognition: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            fetch_secs: 5,
            recognition: Duration::from_secs(60),
        }
    }
}

impl TestApp {
    pub async fn with_recognizer(recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self::with_timeouts(recognizer, Timeouts::default()).await
    }

    pub async fn with_timeouts(recognizer: Arc<dyn TextRecognizer>, timeouts: Timeouts) -> Self {
        init_test_logger();

        let scratch = tempfile::tempdir().expect("failed to create scratch dir");
        let store = ScratchStore::init(scratch.path())
            .await
            .expect("failed to init scratch store");
        let fetcher = ImageFetcher::new(&FetchConfig {
            timeout_secs: timeouts.fetch_secs,
            ..FetchConfig::default()
        })
        .expect("failed to build fetcher");

        let state = AppState::new(
            Config::default(),
            RecognitionService::new(fetcher, store, recognizer)
                .with_recognition_timeout(timeouts.recognition),
        );

        Self {
            router: create_router(state),
            scratch,
        }
    }

    pub fn scratch_entries(&self) -> Vec<String> {
        std::fs::read_dir(self.scratch.path())
            .expect("scratch dir must exist")
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        self.post_raw(uri, Some("application/json"), body.to_string())
            .await
    }

    pub async fn post_raw(
        &self,
        uri: &str,
        content_type: Option<&str>,
        body: String,
    ) -> Response<Body> {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::from(body)).unwrap())
            .await
            .unwrap()
    }
}

pub async fn body_text(response: Response<Body>) -> (StatusCode, String) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// Parses JSON body from response.
pub async fn body_json(response: Response<Body>) -> (StatusCode, serde_json::Value) {
    let (status, text) = body_text(response).await;
    let json = serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("response body is not JSON ({e}): {text}"));
    (status, json)
}

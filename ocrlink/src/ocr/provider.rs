use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use leptess::LepTess;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::OcrConfig;
use crate::error::{OcrLinkError, Result};

use super::preprocessing::preprocess_image;
use super::recognizer::TextRecognizer;

/// `None` once the engine has been shut down.
type EngineSlot = Arc<Mutex<Option<LepTess>>>;

#[derive(Clone)]
enum OcrBackend {
    Local { tesseract: EngineSlot },
    Unavailable { reason: String },
}

/// Long-lived Tesseract engine shared by all requests.
///
/// Access is serialized through a mutex; each recognition holds the lock for
/// exactly one image.
#[derive(Clone)]
pub struct OcrProvider {
    backend: OcrBackend,
    config: OcrConfig,
}

fn create_tesseract(config: &OcrConfig) -> std::result::Result<LepTess, String> {
    LepTess::new(config.data_path.as_deref(), &config.languages).map_err(|e| e.to_string())
}

impl OcrProvider {
    pub fn new(config: &OcrConfig) -> Self {
        let backend = match create_tesseract(config) {
            Ok(lt) => {
                info!(languages = %config.languages, "Tesseract OCR initialized");
                OcrBackend::Local {
                    tesseract: Arc::new(Mutex::new(Some(lt))),
                }
            }
            Err(e) => {
                let reason = format!("Tesseract not available: {e}");
                warn!("{}", reason);
                OcrBackend::Unavailable { reason }
            }
        };

        Self {
            backend,
            config: config.clone(),
        }
    }

    /// Provider that rejects every recognition with `reason`.
    pub fn unavailable(config: &OcrConfig, reason: impl Into<String>) -> Self {
        Self {
            backend: OcrBackend::Unavailable {
                reason: reason.into(),
            },
            config: config.clone(),
        }
    }

    /// Releases the engine. Waits for an in-flight recognition to finish.
    pub async fn shutdown(&self) {
        if let OcrBackend::Local { tesseract } = &self.backend {
            if tesseract.lock().await.take().is_some() {
                info!("Tesseract OCR engine released");
            }
        }
    }

    /// Recognizes one staged image with the shared engine.
    ///
    /// The engine lock is awaited here, so dropping this future while it waits
    /// leaves nothing behind. Only a recognition that holds the engine
    /// occupies a blocking thread.
    pub async fn ocr(&self, path: &Path) -> Result<String> {
        let tesseract = match &self.backend {
            OcrBackend::Local { tesseract } => Arc::clone(tesseract),
            OcrBackend::Unavailable { reason } => {
                return Err(OcrLinkError::RecognitionUnavailable(reason.clone()));
            }
        };

        let mut slot = tesseract.lock_owned().await;
        if slot.is_none() {
            return Err(engine_released());
        }

        let path = path.to_path_buf();
        let max_dimension = self
            .config
            .preprocess
            .then_some(self.config.max_image_dimension);

        let text = tokio::task::spawn_blocking(move || match slot.as_mut() {
            Some(lt) => run_tesseract(lt, path, max_dimension),
            None => Err(engine_released()),
        })
        .await
        .map_err(|e| OcrLinkError::Recognition(format!("OCR task panicked: {e}")))??;

        Ok(text.trim().to_string())
    }
}

fn engine_released() -> OcrLinkError {
    OcrLinkError::RecognitionUnavailable("OCR engine has been shut down".to_string())
}

fn run_tesseract(lt: &mut LepTess, path: PathBuf, max_dimension: Option<u32>) -> Result<String> {
    match max_dimension {
        Some(max_dimension) => {
            let bytes = std::fs::read(&path).map_err(|e| {
                OcrLinkError::Recognition(format!("Failed to read {}: {e}", path.display()))
            })?;
            let processed = preprocess_image(&bytes, max_dimension)?;
            lt.set_image_from_mem(&processed)
                .map_err(|e| OcrLinkError::Recognition(format!("Failed to set image: {e}")))?;
        }
        None => {
            lt.set_image(&path)
                .map_err(|e| OcrLinkError::Recognition(format!("Failed to set image: {e}")))?;
        }
    }

    lt.get_utf8_text()
        .map_err(|e| OcrLinkError::Recognition(format!("Failed to extract text: {e}")))
}

#[async_trait]
impl TextRecognizer for OcrProvider {
    async fn recognize(&self, path: &Path) -> Result<String> {
        self.ocr(path).await
    }

    fn is_available(&self) -> bool {
        match &self.backend {
            // A busy engine is still there.
            OcrBackend::Local { tesseract } => tesseract
                .try_lock()
                .map(|slot| slot.is_some())
                .unwrap_or(true),
            OcrBackend::Unavailable { .. } => false,
        }
    }

    fn languages(&self) -> &str {
        &self.config.languages
    }
}

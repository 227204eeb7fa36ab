use std::sync::Arc;
use std::time::Duration;

use crate::error::{OcrLinkError, Result};
use crate::fetch::ImageFetcher;
use crate::ocr::TextRecognizer;
use crate::storage::ScratchStore;

const DEFAULT_RECOGNITION_TIMEOUT: Duration = Duration::from_secs(60);

/// Download → stage → recognize → unstage, one image at a time.
#[derive(Clone)]
pub struct RecognitionService {
    fetcher: ImageFetcher,
    store: ScratchStore,
    recognizer: Arc<dyn TextRecognizer>,
    recognition_timeout: Duration,
}

impl RecognitionService {
    pub fn new(
        fetcher: ImageFetcher,
        store: ScratchStore,
        recognizer: Arc<dyn TextRecognizer>,
    ) -> Self {
        Self {
            fetcher,
            store,
            recognizer,
            recognition_timeout: DEFAULT_RECOGNITION_TIMEOUT,
        }
    }

    /// Upper bound for one recognition, waiting for the engine included.
    pub fn with_recognition_timeout(mut self, timeout: Duration) -> Self {
        self.recognition_timeout = timeout;
        self
    }

    pub fn recognizer(&self) -> &dyn TextRecognizer {
        self.recognizer.as_ref()
    }

    /// Runs the full pipeline for one URL.
    ///
    /// The staged file is removed before returning, whatever the recognition
    /// outcome. Removal problems are logged and never replace the result.
    pub async fn recognize_url(&self, image_url: &str) -> Result<String> {
        let image = self.fetcher.fetch(image_url).await?;

        let staged = self
            .store
            .stage(&image.bytes, &image.file_name, image.image_extension())
            .await?;
        drop(image);
        tracing::info!(path = %staged.path().display(), "Image saved");

        let result = match tokio::time::timeout(
            self.recognition_timeout,
            self.recognizer.recognize(staged.path()),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(OcrLinkError::Recognition(format!(
                "OCR operation timed out after {:?}",
                self.recognition_timeout
            ))),
        };
        self.store.unstage(&staged).await;

        let text = result?;
        tracing::info!(chars = text.chars().count(), "Text detected");
        Ok(text)
    }
}

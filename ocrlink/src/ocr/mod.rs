//! OCR (Optical Character Recognition) Module
//!
//! Text extraction for staged image files, backed by a local Tesseract engine
//! through leptess.
//!
//! # Architecture
//!
//! - `TextRecognizer` trait is what the request pipeline depends on
//! - `OcrProvider` implements it with one long-lived `LepTess` handle, created
//!   at startup and released by `OcrProvider::shutdown`
//! - `preprocess_image` optionally normalizes images before recognition
//!
//! # Configuration
//!
//! OCR behavior is controlled via `OcrConfig` (see `config.rs`):
//! - `languages`: Tesseract language codes, `+`-joined (`TESSERACT_LANG`)
//! - `data_path`: tessdata directory override (`TESSDATA_PATH`)
//! - `timeout_secs`: upper bound for one recognition, lock wait included;
//!   enforced by `RecognitionService`, which can drop the wait at any point
//! - `preprocess` / `max_image_dimension`: opt-in image normalization
//!
//! If Tesseract or the language data is missing the provider still builds but
//! reports itself unavailable, and every recognition fails.
//!
//! # Usage
//!
//! ```rust,ignore
//! let ocr = OcrProvider::new(&config.ocr);
//! let text = ocr.recognize(staged.path()).await?;
//! ```

mod preprocessing;
mod provider;
mod recognizer;

pub use preprocessing::preprocess_image;
pub use provider::OcrProvider;
pub use recognizer::TextRecognizer;

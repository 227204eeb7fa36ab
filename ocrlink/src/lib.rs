//! ocrlink: fetch an image by URL, read its text with Tesseract, return it.

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod ocr;
pub mod services;
pub mod storage;

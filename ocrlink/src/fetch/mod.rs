//! Image download.
//!
//! A single GET per call against the caller-provided URL. Non-2xx responses,
//! transport failures, timeouts and oversized bodies all surface as
//! [`OcrLinkError::Fetch`](crate::error::OcrLinkError::Fetch); URLs that do not
//! parse surface as `UrlParse`. There are no retries.

mod client;

pub use client::{file_name_from_url, FetchedImage, ImageFetcher};

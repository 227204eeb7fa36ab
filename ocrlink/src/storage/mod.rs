//! Scratch storage for downloaded images.
//!
//! The OCR engine reads from a file path, so every request writes its payload
//! into the shared scratch directory and removes it once recognition is over.
//! Staged names carry a per-request random token, so concurrent requests for
//! URLs with the same basename never touch each other's files.

mod scratch;

pub use scratch::{sanitize_file_name, ScratchStore, StagedFile};

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// Turns an image on disk into text.
///
/// The recognition language is fixed when the implementation is built; every
/// call uses it.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, path: &Path) -> Result<String>;

    fn is_available(&self) -> bool;

    /// Language codes the engine was initialized with (e.g. `eng+deu`).
    fn languages(&self) -> &str;
}

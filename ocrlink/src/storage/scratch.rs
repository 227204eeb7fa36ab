use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use nanoid::nanoid;
use tokio::io::AsyncWriteExt;

use crate::error::{OcrLinkError, Result};

const MAX_NAME_LEN: usize = 100;
const FALLBACK_NAME: &str = "image";

/// A payload written to the scratch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Clone, Debug)]
pub struct ScratchStore {
    dir: PathBuf,
}

impl ScratchStore {
    /// Creates the scratch directory if needed and checks that it is writable.
    pub async fn init(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();

        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            OcrLinkError::Store(format!(
                "Failed to create scratch directory {}: {e}",
                dir.display()
            ))
        })?;

        let probe = dir.join(format!(".probe-{}", nanoid!()));
        tokio::fs::write(&probe, b"").await.map_err(|e| {
            OcrLinkError::Store(format!(
                "Scratch directory {} is not writable: {e}",
                dir.display()
            ))
        })?;
        tokio::fs::remove_file(&probe).await?;

        tracing::info!(dir = %dir.display(), "Scratch directory ready");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `bytes` under a unique name derived from `suggested_name`.
    ///
    /// The data goes to a hidden `.part` file first and is renamed into place,
    /// so a returned [`StagedFile`] is always complete.
    pub async fn stage(
        &self,
        bytes: &[u8],
        suggested_name: &str,
        extension: Option<&str>,
    ) -> Result<StagedFile> {
        let token = nanoid!();
        let final_path = self
            .dir
            .join(format!("{token}-{}", sanitize_file_name(suggested_name, extension)));
        let part_path = self.dir.join(format!(".{token}.part"));

        if let Err(e) = write_fully(&part_path, bytes).await {
            discard(&part_path).await;
            return Err(OcrLinkError::Store(format!(
                "Failed to write {}: {e}",
                part_path.display()
            )));
        }

        if let Err(e) = tokio::fs::rename(&part_path, &final_path).await {
            discard(&part_path).await;
            return Err(OcrLinkError::Store(format!(
                "Failed to move staged image into {}: {e}",
                final_path.display()
            )));
        }

        tracing::debug!(path = %final_path.display(), size = bytes.len(), "Image staged");
        Ok(StagedFile { path: final_path })
    }

    /// Removes a staged file. Never fails; problems are only logged.
    pub async fn unstage(&self, staged: &StagedFile) {
        match tokio::fs::remove_file(&staged.path).await {
            Ok(()) => tracing::debug!(path = %staged.path.display(), "Staged image removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %staged.path.display(), "Staged image already gone")
            }
            Err(e) => tracing::warn!(
                path = %staged.path.display(),
                error = %e,
                "Failed to remove staged image"
            ),
        }
    }
}

async fn write_fully(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial file");
        }
    }
}

/// Reduces a URL basename to `[A-Za-z0-9._-]`, without leading dots.
///
/// `extension` is appended when the name has none of its own.
pub fn sanitize_file_name(name: &str, extension: Option<&str>) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut cleaned = cleaned.trim_start_matches('.').to_string();
    cleaned.truncate(MAX_NAME_LEN);
    if cleaned.is_empty() {
        cleaned = FALLBACK_NAME.to_string();
    }

    match extension {
        Some(ext) if Path::new(&cleaned).extension().is_none() => format!("{cleaned}.{ext}"),
        _ => cleaned,
    }
}

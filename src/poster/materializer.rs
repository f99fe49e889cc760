//! ImageMaterializer - writes generated posters into the cache directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;

use super::error::PosterError;

/// File name prefix for cached posters.
pub const POSTER_PREFIX: &str = "poster_";

/// File extension for cached posters.
pub const POSTER_EXTENSION: &str = "png";

/// Number of attempts at finding a free file name before giving up.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// A poster written to local storage.
///
/// The path stays valid for the rest of the session. It is not guaranteed to
/// survive a restart, since the OS may purge the cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterResult {
    local_uri: PathBuf,
}

impl PosterResult {
    pub fn new(local_uri: PathBuf) -> Self {
        Self { local_uri }
    }

    /// Path of the cached image.
    pub fn path(&self) -> &Path {
        &self.local_uri
    }

    /// `file://` URI of the cached image, for display.
    pub fn file_uri(&self) -> String {
        format!("file://{}", self.local_uri.display())
    }

    /// Read the cached image back as a `data:image/png;base64,...` URI.
    pub async fn data_uri(&self) -> Result<String, PosterError> {
        let bytes = tokio::fs::read(&self.local_uri)
            .await
            .map_err(|source| PosterError::Storage {
                path: self.local_uri.clone(),
                source,
            })?;
        Ok(encode_data_uri(&bytes))
    }
}

/// Encode image bytes as a PNG data URI using standard base64.
pub(crate) fn encode_data_uri(bytes: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Writes poster bytes into a cache directory under distinct names.
pub struct ImageMaterializer {
    cache_dir: PathBuf,
}

impl ImageMaterializer {
    /// Create a materializer writing into `cache_dir`.
    /// The directory is created on the first store.
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Create a materializer using the default cache directory.
    /// Default: ~/.cache/poster-studio/posters/
    pub fn with_default_dir() -> Self {
        Self::new(default_cache_dir())
    }

    /// Get the cache directory path.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// File name for a poster generated at `millis` with the given content.
    ///
    /// The timestamp keeps names increasing; the content hash separates two
    /// posters generated within the same millisecond.
    pub fn file_name(millis: u128, bytes: &[u8], attempt: u32) -> String {
        let digest = Sha256::digest(bytes);
        let hash = hex::encode(&digest[..4]);
        if attempt == 0 {
            format!("{}{}_{}.{}", POSTER_PREFIX, millis, hash, POSTER_EXTENSION)
        } else {
            format!(
                "{}{}_{}-{}.{}",
                POSTER_PREFIX, millis, hash, attempt, POSTER_EXTENSION
            )
        }
    }

    /// Write poster bytes to a new file in the cache directory.
    ///
    /// The bytes are written unchanged. An existing file is never
    /// overwritten, so a previous poster that is still being shared keeps its
    /// contents.
    ///
    /// # Errors
    ///
    /// Returns `PosterError::Storage` if the directory cannot be created or
    /// the file cannot be written.
    pub async fn store(&self, bytes: &[u8]) -> Result<PosterResult, PosterError> {
        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|source| PosterError::Storage {
                path: self.cache_dir.clone(),
                source,
            })?;

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.cache_dir.join(Self::file_name(millis, bytes, attempt));

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(PosterError::Storage { path, source }),
            };

            let written = async {
                file.write_all(bytes).await?;
                file.flush().await
            }
            .await;

            if let Err(source) = written {
                // Don't leave a truncated poster behind.
                drop(file);
                let _ = tokio::fs::remove_file(&path).await;
                return Err(PosterError::Storage { path, source });
            }

            log::info!("Poster saved to {}", path.display());
            return Ok(PosterResult::new(path));
        }

        Err(PosterError::Storage {
            path: self.cache_dir.clone(),
            source: std::io::Error::new(
                ErrorKind::AlreadyExists,
                "no free poster file name available",
            ),
        })
    }
}

/// Default directory for cached posters.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("poster-studio")
        .join("posters")
}

//! Poster asset storage.
//!
//! The [`AssetStore`] port stores uploaded poster bytes under a generated
//! opaque name and hands back a reference string that movie records keep.
//! Uploads are checked against a small image allowlist before anything is
//! written.

pub mod local;
pub mod memory;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::error::CoreError;

pub use local::LocalAssetStore;
pub use memory::MemoryAssetStore;

/// File extensions accepted for posters.
pub const ALLOWED_POSTER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Default public prefix of issued references (`/uploads/<name>.<ext>`).
pub const DEFAULT_PUBLIC_PREFIX: &str = "/uploads";

/// An uploaded poster file, as received from the transport.
#[derive(Clone)]
pub struct PosterUpload {
    /// Client-supplied file name; only its extension is used.
    pub file_name: String,
    /// Client-declared MIME type, e.g. `image/png`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for PosterUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PosterUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Durable storage for poster files.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Validate and persist `upload`, returning its opaque reference.
    async fn store(&self, upload: PosterUpload) -> Result<String, CoreError>;

    /// Remove a previously issued asset.
    ///
    /// Returns `false` when the reference was not issued by this store or the
    /// file is already gone.
    async fn remove(&self, poster_ref: &str) -> Result<bool, CoreError>;
}

/// What happens to poster files that no record points at any more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PosterCleanup {
    /// Superseded and deleted posters stay in the store.
    #[default]
    Retain,
    /// Superseded and deleted posters are removed once the record write
    /// succeeds; failures are logged, never surfaced.
    Purge,
}

impl FromStr for PosterCleanup {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(Self::Retain),
            "purge" => Ok(Self::Purge),
            other => Err(CoreError::Validation(format!(
                "Unknown poster cleanup policy '{other}'. Must be one of: retain, purge"
            ))),
        }
    }
}

/// Check an upload against the image allowlist and return the normalized
/// (lowercase) extension to store it under.
///
/// The MIME type must be `image/<jpg|jpeg|png|gif>`. The file name's
/// extension must also be on the allowlist; a file name without an
/// extension falls back to the MIME subtype.
pub fn check_poster_upload(upload: &PosterUpload) -> Result<String, CoreError> {
    let mime = upload.content_type.trim().to_ascii_lowercase();
    let subtype = mime
        .split(';')
        .next()
        .and_then(|essence| essence.trim().strip_prefix("image/"))
        .filter(|subtype| ALLOWED_POSTER_EXTENSIONS.contains(subtype))
        .ok_or_else(|| {
            CoreError::invalid_field(
                "poster",
                format!("Only image files are allowed (jpg, jpeg, png, gif), got '{mime}'"),
            )
        })?;

    let ext = match file_extension(&upload.file_name) {
        Some(ext) => ext,
        None => subtype.to_string(),
    };

    if !ALLOWED_POSTER_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CoreError::invalid_field(
            "poster",
            format!("Unsupported poster extension '.{ext}'. Supported: .jpg, .jpeg, .png, .gif"),
        ));
    }

    Ok(ext)
}

/// Lowercased extension of the last path component, if any.
fn file_extension(file_name: &str) -> Option<String> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

//! Turns a user-selected file into an inline image payload

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// An image picked by the user, ready to be sent inline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    /// Base64 of the file bytes (standard alphabet, padded)
    pub data: String,
    pub mime_type: String,
    /// Where the original bytes can be displayed from
    pub preview: PathBuf,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read and encode the chosen file.
///
/// `None` means nothing was chosen and yields `Ok(None)`. Size and type are
/// not checked here.
pub async fn load_image(path: Option<&Path>) -> Result<Option<SelectedImage>, InputError> {
    let Some(path) = path else {
        return Ok(None);
    };

    let bytes = tokio::fs::read(path).await.map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();

    tracing::debug!(path = %path.display(), bytes = bytes.len(), mime = %mime_type, "Image loaded");

    Ok(Some(SelectedImage {
        data: STANDARD.encode(&bytes),
        mime_type,
        preview: path.to_path_buf(),
    }))
}

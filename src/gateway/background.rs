//! Background removal through an image-generation model

use crate::llm::{ContentPart, GenerateRequest, GenerativeService, LlmError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Filename offered when saving a result
pub const DEFAULT_DOWNLOAD_NAME: &str = "remofy-processed-image.png";

/// Shown when a failure carries no message of its own
pub const PROCESSING_FAILED_MESSAGE: &str = "Failed to process image. Please try again.";

const REMOVE_BACKGROUND_PROMPT: &str = "Remove the background from this image. Keep only the main subject and return it on a transparent background (PNG format with alpha channel). If transparency is not possible, place the subject on a pure white background.";

/// Inline image returned by the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub data: String,
}

impl DataUri {
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.data)
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

#[derive(Debug, Error)]
pub enum RemovalError {
    #[error("Image data and MIME type are required.")]
    EmptyInput,
    #[error("No response generated from AI.")]
    NoCandidates,
    #[error("AI did not return an image part.")]
    NoImagePart,
    #[error(transparent)]
    Service(#[from] LlmError),
}

impl RemovalError {
    /// Message for the view; falls back to a generic one when empty
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            PROCESSING_FAILED_MESSAGE.to_string()
        } else {
            message
        }
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Result is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Strips image backgrounds with a single generation call
pub struct BackgroundRemover {
    service: Arc<dyn GenerativeService>,
}

impl BackgroundRemover {
    pub fn new(service: Arc<dyn GenerativeService>) -> Self {
        Self { service }
    }

    pub async fn remove_background(
        &self,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<DataUri, RemovalError> {
        if image_base64.is_empty() || mime_type.is_empty() {
            return Err(RemovalError::EmptyInput);
        }

        let request = GenerateRequest::new(vec![
            ContentPart::inline_data(mime_type, image_base64),
            ContentPart::text(REMOVE_BACKGROUND_PROMPT),
        ]);

        let response = self.service.generate(&request).await.map_err(|e| {
            tracing::error!(error = %e, "Background removal failed");
            RemovalError::Service(e)
        })?;

        let candidate = response
            .first_candidate()
            .ok_or(RemovalError::NoCandidates)?;
        let image = candidate
            .first_inline_data()
            .ok_or(RemovalError::NoImagePart)?;

        Ok(DataUri {
            mime_type: image.mime_type.clone(),
            data: image.data.clone(),
        })
    }
}

/// Write the decoded payload of `uri` to `path`
pub async fn save_data_uri(uri: &DataUri, path: &Path) -> Result<(), SaveError> {
    let bytes = uri.decode()?;
    tokio::fs::write(path, &bytes)
        .await
        .map_err(|source| SaveError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Result saved");
    Ok(())
}

//! Generative AI service abstraction
//!
//! One request in, one normalized response (or classified error) out.

mod error;
mod gemini;
mod types;

pub use error::{LlmError, LlmErrorKind};
pub use gemini::{GeminiConfig, GeminiService, DEFAULT_BASE_URL};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for generative services
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Issue one generation request
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

#[async_trait]
impl<T: GenerativeService + ?Sized> GenerativeService for Arc<T> {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        (**self).generate(request).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

/// Logging wrapper for generative services
pub struct LoggingService {
    inner: Arc<dyn GenerativeService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn GenerativeService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl GenerativeService for LoggingService {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.generate(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    candidates = response.candidates.len(),
                    finish_reason = response
                        .first_candidate()
                        .and_then(|c| c.finish_reason.as_deref())
                        .unwrap_or("none"),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "Generation request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = ?e.kind,
                    transient = e.kind.is_transient(),
                    "Generation request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

//! Google Gemini `generateContent` implementation

use super::types::{
    Candidate, ContentPart, GenerateRequest, GenerateResponse, GroundingSource, InlineData, Tool,
    Usage,
};
use super::{GenerativeService, LlmError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Longest slice of a response body quoted in an error message
const MAX_BODY_IN_ERROR: usize = 512;

/// Connection settings shared by every model the app talks to
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Gemini service bound to one model
pub struct GeminiService {
    client: Client,
    api_key: String,
    endpoint: String,
    model_id: String,
}

impl GeminiService {
    pub fn new(config: &GeminiConfig, model: impl Into<String>) -> Result<Self, LlmError> {
        let model_id = model.into();
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            model_id
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint,
            model_id,
        })
    }

    fn translate_request(request: &GenerateRequest) -> GeminiRequest {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                ContentPart::Text(text) => GeminiPart::Text { text: text.clone() },
                ContentPart::InlineData(data) => GeminiPart::InlineData {
                    inline_data: data.clone(),
                },
            })
            .collect();

        let tools = if request.tools.is_empty() {
            None
        } else {
            Some(
                request
                    .tools
                    .iter()
                    .map(|tool| match tool {
                        Tool::GoogleMaps => GeminiTool {
                            google_maps: Some(serde_json::json!({})),
                        },
                    })
                    .collect(),
            )
        };

        let generation_config =
            request
                .response_schema
                .as_ref()
                .map(|schema| GeminiGenerationConfig {
                    response_mime_type: Some("application/json".to_string()),
                    response_schema: Some(schema.clone()),
                });

        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts,
            }],
            tools,
            generation_config,
        }
    }

    fn normalize_response(resp: GeminiResponse) -> GenerateResponse {
        let candidates = resp
            .candidates
            .into_iter()
            .map(|candidate| {
                let parts = candidate
                    .content
                    .map(|content| content.parts)
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|part| match part {
                        GeminiPart::Text { text } => Some(ContentPart::Text(text)),
                        GeminiPart::InlineData { inline_data } => {
                            Some(ContentPart::InlineData(inline_data))
                        }
                        GeminiPart::Other(_) => None,
                    })
                    .collect();

                let grounding = candidate
                    .grounding_metadata
                    .map(|meta| meta.grounding_chunks)
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|chunk| {
                        if let Some(GeminiGroundingRef { uri: Some(uri), title }) = chunk.maps {
                            Some(GroundingSource::Maps { uri, title })
                        } else if let Some(GeminiGroundingRef { uri: Some(uri), title }) = chunk.web
                        {
                            Some(GroundingSource::Web { uri, title })
                        } else {
                            None
                        }
                    })
                    .collect();

                Candidate {
                    parts,
                    grounding,
                    finish_reason: candidate.finish_reason,
                }
            })
            .collect();

        let usage = resp
            .usage_metadata
            .map(|usage| Usage {
                input_tokens: u64::from(usage.prompt_token_count),
                output_tokens: u64::from(usage.candidates_token_count),
            })
            .unwrap_or_default();

        GenerateResponse { candidates, usage }
    }

    fn classify_error(status: reqwest::StatusCode, error: &GeminiError) -> LlmError {
        let message = &error.message;
        let key_problem = message.contains("API key")
            || matches!(
                error.status.as_deref(),
                Some("UNAUTHENTICATED" | "PERMISSION_DENIED")
            );

        match status.as_u16() {
            400 if key_problem => LlmError::auth(format!("Authentication failed: {message}")),
            400 => LlmError::invalid_request(format!("Invalid request: {message}")),
            401 | 403 => LlmError::auth(format!("Authentication failed: {message}")),
            429 => LlmError::rate_limit(format!("Rate limit exceeded: {message}")),
            500..=599 => LlmError::server_error(format!("Server error: {message}")),
            _ => LlmError::unknown(format!("HTTP {status}: {message}")),
        }
    }
}

#[async_trait]
impl GenerativeService for GeminiService {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let gemini_request = Self::translate_request(request);

        let mut builder = self.client.post(&self.endpoint).json(&gemini_request);
        // Without a key the service answers 401/403, reported as Auth
        if !self.api_key.is_empty() {
            builder = builder.header("x-goog-api-key", self.api_key.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            let e = e.without_url();
            if e.is_timeout() {
                LlmError::network(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                LlmError::network(format!("Connection failed: {e}"))
            } else {
                LlmError::unknown(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| {
                LlmError::network(format!("Failed to read response: {}", e.without_url()))
            })?;

        if !status.is_success() {
            if let Ok(error_resp) = serde_json::from_str::<GeminiErrorResponse>(&body) {
                return Err(Self::classify_error(status, &error_resp.error));
            }
            return Err(match status.as_u16() {
                401 | 403 => LlmError::auth(format!("Authentication failed: HTTP {status}")),
                _ => LlmError::unknown(format!("HTTP {status} error: {}", excerpt(&body))),
            });
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            LlmError::unknown(format!(
                "Failed to parse response: {e} - body: {}",
                excerpt(&body)
            ))
        })?;

        Ok(Self::normalize_response(gemini_response))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Leading part of a body, cut on a char boundary
fn excerpt(body: &str) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(MAX_BODY_IN_ERROR).collect();
    if chars.next().is_some() {
        format!("{head}... ({} bytes total)", body.len())
    } else {
        head
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

// Variant order matters for untagged decoding
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Other(serde_json::Value),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    #[serde(skip_serializing_if = "Option::is_none")]
    google_maps: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
    #[serde(default)]
    grounding_metadata: Option<GeminiGroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GeminiGroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GeminiGroundingChunk {
    maps: Option<GeminiGroundingRef>,
    web: Option<GeminiGroundingRef>,
}

#[derive(Debug, Deserialize)]
struct GeminiGroundingRef {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
    #[allow(dead_code)]
    code: Option<i32>,
    status: Option<String>,
}

//! Provider-neutral request and response types

use serde::{Deserialize, Serialize};

/// A single-turn generation request
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub parts: Vec<ContentPart>,
    pub tools: Vec<Tool>,
    /// Constrain the output to JSON matching this schema
    pub response_schema: Option<serde_json::Value>,
}

impl GenerateRequest {
    pub fn new(parts: Vec<ContentPart>) -> Self {
        Self {
            parts,
            ..Self::default()
        }
    }

    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_response_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Content part in a request or a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    InlineData(InlineData),
}

impl ContentPart {
    pub fn text(s: impl Into<String>) -> Self {
        ContentPart::Text(s.into())
    }

    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        ContentPart::InlineData(InlineData {
            mime_type: mime_type.into(),
            data: data.into(),
        })
    }
}

/// Base64 payload with its MIME type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// Server-side tools the model may consult
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    GoogleMaps,
}

/// Generation response
#[derive(Debug, Clone, Default)]
pub struct GenerateResponse {
    pub candidates: Vec<Candidate>,
    pub usage: Usage,
}

impl GenerateResponse {
    pub fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// Concatenated text of the first candidate
    pub fn text(&self) -> String {
        self.first_candidate()
            .map(Candidate::text)
            .unwrap_or_default()
    }
}

/// One candidate completion
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    pub parts: Vec<ContentPart>,
    pub grounding: Vec<GroundingSource>,
    pub finish_reason: Option<String>,
}

impl Candidate {
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text(text) => Some(text.as_str()),
                ContentPart::InlineData(_) => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// First part carrying inline data, in response order
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.parts.iter().find_map(|part| match part {
            ContentPart::InlineData(data) => Some(data),
            ContentPart::Text(_) => None,
        })
    }

    /// First maps URI among the grounding sources
    pub fn maps_uri(&self) -> Option<&str> {
        self.grounding.iter().find_map(|source| match source {
            GroundingSource::Maps { uri, .. } => Some(uri.as_str()),
            GroundingSource::Web { .. } => None,
        })
    }
}

/// External source that informed a grounded answer
#[allow(dead_code)] // Titles are kept for attribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroundingSource {
    Maps { uri: String, title: Option<String> },
    Web { uri: String, title: Option<String> },
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

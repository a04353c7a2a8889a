//! Store details through a grounded lookup followed by structured generation
//!
//! Stage one asks a maps-grounded text model for prose about the business.
//! Stage two turns that prose into JSON constrained by [`store_schema`].

use crate::llm::{ContentPart, GenerateRequest, GenerativeService, LlmError, Tool};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Business looked up when nothing else is configured
pub const DEFAULT_MAPS_URL: &str =
    "https://www.google.com/maps/search/?api=1&query=Toko+Kopi+Nusantara+Jakarta";

pub const DEFAULT_SUMMARY: &str =
    "Welcome to our store! We are happy to serve you and look forward to your visit.";
pub const DEFAULT_CATEGORY: &str = "Local Business";

/// The only failure text the view ever shows for this pipeline
pub const STORE_FETCH_FAILED_MESSAGE: &str =
    "Failed to fetch store data. Please check your network connection.";

/// Everything shown on the store page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDetails {
    pub name: String,
    pub address: String,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<Vec<String>>,
    pub reviews: Option<Vec<Review>>,
    pub summary: String,
    pub category: String,
    pub map_uri: String,
}

/// Customer review; any field may be missing or null in model output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// Output of the grounded lookup stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreResearch {
    pub prose: String,
    pub map_uri: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store lookup failed: {0}")]
    Research(#[source] LlmError),
    #[error("Structuring store data failed: {0}")]
    Structure(#[source] LlmError),
    #[error("Structured output was empty")]
    EmptyStructuredOutput,
    #[error("Structured output is not valid store JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl StoreError {
    pub fn user_message(&self) -> &'static str {
        STORE_FETCH_FAILED_MESSAGE
    }
}

/// Wire shape of the structured stage; every field is tolerated missing
#[derive(Debug, Deserialize)]
struct StructuredStore {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    /// Declared as NUMBER in the schema, so it may arrive as a float
    #[serde(default)]
    user_ratings_total: Option<f64>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    opening_hours: Option<Vec<String>>,
    #[serde(default)]
    reviews: Option<Vec<Review>>,
}

/// Response schema for the structured stage
pub fn store_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "address": { "type": "STRING" },
            "rating": { "type": "NUMBER" },
            "user_ratings_total": { "type": "NUMBER" },
            "summary": { "type": "STRING" },
            "category": { "type": "STRING" },
            "opening_hours": { "type": "ARRAY", "items": { "type": "STRING" } },
            "reviews": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "author": { "type": "STRING" },
                        "text": { "type": "STRING" },
                        "rating": { "type": "NUMBER" }
                    }
                }
            }
        }
    })
}

fn research_prompt(maps_url: &str) -> String {
    format!(
        "Cari informasi lengkap tentang bisnis di lokasi Google Maps berikut: {maps_url}\n\
         Jelaskan nama bisnis, alamat lengkap, rating, jumlah ulasan, kategori bisnis, \
         deskripsi singkat, beberapa ulasan pelanggan (nama penulis, isi ulasan, dan rating), \
         serta jam operasional setiap hari."
    )
}

fn structure_prompt(prose: &str) -> String {
    format!(
        "Ubah informasi bisnis berikut menjadi data terstruktur sesuai skema. \
         Gunakan bahasa Indonesia untuk ringkasan.\n\n{prose}"
    )
}

/// Two-stage store data pipeline
pub struct StoreDataFetcher {
    service: Arc<dyn GenerativeService>,
    maps_url: String,
}

impl StoreDataFetcher {
    pub fn new(service: Arc<dyn GenerativeService>, maps_url: impl Into<String>) -> Self {
        Self {
            service,
            maps_url: maps_url.into(),
        }
    }

    pub async fn fetch_store_data(&self) -> Result<StoreDetails, StoreError> {
        let research = self.research().await?;
        self.structure(&research).await
    }

    /// Stage one: grounded prose plus the map reference
    pub async fn research(&self) -> Result<StoreResearch, StoreError> {
        let request = GenerateRequest::new(vec![ContentPart::text(research_prompt(
            &self.maps_url,
        ))])
        .with_tool(Tool::GoogleMaps);

        let response = self
            .service
            .generate(&request)
            .await
            .map_err(StoreError::Research)?;

        let map_uri = response
            .first_candidate()
            .and_then(|candidate| candidate.maps_uri())
            .map_or_else(|| self.maps_url.clone(), str::to_string);

        tracing::debug!(map_uri = %map_uri, "Store research completed");

        Ok(StoreResearch {
            prose: response.text(),
            map_uri,
        })
    }

    /// Stage two: schema-constrained JSON, merged with defaults
    pub async fn structure(&self, research: &StoreResearch) -> Result<StoreDetails, StoreError> {
        let request = GenerateRequest::new(vec![ContentPart::text(structure_prompt(
            &research.prose,
        ))])
        .with_response_schema(store_schema());

        let response = self
            .service
            .generate(&request)
            .await
            .map_err(StoreError::Structure)?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(StoreError::EmptyStructuredOutput);
        }

        let structured: StructuredStore = serde_json::from_str(text.trim())?;
        Ok(merge_defaults(structured, research.map_uri.clone()))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn review_count(total: f64) -> Option<u64> {
    (total.is_finite() && total >= 0.0).then(|| total.round() as u64)
}

/// Blank model text counts as missing
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn merge_defaults(structured: StructuredStore, map_uri: String) -> StoreDetails {
    StoreDetails {
        name: structured.name.unwrap_or_default(),
        address: structured.address.unwrap_or_default(),
        rating: structured.rating,
        review_count: structured.user_ratings_total.and_then(review_count),
        phone: structured.phone,
        website: structured.website,
        opening_hours: structured.opening_hours,
        reviews: structured.reviews,
        summary: non_blank(structured.summary).unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        category: non_blank(structured.category)
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        map_uri,
    }
}

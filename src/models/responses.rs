use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::domain::{Attraction, BudgetStatus, Category};

/// Paginated search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub count: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub results: Vec<Attraction>,
}

/// Entry returned by the suggestions endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    City,
    Attraction,
}

/// Per-country catalog facet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryFacet {
    pub country: String,
    pub count: usize,
    pub cities_count: usize,
    pub cities: Vec<String>,
}

/// Derived statistics over a compilation's active items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationSummary {
    pub total_items: usize,
    pub visited_items: usize,
    pub estimated_budget: f64,
    pub budget_ceiling: Option<f64>,
    pub budget_status: Option<BudgetStatus>,
    pub category_breakdown: BTreeMap<Category, usize>,
}

/// Route response: ordered attraction keys plus the attractions themselves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResponse {
    pub order: Vec<String>,
    pub attractions: Vec<Attraction>,
    pub total_distance_km: f64,
    pub persisted: bool,
}

/// Catalog refresh outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub fetched: usize,
    pub stored: usize,
    pub rejected: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

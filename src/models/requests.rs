use serde::{Deserialize, Serialize};
use validator::Validate;

/// Catalog search parameters as received from the caller.
///
/// Every field is kept as raw text so that a malformed value drops only
/// that filter instead of failing the whole query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(max = 200))]
    pub query: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub min_rating: Option<String>,
    pub max_rating: Option<String>,
    pub min_reviews: Option<String>,
    pub min_photos: Option<String>,
    pub price_level: Option<String>,
    pub profile: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub radius: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// Popular attractions parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PopularRequest {
    pub country: Option<String>,
    pub profile: Option<String>,
    pub limit: Option<usize>,
}

/// Search-as-you-type parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestionsRequest {
    #[serde(default)]
    pub q: String,
}

/// Refresh the catalog from the provider
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, max = 200))]
    pub query: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Create a compilation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCompilationRequest {
    #[validate(length(min = 1))]
    pub owner: String,
    #[serde(default)]
    pub profile_type: Option<String>,
}

/// Add a catalog attraction to a compilation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddItemRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "externalId")]
    pub external_id: String,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub priority: Option<u8>,
    #[serde(default)]
    pub note: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(default, alias = "estimatedCost")]
    pub estimated_cost: Option<f64>,
}

/// Budget ceiling selection for a compilation summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub budget_amount: Option<f64>,
    pub budget_range: Option<String>,
}

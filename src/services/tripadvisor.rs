use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::config::ProviderSettings;
use crate::core::RawRecord;
use crate::models::Category;
use crate::services::{RecordSource, SourceError};

/// Placeholder shipped in sample environment files
const PLACEHOLDER_API_KEY: &str = "your-tripadvisor-api-key-here";

/// TripAdvisor content API client
///
/// Handles communication with the location endpoints:
/// - Free-text location search
/// - Location details by identifier
pub struct TripAdvisorClient {
    base_url: String,
    api_key: String,
    language: String,
    client: Client,
}

impl TripAdvisorClient {
    /// Create a new TripAdvisor client
    pub fn new(
        base_url: String,
        api_key: String,
        language: String,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;

        if api_key.is_empty() || api_key == PLACEHOLDER_API_KEY {
            tracing::warn!("TripAdvisor API key not configured, provider requests will be refused");
        }

        Ok(Self {
            base_url,
            api_key,
            language,
            client,
        })
    }

    pub fn from_settings(config: &ProviderSettings) -> Result<Self, SourceError> {
        Self::new(
            config.endpoint.clone(),
            config.api_key.clone(),
            config.language.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && self.api_key != PLACEHOLDER_API_KEY
    }

    /// Provider category token for a catalog category
    fn category_param(category: Category) -> Option<&'static str> {
        match category {
            Category::Restaurant => Some("restaurants"),
            Category::Hotel => Some("hotels"),
            Category::Attraction => Some("attractions"),
            Category::Other => None,
        }
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!(
            "{}/{}?{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/'),
            query
        )
    }

    /// GET a provider path. `Ok(None)` on 404.
    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<Value>, SourceError> {
        if !self.is_configured() {
            return Err(SourceError::NotConfigured);
        }

        let url = self.url(path, params);
        tracing::debug!("Requesting TripAdvisor path: {}", path);

        let response = self
            .client
            .get(&url)
            .header("X-TripAdvisor-API-Key", &self.api_key)
            .header("accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("TripAdvisor request to {} failed: {} - {}", path, status, body);
            return Err(SourceError::Api(format!("{} returned {}", path, status)));
        }

        Ok(Some(response.json().await?))
    }
}

#[async_trait]
impl RecordSource for TripAdvisorClient {
    async fn search(
        &self,
        query: &str,
        category: Option<Category>,
    ) -> Result<Vec<RawRecord>, SourceError> {
        let mut params = vec![("searchQuery", query), ("language", self.language.as_str())];
        if let Some(token) = category.and_then(Self::category_param) {
            params.push(("category", token));
        }

        let json = self
            .get_json("location/search", &params)
            .await?
            .ok_or_else(|| SourceError::InvalidResponse("Search endpoint not found".into()))?;

        let data = json
            .get("data")
            .and_then(|d| d.as_array())
            .ok_or_else(|| SourceError::InvalidResponse("Missing data array".into()))?;

        tracing::info!("TripAdvisor returned {} locations for query: {}", data.len(), query);

        Ok(data.iter().cloned().map(RawRecord::TripAdvisor).collect())
    }

    async fn details(&self, external_id: &str) -> Result<Option<RawRecord>, SourceError> {
        let path = format!("location/{}/details", urlencoding::encode(external_id));
        let json = self
            .get_json(&path, &[("language", self.language.as_str())])
            .await?;

        match json {
            Some(value) if value.is_object() => Ok(Some(RawRecord::TripAdvisor(value))),
            Some(_) => Err(SourceError::InvalidResponse("Details is not an object".into())),
            None => Ok(None),
        }
    }
}

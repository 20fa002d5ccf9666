use std::sync::Arc;

use crate::core::{CatalogQueryEngine, RecordNormalizer, SearchFilters, SortOrder};
use crate::models::{
    Attraction, Category, CountryFacet, PopularRequest, RefreshResponse, SearchRequest,
    SearchResponse, Suggestion,
};
use crate::services::{RecordSource, RecordStore};

/// Orchestrates provider refreshes and catalog queries
///
/// The provider is optional: without one the service answers purely from
/// the store.
pub struct CatalogService {
    source: Option<Arc<dyn RecordSource>>,
    store: Arc<dyn RecordStore>,
    normalizer: RecordNormalizer,
    engine: CatalogQueryEngine,
    popular_limit: usize,
}

impl CatalogService {
    pub fn new(
        source: Option<Arc<dyn RecordSource>>,
        store: Arc<dyn RecordStore>,
        normalizer: RecordNormalizer,
        engine: CatalogQueryEngine,
        popular_limit: usize,
    ) -> Self {
        Self {
            source,
            store,
            normalizer,
            engine,
            popular_limit,
        }
    }

    pub fn engine(&self) -> &CatalogQueryEngine {
        &self.engine
    }

    /// Pull records for `query` from the provider into the store.
    ///
    /// Provider failures are logged and reported as an empty refresh.
    pub async fn refresh(&self, query: &str, category: Option<Category>) -> RefreshResponse {
        let Some(source) = &self.source else {
            tracing::warn!("Catalog refresh requested without a provider");
            return RefreshResponse { fetched: 0, stored: 0, rejected: 0 };
        };

        let raw = match source.search(query, category).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Provider search for {:?} failed: {}", query, e);
                return RefreshResponse { fetched: 0, stored: 0, rejected: 0 };
            }
        };

        let fetched = raw.len();
        let batch = self.normalizer.normalize_batch(raw);
        let stored = self.store.upsert_many(batch.attractions).await;

        tracing::info!(
            "Refreshed catalog for {:?}: {} fetched, {} stored, {} rejected",
            query,
            fetched,
            stored,
            batch.rejected
        );

        RefreshResponse {
            fetched,
            stored,
            rejected: batch.rejected,
        }
    }

    /// Paginated search with lenient parameter parsing
    pub async fn search(&self, request: &SearchRequest) -> SearchResponse {
        let records = self.store.list().await;
        let filters = SearchFilters::from_request(request);
        let order = SortOrder::parse(request.ordering.as_deref());
        let page = parse_count(&request.page).unwrap_or(1);
        let page_size = parse_count(&request.page_size);

        let page = self.engine.search(&records, &filters, order, page, page_size);
        let total_pages = page.total_pages();

        SearchResponse {
            count: page.total_count,
            page: page.page,
            page_size: page.page_size,
            total_pages,
            results: page.results,
        }
    }

    pub async fn popular(&self, request: &PopularRequest) -> Vec<Attraction> {
        let records = self.store.list().await;
        let limit = request.limit.unwrap_or(self.popular_limit);

        self.engine.popular(
            &records,
            request.country.as_deref(),
            request.profile.as_deref(),
            limit,
        )
    }

    pub async fn suggestions(&self, q: &str) -> Vec<Suggestion> {
        let records = self.store.list().await;
        self.engine.suggestions(&records, q)
    }

    pub async fn countries(&self) -> Vec<CountryFacet> {
        let records = self.store.list().await;
        self.engine.country_facets(&records)
    }

    /// Look up a record by external identifier, falling back to the provider
    /// and caching the normalized result in the store
    pub async fn find(&self, external_id: &str) -> Option<Attraction> {
        if let Some(found) = self.store.get(external_id).await.filter(|a| a.is_active) {
            return Some(found);
        }

        let source = self.source.as_ref()?;
        let raw = match source.details(external_id).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Provider lookup for {} failed: {}", external_id, e);
                return None;
            }
        };

        match self.normalizer.normalize(&raw) {
            Ok(attraction) => {
                self.store.upsert_many(vec![attraction.clone()]).await;
                Some(attraction)
            }
            Err(e) => {
                tracing::warn!("Provider record {} rejected: {}", external_id, e);
                None
            }
        }
    }
}

fn parse_count(value: &Option<String>) -> Option<usize> {
    value.as_deref().and_then(|v| v.trim().parse::<usize>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RawRecord;
    use crate::services::{InMemoryRecordStore, SourceError};
    use async_trait::async_trait;
    use serde_json::json;

    struct FixtureSource {
        fail: bool,
    }

    #[async_trait]
    impl RecordSource for FixtureSource {
        async fn search(
            &self,
            _query: &str,
            _category: Option<Category>,
        ) -> Result<Vec<RawRecord>, SourceError> {
            if self.fail {
                return Err(SourceError::Api("unavailable".into()));
            }
            Ok(vec![
                RawRecord::TripAdvisor(json!({
                    "location_id": "188151",
                    "name": "Eiffel Tower",
                    "address_obj": { "city": "Paris", "country": "France" },
                    "latitude": "48.8584",
                    "longitude": "2.2945",
                    "rating": "4.5",
                    "num_reviews": "140000",
                    "category": { "name": "attraction" }
                })),
                RawRecord::TripAdvisor(json!({ "location_id": "0" })),
                RawRecord::TripAdvisor(json!("not an object")),
            ])
        }

        async fn details(&self, external_id: &str) -> Result<Option<RawRecord>, SourceError> {
            if external_id == "9" {
                return Ok(Some(RawRecord::TripAdvisor(json!({
                    "location_id": "9",
                    "name": "Musée d'Orsay",
                    "address_obj": { "city": "Paris", "country": "France" }
                }))));
            }
            Ok(None)
        }
    }

    fn service(fail: bool) -> (CatalogService, Arc<InMemoryRecordStore>) {
        let store = Arc::new(InMemoryRecordStore::new());
        let service = CatalogService::new(
            Some(Arc::new(FixtureSource { fail })),
            store.clone(),
            RecordNormalizer::default(),
            CatalogQueryEngine::default(),
            20,
        );
        (service, store)
    }

    #[tokio::test]
    async fn test_refresh_normalizes_and_stores() {
        let (service, store) = service(false);

        let outcome = service.refresh("eiffel", None).await;
        assert_eq!(outcome.fetched, 3);
        assert_eq!(outcome.stored, 1);
        assert_eq!(outcome.rejected, 2);

        let stored = store.get("188151").await.unwrap();
        assert_eq!(stored.city, "Paris");
        assert_eq!(stored.num_reviews, 140000);
    }

    #[tokio::test]
    async fn test_refresh_failure_is_empty() {
        let (service, store) = service(true);

        let outcome = service.refresh("eiffel", None).await;
        assert_eq!(outcome.stored, 0);
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_search_after_refresh() {
        let (service, _) = service(false);
        service.refresh("eiffel", None).await;

        let request = SearchRequest {
            city: Some("paris".into()),
            page: Some("abc".into()),
            ..Default::default()
        };
        let response = service.search(&request).await;

        assert_eq!(response.count, 1);
        assert_eq!(response.page, 1);
        assert_eq!(response.total_pages, 1);
        assert_eq!(response.results[0].name, "Eiffel Tower");
    }

    #[tokio::test]
    async fn test_find_falls_back_to_provider() {
        let (service, store) = service(false);

        let found = service.find("9").await.unwrap();
        assert_eq!(found.name, "Musée d'Orsay");
        assert!(store.get("9").await.is_some());

        assert!(service.find("404").await.is_none());
    }
}

use async_trait::async_trait;
use std::time::Duration;

use crate::core::RawRecord;
use crate::models::Category;
use crate::services::{RecordSource, SourceError};

/// In-memory TTL cache in front of a record source
///
/// Only successful responses are cached; provider errors always reach the
/// caller so that a transient failure is retried on the next request.
pub struct CachedRecordSource<S> {
    inner: S,
    searches: moka::future::Cache<String, Vec<RawRecord>>,
    details: moka::future::Cache<String, Option<RawRecord>>,
}

impl<S: RecordSource> CachedRecordSource<S> {
    pub fn new(inner: S, max_entries: u64, ttl_secs: u64) -> Self {
        let ttl = Duration::from_secs(ttl_secs);

        Self {
            inner,
            searches: moka::future::CacheBuilder::new(max_entries)
                .time_to_live(ttl)
                .build(),
            details: moka::future::CacheBuilder::new(max_entries)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Drop every cached response
    pub fn invalidate_all(&self) {
        self.searches.invalidate_all();
        self.details.invalidate_all();
        tracing::debug!("Invalidated provider cache");
    }
}

#[async_trait]
impl<S: RecordSource> RecordSource for CachedRecordSource<S> {
    async fn search(
        &self,
        query: &str,
        category: Option<Category>,
    ) -> Result<Vec<RawRecord>, SourceError> {
        let key = CacheKey::search(query, category);

        if let Some(records) = self.searches.get(&key).await {
            tracing::trace!("Cache hit: {}", key);
            return Ok(records);
        }

        tracing::trace!("Cache miss: {}", key);
        let records = self.inner.search(query, category).await?;
        self.searches.insert(key, records.clone()).await;
        Ok(records)
    }

    async fn details(&self, external_id: &str) -> Result<Option<RawRecord>, SourceError> {
        let key = CacheKey::details(external_id);

        if let Some(record) = self.details.get(&key).await {
            tracing::trace!("Cache hit: {}", key);
            return Ok(record);
        }

        let record = self.inner.details(external_id).await?;
        self.details.insert(key, record.clone()).await;
        Ok(record)
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a provider search; the query is case-folded
    pub fn search(query: &str, category: Option<Category>) -> String {
        format!(
            "search:{}:{}",
            query.trim().to_lowercase(),
            category.map_or("any", |c| c.as_str())
        )
    }

    /// Build a cache key for location details
    pub fn details(external_id: &str) -> String {
        format!("details:{}", external_id)
    }
}

// Service exports
pub mod cache;
pub mod catalog;
pub mod memory;
pub mod tripadvisor;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::core::RawRecord;
use crate::models::{Attraction, Category, Compilation, CompilationError};

pub use cache::{CacheKey, CachedRecordSource};
pub use catalog::CatalogService;
pub use memory::{InMemoryCompilationStore, InMemoryRecordStore};
pub use tripadvisor::TripAdvisorClient;

/// Errors raised while talking to an external record provider
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    Api(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Provider API key not configured")]
    NotConfigured,
}

/// Errors raised by the storage collaborators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Rejected(#[from] CompilationError),
}

/// In-place change applied to a stored compilation
pub type CompilationUpdate<'a> =
    Box<dyn FnOnce(&mut Compilation) -> Result<(), CompilationError> + Send + 'a>;

/// External provider of raw attraction records
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Free-text location search, optionally narrowed to one category
    async fn search(
        &self,
        query: &str,
        category: Option<Category>,
    ) -> Result<Vec<RawRecord>, SourceError>;

    /// Full record for one provider identifier, `None` when unknown
    async fn details(&self, external_id: &str) -> Result<Option<RawRecord>, SourceError>;
}

/// Persistent catalog of normalized attractions
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Snapshot of every stored record
    async fn list(&self) -> Vec<Attraction>;

    async fn get(&self, key: &str) -> Option<Attraction>;

    /// Insert or replace records by key, returning how many were written
    async fn upsert_many(&self, attractions: Vec<Attraction>) -> usize;
}

/// Persistent compilations
#[async_trait]
pub trait CompilationStore: Send + Sync {
    async fn insert(&self, compilation: Compilation) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Compilation, StoreError>;

    /// Apply `change` atomically and return the stored result.
    ///
    /// No other write to the same compilation interleaves with `change`. When
    /// it fails the compilation is left untouched.
    async fn update(&self, id: Uuid, change: CompilationUpdate<'_>) -> Result<Compilation, StoreError>;
}

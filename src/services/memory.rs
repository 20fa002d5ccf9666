use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Attraction, Compilation};
use crate::services::{CompilationStore, CompilationUpdate, RecordStore, StoreError};

/// Process-local catalog keeping records in insertion order
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Vec<Attraction>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Attraction>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().map(Attraction::sanitized).collect()),
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list(&self) -> Vec<Attraction> {
        self.records.read().await.clone()
    }

    async fn get(&self, key: &str) -> Option<Attraction> {
        self.records
            .read()
            .await
            .iter()
            .find(|a| a.key() == key)
            .cloned()
    }

    async fn upsert_many(&self, attractions: Vec<Attraction>) -> usize {
        let mut records = self.records.write().await;
        let written = attractions.len();

        for attraction in attractions.into_iter().map(Attraction::sanitized) {
            let key = attraction.key();
            match records.iter_mut().find(|existing| existing.key() == key) {
                Some(existing) => *existing = attraction,
                None => records.push(attraction),
            }
        }

        tracing::debug!("Upserted {} records, catalog holds {}", written, records.len());
        written
    }
}

/// Process-local compilation storage
#[derive(Default)]
pub struct InMemoryCompilationStore {
    compilations: RwLock<HashMap<Uuid, Compilation>>,
}

impl InMemoryCompilationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompilationStore for InMemoryCompilationStore {
    async fn insert(&self, compilation: Compilation) -> Result<(), StoreError> {
        let mut compilations = self.compilations.write().await;
        if compilations.contains_key(&compilation.id) {
            return Err(StoreError::Conflict(format!(
                "Compilation {} already exists",
                compilation.id
            )));
        }
        compilations.insert(compilation.id, compilation);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Compilation, StoreError> {
        self.compilations
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Compilation {}", id)))
    }

    async fn update(&self, id: Uuid, change: CompilationUpdate<'_>) -> Result<Compilation, StoreError> {
        let mut compilations = self.compilations.write().await;
        let stored = compilations
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("Compilation {}", id)))?;

        // A failed change leaves the stored copy untouched
        let mut updated = stored.clone();
        change(&mut updated)?;
        *stored = updated.clone();
        Ok(updated)
    }
}

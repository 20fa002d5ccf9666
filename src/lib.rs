//! Tripbook - attraction catalog and trip compilation service
//!
//! This library provides the catalog query engine, record normalization,
//! compilation budgeting and route ordering used by the Tripbook service.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    distance::haversine_distance, CatalogQueryEngine, CompilationAggregator, RecordNormalizer,
    RouteOptimizer, SearchFilters, SortOrder,
};
pub use crate::models::{Attraction, Category, Compilation, CompilationItem, Coordinates, PriceLevel};

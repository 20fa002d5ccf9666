// Core algorithm exports
pub mod budget;
pub mod distance;
pub mod filters;
pub mod normalizer;
pub mod query;
pub mod route;

pub use budget::{BudgetRangeTable, CompilationAggregator, PriceCostTable};
pub use distance::{calculate_bounding_box, distance_km, haversine_distance, is_within_bounding_box};
pub use filters::{GeoRadius, SearchFilters};
pub use normalizer::{NormalizeError, NormalizedBatch, RawRecord, RecordNormalizer};
pub use query::{CatalogQueryEngine, SearchPage, SortDirection, SortKey, SortOrder};
pub use route::RouteOptimizer;

// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Attraction, BoundingBox, BudgetProfile, BudgetRange, BudgetStatus, Category, Compilation,
    CompilationError, CompilationItem, Coordinates, Located, PriceLevel, ProfileType, RouteResult,
    is_valid_rating,
};
pub use requests::{
    AddItemRequest, CreateCompilationRequest, PopularRequest, RefreshRequest, SearchRequest,
    SuggestionsRequest, SummaryRequest,
};
pub use responses::{
    CompilationSummary, CountryFacet, ErrorResponse, HealthResponse, RefreshResponse,
    RouteResponse, SearchResponse, Suggestion, SuggestionKind,
};

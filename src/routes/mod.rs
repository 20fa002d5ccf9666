// Route exports
pub mod attractions;
pub mod compilations;

use actix_web::{http::StatusCode, web, HttpResponse};
use std::sync::Arc;

use crate::core::{CompilationAggregator, RouteOptimizer};
use crate::models::{CompilationError, ErrorResponse};
use crate::services::{CatalogService, CompilationStore, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub compilations: Arc<dyn CompilationStore>,
    pub aggregator: CompilationAggregator,
    pub optimizer: RouteOptimizer,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(attractions::configure)
            .configure(compilations::configure),
    );
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status.as_u16(),
    })
}

impl From<StoreError> for HttpResponse {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => error_response(StatusCode::NOT_FOUND, "not_found", err.to_string()),
            StoreError::Conflict(_) => error_response(StatusCode::CONFLICT, "conflict", err.to_string()),
            StoreError::Rejected(e) => e.into(),
        }
    }
}

impl From<CompilationError> for HttpResponse {
    fn from(err: CompilationError) -> Self {
        let (status, error) = match err {
            CompilationError::DuplicateAttraction(_) => (StatusCode::CONFLICT, "duplicate_attraction"),
            CompilationError::LimitReached(_) => (StatusCode::UNPROCESSABLE_ENTITY, "limit_reached"),
            CompilationError::ItemNotFound(_) => (StatusCode::NOT_FOUND, "item_not_found"),
            CompilationError::AlreadyVisited(_) => (StatusCode::CONFLICT, "already_visited"),
        };
        error_response(status, error, err.to_string())
    }
}

use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    Category, HealthResponse, PopularRequest, RefreshRequest, SearchRequest, SuggestionsRequest,
};
use crate::routes::{error_response, AppState};

/// Configure all catalog routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/attractions/search", web::get().to(search))
        .route("/attractions/popular", web::get().to(popular))
        .route("/attractions/suggestions", web::get().to(suggestions))
        .route("/attractions/countries", web::get().to(countries))
        .route("/attractions/refresh", web::post().to(refresh))
        .route("/attractions/{external_id}", web::get().to(get_attraction));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Catalog search
///
/// GET /api/v1/attractions/search?query=&category=&city=&country=&min_rating=
///     &max_rating=&min_reviews=&min_photos=&price_level=&profile=
///     &latitude=&longitude=&radius=&ordering=&page=&page_size=
///
/// Malformed filter values are ignored rather than rejected.
async fn search(state: web::Data<AppState>, req: web::Query<SearchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let response = state.catalog.search(&req).await;

    tracing::info!(
        "Search returned {} of {} results (page {}/{})",
        response.results.len(),
        response.count,
        response.page,
        response.total_pages
    );

    HttpResponse::Ok().json(response)
}

async fn popular(state: web::Data<AppState>, req: web::Query<PopularRequest>) -> impl Responder {
    HttpResponse::Ok().json(state.catalog.popular(&req).await)
}

async fn suggestions(
    state: web::Data<AppState>,
    req: web::Query<SuggestionsRequest>,
) -> impl Responder {
    HttpResponse::Ok().json(state.catalog.suggestions(&req.q).await)
}

async fn countries(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.catalog.countries().await)
}

async fn get_attraction(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let external_id = path.into_inner();

    match state.catalog.find(&external_id).await {
        Some(attraction) => HttpResponse::Ok().json(attraction),
        None => error_response(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("Attraction {} not found", external_id),
        ),
    }
}

/// Pull provider records into the catalog
///
/// POST /api/v1/attractions/refresh
///
/// Request body:
/// ```json
/// {
///   "query": "string",
///   "category": "restaurant|hotel|attraction"
/// }
/// ```
async fn refresh(state: web::Data<AppState>, req: web::Json<RefreshRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let category = req.category.as_deref().and_then(Category::from_token);
    let outcome = state.catalog.refresh(&req.query, category).await;

    HttpResponse::Ok().json(outcome)
}

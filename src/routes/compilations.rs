use actix_web::{http::StatusCode, web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    AddItemRequest, BudgetProfile, BudgetRange, Compilation, CompilationItem,
    CreateCompilationRequest, ProfileType, RouteResponse, SummaryRequest,
};
use crate::routes::{error_response, AppState};
use crate::services::CompilationUpdate;

/// Configure all compilation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/compilations", web::post().to(create_compilation))
        .route("/compilations/{id}", web::get().to(get_compilation))
        .route("/compilations/{id}/items", web::post().to(add_item))
        .route("/compilations/{id}/items/{key}", web::delete().to(remove_item))
        .route("/compilations/{id}/items/{key}/visited", web::post().to(mark_visited))
        .route("/compilations/{id}/summary", web::get().to(summary))
        .route("/compilations/{id}/route", web::get().to(preview_route))
        .route("/compilations/{id}/route", web::post().to(apply_route));
}

/// POST /api/v1/compilations
///
/// Unknown profile types fall back to tourist.
async fn create_compilation(
    state: web::Data<AppState>,
    req: web::Json<CreateCompilationRequest>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let profile_type = req
        .profile_type
        .as_deref()
        .and_then(ProfileType::from_token)
        .unwrap_or_default();
    let compilation = Compilation::new(req.owner.trim(), profile_type);

    if let Err(e) = state.compilations.insert(compilation.clone()).await {
        return e.into();
    }

    tracing::info!("Created compilation {} for {}", compilation.id, compilation.owner);
    HttpResponse::Created().json(compilation)
}

async fn get_compilation(state: web::Data<AppState>, path: web::Path<Uuid>) -> HttpResponse {
    match state.compilations.get(path.into_inner()).await {
        Ok(compilation) => HttpResponse::Ok().json(compilation),
        Err(e) => e.into(),
    }
}

/// Add a catalog attraction to a compilation
///
/// POST /api/v1/compilations/{id}/items
///
/// Request body:
/// ```json
/// {
///   "external_id": "string",
///   "priority": 1,
///   "note": "string",
///   "estimated_cost": 42.0
/// }
/// ```
async fn add_item(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<AddItemRequest>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let id = path.into_inner();

    // Resolve before touching the compilation; the lookup may reach the provider
    let Some(attraction) = state.catalog.find(&req.external_id).await else {
        return error_response(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("Attraction {} not found", req.external_id),
        );
    };

    let mut item = CompilationItem::new(attraction);
    if let Some(priority) = req.priority {
        item = item.with_priority(priority);
    }
    if let Some(note) = &req.note {
        item = item.with_note(note.as_str());
    }
    if let Some(cost) = req.estimated_cost {
        item = item.with_cost(cost);
    }

    let change: CompilationUpdate<'_> =
        Box::new(move |compilation: &mut Compilation| compilation.add_item(item));
    match state.compilations.update(id, change).await {
        Ok(compilation) => HttpResponse::Ok().json(compilation),
        Err(e) => {
            tracing::debug!("Rejected item {} for compilation {}: {}", req.external_id, id, e);
            e.into()
        }
    }
}

async fn remove_item(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
) -> HttpResponse {
    let (id, key) = path.into_inner();

    let change: CompilationUpdate<'_> =
        Box::new(move |compilation: &mut Compilation| compilation.remove_item(&key));
    match state.compilations.update(id, change).await {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(e) => e.into(),
    }
}

async fn mark_visited(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
) -> HttpResponse {
    let (id, key) = path.into_inner();

    let change: CompilationUpdate<'_> = Box::new(move |compilation: &mut Compilation| {
        compilation.mark_visited(&key, chrono::Utc::now())
    });
    match state.compilations.update(id, change).await {
        Ok(compilation) => HttpResponse::Ok().json(compilation),
        Err(e) => e.into(),
    }
}

/// Budget and category statistics
///
/// GET /api/v1/compilations/{id}/summary?budget_amount=250
/// GET /api/v1/compilations/{id}/summary?budget_range=medium
///
/// An explicit amount takes precedence over a range.
async fn summary(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Query<SummaryRequest>,
) -> HttpResponse {
    let compilation = match state.compilations.get(path.into_inner()).await {
        Ok(compilation) => compilation,
        Err(e) => return e.into(),
    };

    let profile = req
        .budget_amount
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
        .map(BudgetProfile::Amount)
        .or_else(|| {
            req.budget_range
                .as_deref()
                .and_then(BudgetRange::from_token)
                .map(BudgetProfile::Range)
        });

    HttpResponse::Ok().json(state.aggregator.summarize(&compilation, profile.as_ref()))
}

fn route_for(state: &AppState, compilation: &Compilation) -> RouteResponse {
    let items: Vec<CompilationItem> = compilation.active_items().cloned().collect();
    let route = state.optimizer.optimize(&items);

    RouteResponse {
        order: route.ordered.iter().map(CompilationItem::key).collect(),
        attractions: route.ordered.into_iter().map(|item| item.attraction).collect(),
        total_distance_km: route.total_distance_km,
        persisted: false,
    }
}

/// Compute a visiting order without changing the compilation
async fn preview_route(state: web::Data<AppState>, path: web::Path<Uuid>) -> HttpResponse {
    match state.compilations.get(path.into_inner()).await {
        Ok(compilation) => HttpResponse::Ok().json(route_for(&state, &compilation)),
        Err(e) => e.into(),
    }
}

/// Compute a visiting order and reorder the compilation to follow it
///
/// The route is computed from the stored items inside the same update that
/// reorders them.
async fn apply_route(state: web::Data<AppState>, path: web::Path<Uuid>) -> HttpResponse {
    let mut applied: Option<RouteResponse> = None;

    let change: CompilationUpdate<'_> = Box::new(|compilation: &mut Compilation| {
        let route = route_for(&state, compilation);
        compilation.apply_order(&route.order);
        applied = Some(route);
        Ok(())
    });
    if let Err(e) = state.compilations.update(path.into_inner(), change).await {
        return e.into();
    }

    let Some(mut route) = applied else {
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "Route update did not run",
        );
    };
    route.persisted = true;
    tracing::info!(
        "Applied route of {} stops ({} km)",
        route.order.len(),
        route.total_distance_km
    );

    HttpResponse::Ok().json(route)
}

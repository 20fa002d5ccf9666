use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tripbook::config::Settings;
use tripbook::core::{CatalogQueryEngine, CompilationAggregator, RecordNormalizer, RouteOptimizer};
use tripbook::routes::{self, AppState};
use tripbook::services::{
    CachedRecordSource, CatalogService, InMemoryCompilationStore, InMemoryRecordStore,
    RecordSource, TripAdvisorClient,
};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    // Initialize logging; LOG_LEVEL and LOG_FORMAT override the configuration
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting tripbook catalog service...");

    // Provider is optional: the catalog still serves stored records without it
    let source: Option<Arc<dyn RecordSource>> = match TripAdvisorClient::from_settings(&settings.provider) {
        Ok(client) if client.is_configured() => {
            info!(
                "TripAdvisor client initialized (cache: {} entries, TTL: {}s)",
                settings.cache.max_entries, settings.cache.ttl_secs
            );
            Some(Arc::new(CachedRecordSource::new(
                client,
                settings.cache.max_entries,
                settings.cache.ttl_secs,
            )))
        }
        Ok(_) => {
            warn!("No TripAdvisor API key, catalog refresh disabled");
            None
        }
        Err(e) => {
            error!("Failed to create TripAdvisor client: {}", e);
            None
        }
    };

    let engine = CatalogQueryEngine::new(
        settings.catalog.default_page_size,
        settings.catalog.max_page_size,
    );

    let catalog = Arc::new(CatalogService::new(
        source,
        Arc::new(InMemoryRecordStore::new()),
        RecordNormalizer::default(),
        engine,
        settings.catalog.popular_limit,
    ));

    // Build application state
    let app_state = AppState {
        catalog,
        compilations: Arc::new(InMemoryCompilationStore::new()),
        aggregator: CompilationAggregator::new(settings.budget.costs, settings.budget.ranges),
        optimizer: RouteOptimizer::new(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

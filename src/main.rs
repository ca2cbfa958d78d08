use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use pet_matcher::config::Settings;
use pet_matcher::core::{MatchClassifier, Matcher};
use pet_matcher::routes::{self, AppState};
use pet_matcher::services::DocumentStoreClient;
use std::io;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    init_logging();

    info!("Starting pet matcher prediction service...");

    let settings = Settings::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        io::Error::other(format!("Configuration error: {}", e))
    })?;

    info!("Configuration loaded successfully");

    // Encoders and forest are loaded once and never mutated afterwards
    let classifier = MatchClassifier::load(&settings.model.path).map_err(|e| {
        error!("Failed to load model from {}: {}", settings.model.path, e);
        io::Error::other(format!("Model error: {}", e))
    })?;

    info!(
        "Model loaded from {} ({} features)",
        settings.model.path,
        classifier.n_features()
    );

    let matcher = Matcher::new(Arc::new(classifier));

    let store = DocumentStoreClient::new(settings.store.client_config()).map_err(|e| {
        error!("Failed to create document store client: {}", e);
        io::Error::other(format!("Document store error: {}", e))
    })?;

    info!(
        "Document store client initialized (collection: {})",
        settings.store.collection
    );

    let app_state = AppState {
        store: Arc::new(store),
        matcher,
        top_k: settings.matching.top_k,
        max_top_k: settings.matching.max_top_k,
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
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(routes::handle_query_payload_error))
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

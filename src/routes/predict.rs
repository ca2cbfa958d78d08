use actix_web::{web, HttpResponse, Responder};
use serde_json::Value;
use validator::Validate;
use crate::core::{normalize_preferences, Matcher};
use crate::models::{ErrorResponse, HealthResponse, PredictQuery, PredictResponse};
use crate::services::{DocumentStoreClient, DocumentStoreError};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStoreClient>,
    pub matcher: Matcher,
    pub top_k: usize,
    pub max_top_k: usize,
}

/// Configure prediction and health routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/", web::get().to(health_check))
        .route("/health", web::get().to(health_check))
        .route("/predict", web::get().to(predict))
        .route("/predict", web::post().to(predict));
}

/// Liveness check
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Predict endpoint
///
/// GET /predict?limit=15
///
/// Request body:
/// ```json
/// {
///   "a1": "house",
///   "a3": false,
///   "p1": ["dog"],
///   "p2": {"fromAge": "1", "toAge": "5"},
///   "p3": ["medium"],
///   "p4": ["active"]
/// }
/// ```
///
/// Response: `{"predictions": [[animalId, score], ...]}`
async fn predict(
    state: web::Data<AppState>,
    query: web::Query<PredictQuery>,
    body: web::Json<Value>,
) -> impl Responder {
    let request_id = uuid::Uuid::new_v4();

    if let Err(errors) = query.validate() {
        tracing::info!("[{}] Invalid predict query: {}", request_id, errors);
        return HttpResponse::BadRequest().json(ErrorResponse::new(format!("Invalid query: {}", errors)));
    }
    let top_k = query.limit.unwrap_or(state.top_k).min(state.max_top_k);

    let preferences = match normalize_preferences(&body) {
        Ok(prefs) => prefs,
        Err(e) => {
            tracing::info!("[{}] Rejected questionnaire answers: {}", request_id, e);
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new(format!("Failed to parse adopter info: {}", e)));
        }
    };

    tracing::debug!("[{}] Adopter preferences: {:?}", request_id, preferences);

    let candidates = match state.store.load_candidates().await {
        Ok(table) => table,
        Err(DocumentStoreError::NoCandidates) => {
            tracing::error!("[{}] Collection '{}' is empty", request_id, state.store.collection());
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new(DocumentStoreError::NoCandidates.to_string()));
        }
        Err(e) => {
            tracing::error!("[{}] Failed to load candidates: {}", request_id, e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new(format!("Failed to load candidates: {}", e)));
        }
    };

    let result = match state.matcher.find_matches(&candidates, &preferences, top_k) {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("[{}] Model prediction failed: {}", request_id, e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new(format!("Model prediction failed: {}", e)));
        }
    };

    tracing::info!(
        "[{}] Returning {} predictions (from {} candidates)",
        request_id,
        result.matches.len(),
        result.total_candidates
    );

    HttpResponse::Ok().json(PredictResponse {
        predictions: result.matches,
    })
}

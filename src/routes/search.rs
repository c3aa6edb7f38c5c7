use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::Matcher;
use crate::models::{CacheClearResponse, ErrorResponse, HealthResponse, SearchRequest};
use crate::services::AnkenStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AnkenStore>,
    pub matcher: Matcher,
}

/// Configure all search-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/search", web::post().to(search))
        .route("/search/export", web::post().to(search_export))
        .route("/cache/clear", web::post().to(clear_cache));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Matching endpoint
///
/// POST /api/v1/search
///
/// Request body:
/// ```json
/// {
///   "location": "東京",
///   "priceType": "hourly",
///   "minPrice": 2000,
///   "remarks": "フルリモート希望",
///   "skillProfile": { "summary": "...", "skills": ["..."] }
/// }
/// ```
async fn search(state: web::Data<AppState>, req: web::Json<SearchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let ankens = match state.store.get().await {
        Ok(ankens) => ankens,
        Err(e) => {
            tracing::error!("Failed to fetch listings: {}", e);
            return HttpResponse::BadGateway().json(ErrorResponse {
                error: "Failed to fetch listings".to_string(),
                message: e.to_string(),
                status_code: 502,
            });
        }
    };

    let condition = req.condition();
    let result = state
        .matcher
        .run(&ankens, &condition, req.skill_profile.as_ref());

    tracing::info!(
        matched = result.matched.len(),
        excluded = result.excluded.len(),
        "search complete"
    );

    HttpResponse::Ok().json(result)
}

/// Matched listings as one clipboard-ready text block
///
/// POST /api/v1/search/export
///
/// Same request body as /search; responds with plain text, listings
/// separated by "---" lines.
async fn search_export(state: web::Data<AppState>, req: web::Json<SearchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for export request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let ankens = match state.store.get().await {
        Ok(ankens) => ankens,
        Err(e) => {
            tracing::error!("Failed to fetch listings: {}", e);
            return HttpResponse::BadGateway().json(ErrorResponse {
                error: "Failed to fetch listings".to_string(),
                message: e.to_string(),
                status_code: 502,
            });
        }
    };

    let condition = req.condition();
    let result = state
        .matcher
        .run(&ankens, &condition, req.skill_profile.as_ref());

    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(result.export_text())
}

/// Explicit cache reset, mainly for operators and tests
///
/// POST /api/v1/cache/clear
async fn clear_cache(state: web::Data<AppState>) -> impl Responder {
    state.store.invalidate();
    HttpResponse::Ok().json(CacheClearResponse {
        success: true,
        cleared_at: chrono::Utc::now(),
    })
}

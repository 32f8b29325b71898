use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{MatchError, Matcher};
use crate::models::{
    CatalogEntry, DebugMatchesResponse, FindMatchesRequest, FindMatchesResponse, HealthResponse,
    StudentProfile,
};
use crate::routes::error_response;
use crate::services::{CacheError, CacheKey, CacheManager, PostgresClient, PostgresError};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CacheManager>,
    pub postgres: Arc<PostgresClient>,
    pub matcher: Matcher,
    pub max_limit: u16,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches", web::post().to(find_matches))
        .route("/matches/debug", web::post().to(debug_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches
///
/// Request body:
/// ```json
/// {
///   "studentId": 42,
///   "limit": 20
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", errors.to_string());
    }

    let student_id = req.student_id;
    tracing::info!("Finding matches for student: {}, limit: {:?}", student_id, req.limit);

    let profile = match fetch_profile(&state, student_id).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Failed to load profile for {}: {}", student_id, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "profile_unavailable", e.to_string());
        }
    };

    let catalog = match fetch_catalog(&state).await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("Failed to load program catalog: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "catalog_unavailable", e.to_string());
        }
    };

    let mut outcome = match state.matcher.compute_matches(&profile, &catalog) {
        Ok(outcome) => outcome,
        Err(e @ MatchError::InsufficientProfile { .. }) => {
            tracing::info!("Cannot rank programs for student {}: {}", student_id, e);
            return error_response(StatusCode::BAD_REQUEST, "insufficient_profile", e.to_string());
        }
    };

    if let Some(limit) = req.limit {
        outcome.matches.truncate(limit.min(state.max_limit) as usize);
    }

    let response = FindMatchesResponse {
        run_id: uuid::Uuid::new_v4(),
        matches: outcome.matches,
        total_programs: outcome.total_programs,
        excluded: outcome.excluded,
        generated_at: chrono::Utc::now(),
    };

    tracing::info!(
        run_id = %response.run_id,
        "Returning {} matches for student {} (from {} programs)",
        response.matches.len(),
        student_id,
        response.total_programs
    );

    HttpResponse::Ok().json(response)
}

/// Ranked matches together with the marks and preferences that produced them
///
/// POST /api/v1/matches/debug
async fn debug_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", errors.to_string());
    }

    // Debug output always reflects the store, never a cached copy
    let profile = match state.postgres.load_profile(req.student_id).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Failed to load profile for {}: {}", req.student_id, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "profile_unavailable", e.to_string());
        }
    };

    let catalog = match fetch_catalog(&state).await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("Failed to load program catalog: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "catalog_unavailable", e.to_string());
        }
    };

    let limit = req.limit.map(|limit| limit.min(state.max_limit));
    match debug_ranking(&state.matcher, profile, &catalog, limit) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e @ MatchError::InsufficientProfile { .. }) => {
            tracing::info!("Cannot rank programs for student {}: {}", req.student_id, e);
            error_response(StatusCode::BAD_REQUEST, "insufficient_profile", e.to_string())
        }
    }
}

/// Rank `catalog` and return the matches alongside the inputs that produced them
pub(crate) fn debug_ranking(
    matcher: &Matcher,
    profile: StudentProfile,
    catalog: &[CatalogEntry],
    limit: Option<u16>,
) -> Result<DebugMatchesResponse, MatchError> {
    let mut matches = matcher.compute_matches(&profile, catalog)?.matches;
    if let Some(limit) = limit {
        matches.truncate(limit as usize);
    }

    Ok(DebugMatchesResponse {
        matches,
        preferences: profile.preferences,
        marks: profile.marks,
    })
}

/// Student profile through the cache; cache failures fall back to the store
pub(crate) async fn fetch_profile(
    state: &AppState,
    student_id: i64,
) -> Result<StudentProfile, PostgresError> {
    let key = CacheKey::profile(student_id);
    match state.cache.get::<StudentProfile>(&key).await {
        Ok(profile) => return Ok(profile),
        Err(CacheError::CacheMiss(_)) => {}
        Err(e) => tracing::warn!("Profile cache read failed for {}: {}", student_id, e),
    }

    let profile = state.postgres.load_profile(student_id).await?;
    if let Err(e) = state.cache.set(&key, &profile).await {
        tracing::warn!("Failed to cache profile for {}: {}", student_id, e);
    }
    Ok(profile)
}

/// Program catalog through the cache; cache failures fall back to the store
pub(crate) async fn fetch_catalog(state: &AppState) -> Result<Vec<CatalogEntry>, PostgresError> {
    let key = CacheKey::catalog();
    match state.cache.get::<Vec<CatalogEntry>>(&key).await {
        Ok(catalog) => return Ok(catalog),
        Err(CacheError::CacheMiss(_)) => {}
        Err(e) => tracing::warn!("Catalog cache read failed: {}", e),
    }

    let catalog = state.postgres.load_catalog().await?;
    if let Err(e) = state.cache.set(&key, &catalog).await {
        tracing::warn!("Failed to cache catalog: {}", e);
    }
    Ok(catalog)
}

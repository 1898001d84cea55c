use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{RankRequest, DashboardQuery, RankResponse, RecordedMatchesResponse, HealthResponse, ErrorResponse};
use crate::services::{PostgresClient, StoreError};
use crate::core::{Matcher, MatchError, MatchRecorder, ProfileSource};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn ProfileSource>,
    pub recorder: Arc<dyn MatchRecorder>,
    /// Present when profiles and matches live in PostgreSQL
    pub postgres: Option<Arc<PostgresClient>>,
    pub matcher: Matcher,
    pub default_limit: u16,
    pub max_limit: u16,
}

impl AppState {
    fn effective_limit(&self, requested: Option<u16>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit) as usize
    }
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/rank", web::post().to(rank_snapshot))
        .route("/matches/{user_id}", web::get().to(dashboard_matches))
        .route("/matches/{user_id}/recorded", web::get().to(recorded_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = match &state.postgres {
        Some(pg) => pg.health_check().await.unwrap_or(false),
        None => true,
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Rank an inline snapshot without recording anything
///
/// POST /api/v1/matches/rank
///
/// Request body:
/// ```json
/// {
///   "subject": { "userId": "string", "sleepSchedule": "early", ... },
///   "candidates": [ ... ],
///   "limit": 5
/// }
/// ```
async fn rank_snapshot(
    state: web::Data<AppState>,
    req: web::Json<RankRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rank request: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let limit = state.effective_limit(req.limit);

    match state.matcher.rank(&req.subject, &req.candidates, limit) {
        Ok(matches) => HttpResponse::Ok().json(RankResponse {
            matches,
            total_candidates: req.candidates.len(),
        }),
        Err(e) => match_error_response(&req.subject.user_id, e),
    }
}

/// Dashboard matches for a stored profile
///
/// GET /api/v1/matches/{userId}?limit=5
///
/// Reads a snapshot from the profile source, ranks it and records the
/// shown matches.
async fn dashboard_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<DashboardQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let user_id = path.into_inner();
    let limit = state.effective_limit(query.limit);

    tracing::info!("Ranking matches for user: {}, limit: {}", user_id, limit);

    let subject = match state.source.subject(&user_id).await {
        Ok(profile) => profile,
        Err(e) => return store_error_response("Failed to fetch profile", &user_id, e),
    };

    let candidates = match state.source.candidates(&user_id).await {
        Ok(candidates) => candidates,
        Err(e) => return store_error_response("Failed to fetch candidates", &user_id, e),
    };

    let matches = match state.matcher.rank(&subject, &candidates, limit) {
        Ok(matches) => matches,
        Err(e) => return match_error_response(&user_id, e),
    };

    // Recording feeds metrics only; the dashboard still renders without it
    if let Err(e) = state.recorder.record(&user_id, &matches).await {
        tracing::warn!("Failed to record shown matches for {}: {}", user_id, e);
    }

    tracing::info!(
        "Returning {} matches for user {} (from {} candidates)",
        matches.len(),
        user_id,
        candidates.len()
    );

    HttpResponse::Ok().json(RankResponse {
        matches,
        total_candidates: candidates.len(),
    })
}

/// Recorded matches and aggregate stats for a subject
///
/// GET /api/v1/matches/{userId}/recorded
async fn recorded_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let user_id = path.into_inner();

    let matches = match state.recorder.recorded(&user_id).await {
        Ok(matches) => matches,
        Err(e) => return store_error_response("Failed to fetch recorded matches", &user_id, e),
    };

    match state.recorder.stats(&user_id).await {
        Ok(stats) => HttpResponse::Ok().json(RecordedMatchesResponse { matches, stats }),
        Err(e) => store_error_response("Failed to fetch match stats", &user_id, e),
    }
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

fn match_error_response(user_id: &str, e: MatchError) -> HttpResponse {
    tracing::info!("Rejected ranking input for {}: {}", user_id, e);
    bad_request("Invalid profile data", e.to_string())
}

fn store_error_response(error: &str, user_id: &str, e: StoreError) -> HttpResponse {
    match e {
        StoreError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Profile not found".to_string(),
            message: e.to_string(),
            status_code: 404,
        }),
        _ => {
            tracing::error!("{} for {}: {}", error, user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: error.to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InMemoryProfileSource, InMemoryRecorder};

    fn create_state(max_limit: u16) -> AppState {
        AppState {
            source: Arc::new(InMemoryProfileSource::default()),
            recorder: Arc::new(InMemoryRecorder::new()),
            postgres: None,
            matcher: Matcher::with_default_weights(),
            default_limit: 5,
            max_limit,
        }
    }

    #[test]
    fn test_effective_limit() {
        let state = create_state(50);
        assert_eq!(state.effective_limit(None), 5);
        assert_eq!(state.effective_limit(Some(12)), 12);
        assert_eq!(state.effective_limit(Some(500)), 50);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = store_error_response("x", "ghost", StoreError::NotFound("ghost".to_string()));
        assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);

        let response = store_error_response("x", "ghost", StoreError::InvalidInput("bad".to_string()));
        assert_eq!(response.status(), actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}

//! Internal operational endpoints: cache inspection, sweep, manual
//! invalidation and health.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use tracing::info;

use super::handlers::AppState;
use crate::error::{AppError, Result};
use crate::models::{
    CacheStatsResponse, HealthResponse, InvalidateParams, InvalidateResponse, SweepResponse,
};

/// Handler for GET /api/internal/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let stats = state.cache.read().await.stats();
    Json(CacheStatsResponse::new(stats))
}

/// Handler for POST /api/internal/cache/sweep
///
/// Runs the same sweep as the background task.
pub async fn cache_sweep_handler(State(state): State<AppState>) -> Json<SweepResponse> {
    let report = state.cache.write().await.sweep();
    info!(
        cleaned = report.cleaned,
        before = report.before,
        after = report.after,
        "manual cache sweep"
    );
    Json(SweepResponse::new(report))
}

/// Handler for POST /api/internal/cache/invalidate
///
/// Accepts `?key=` or `?prefix=`; `key` wins when both are given.
pub async fn cache_invalidate_handler(
    State(state): State<AppState>,
    params: std::result::Result<Query<InvalidateParams>, QueryRejection>,
) -> Result<Json<InvalidateResponse>> {
    let Query(params) = params.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    let key = params.key.filter(|k| !k.is_empty());
    let prefix = params.prefix.filter(|p| !p.is_empty());

    let response = match (key, prefix) {
        (Some(key), _) => {
            let removed = state.cache.write().await.invalidate(&key);
            info!(key = %key, removed, "manual cache invalidation");
            InvalidateResponse::for_key(key, removed)
        }
        (None, Some(prefix)) => {
            let invalidated = state.cache.write().await.invalidate_prefix(&prefix);
            info!(prefix = %prefix, invalidated, "manual cache invalidation");
            InvalidateResponse::for_prefix(prefix, invalidated)
        }
        (None, None) => {
            return Err(AppError::InvalidRequest(
                "Provide either 'key' or 'prefix'".to_string(),
            ))
        }
    };

    Ok(Json(response))
}

/// Handler for GET /health and GET /api/internal/health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.cache.read().await.stats();
    Json(HealthResponse::healthy(
        stats,
        state.started_at.elapsed().as_secs(),
    ))
}

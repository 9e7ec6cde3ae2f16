//! API Handlers
//!
//! HTTP request handlers for the PRO listing and PRO write endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header::IF_NONE_MATCH, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::conditional::{etag_matches, validator_headers};
use crate::cache::{CacheStore, PROS_PREFIX};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    CreateProRequest, DeleteResponse, ListProsQuery, ListingResponse, ProResponse,
    UpdateProRequest,
};
use crate::pros::{fetch_listing, ListingPlan, ListingSettings, Pro, SharedListingCache, PROS_COLLECTION};
use crate::store::DocumentStore;

/// Application state shared across all handlers.
///
/// The listing cache sits behind `Arc<RwLock<>>`; the lock is never held
/// across a store call.
#[derive(Clone)]
pub struct AppState {
    /// Listing cache
    pub cache: SharedListingCache,
    /// Backing document store
    pub store: Arc<dyn DocumentStore>,
    pub settings: ListingSettings,
    pub started_at: Instant,
}

impl AppState {
    /// Creates a new AppState over the given store with an empty cache.
    pub fn new(store: Arc<dyn DocumentStore>, settings: ListingSettings) -> Self {
        Self {
            cache: Arc::new(RwLock::new(CacheStore::new())),
            store,
            settings,
            started_at: Instant::now(),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config, store: Arc<dyn DocumentStore>) -> Self {
        Self::new(store, ListingSettings::from_config(config))
    }

    /// Drops every cached listing after a PRO write.
    async fn invalidate_listings(&self, event: &str, pro_id: &str) {
        let invalidated = self.cache.write().await.invalidate_prefix(PROS_PREFIX);
        info!(event, pro_id, invalidated, "listing cache invalidated");
    }

    async fn load_pro(&self, id: &str) -> Result<Pro> {
        let document = self
            .store
            .get(PROS_COLLECTION, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("PRO '{}' not found", id)))?;
        let pro = Pro::from_document(&document)?;
        if pro.is_deleted() {
            return Err(AppError::NotFound(format!("PRO '{}' not found", id)));
        }
        Ok(pro)
    }

    async fn save_pro(&self, id: &str, pro: &Pro) -> Result<()> {
        self.store.put(PROS_COLLECTION, pro.to_document(id)?).await?;
        Ok(())
    }
}

/// Handler for GET /api/pros
///
/// Serves listings cache-first with conditional GET support. A miss runs
/// the radius search (or the plain filtered query) and populates the cache.
pub async fn list_pros_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListProsQuery>, QueryRejection>,
    headers: HeaderMap,
) -> Result<Response> {
    let Query(query) = query.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    let plan = ListingPlan::from_query(&query, &state.settings)?;

    // Write lock: a lookup updates hit/miss counters
    let cached = state.cache.write().await.get(&plan.cache_key);
    let entry = match cached {
        Some(entry) => {
            debug!(key = %plan.cache_key, "listing cache hit");
            entry
        }
        None => {
            debug!(key = %plan.cache_key, "listing cache miss");
            let listing = fetch_listing(state.store.as_ref(), &plan).await?;
            state
                .cache
                .write()
                .await
                .set(plan.cache_key.clone(), listing, state.settings.ttl_seconds)?
        }
    };

    let response_headers = validator_headers(&entry.etag, state.settings.ttl_seconds);
    let not_modified = headers
        .get(IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| etag_matches(value, &entry.etag));
    if not_modified {
        return Ok((StatusCode::NOT_MODIFIED, response_headers).into_response());
    }

    Ok((
        StatusCode::OK,
        response_headers,
        Json(ListingResponse::new(entry.value)),
    )
        .into_response())
}

/// Handler for GET /api/pros/:id
pub async fn get_pro_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProResponse>> {
    let pro = state.load_pro(&id).await?;
    Ok(Json(ProResponse::new(id, pro)))
}

/// Handler for POST /api/pros
///
/// New PROs start pending with an inactive subscription.
pub async fn create_pro_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<CreateProRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProResponse>)> {
    let Json(req) = body.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let id = Uuid::new_v4().to_string();
    let pro = Pro::from_create(req, Utc::now());
    state.save_pro(&id, &pro).await?;
    state.invalidate_listings("create", &id).await;

    Ok((StatusCode::CREATED, Json(ProResponse::new(id, pro))))
}

/// Handler for PUT /api/pros/:id
pub async fn update_pro_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<UpdateProRequest>, JsonRejection>,
) -> Result<Json<ProResponse>> {
    let Json(req) = body.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let mut pro = state.load_pro(&id).await?;
    pro.apply_update(req, Utc::now());
    state.save_pro(&id, &pro).await?;
    state.invalidate_listings("update", &id).await;

    Ok(Json(ProResponse::new(id, pro)))
}

/// Handler for DELETE /api/pros/:id
///
/// Soft delete: the document stays in the store, hidden.
pub async fn delete_pro_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let mut pro = state.load_pro(&id).await?;
    pro.soft_delete(Utc::now());
    state.save_pro(&id, &pro).await?;
    state.invalidate_listings("delete", &id).await;

    Ok(Json(DeleteResponse::new(id)))
}

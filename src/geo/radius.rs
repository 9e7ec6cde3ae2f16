//! Radius search over a document store's geohash index.

use std::collections::HashSet;

use futures::future::try_join_all;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::{bounding_ranges, distance_km, GeoPoint};
use crate::store::{DocumentStore, Filter, RangeQuery, StoreError};

/// Field holding the derived geohash on indexed documents.
pub const GEOHASH_FIELD: &str = "geohash";

/// Field holding the authoritative `{lat, lng}` coordinates.
pub const GEO_FIELD: &str = "geo";

pub const DEFAULT_SEARCH_LIMIT: usize = 50;

// == Radius Query ==
/// A search for documents within `radius_km` of `center`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusQuery {
    pub center: GeoPoint,
    pub radius_km: f64,
    /// Predicates passed verbatim to every range query
    pub filters: Vec<Filter>,
    pub limit: usize,
}

impl RadiusQuery {
    pub fn new(center: GeoPoint, radius_km: f64) -> Self {
        Self {
            center,
            radius_km,
            filters: Vec::new(),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

// == Geo Match ==
/// A document found within the search radius.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoMatch {
    pub id: String,
    pub distance_km: f64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

// == Search ==
/// Runs one range query per bounding range, then keeps the unique documents
/// whose great-circle distance is at most `radius_km` (inclusive), nearest
/// first, truncated to `limit`.
///
/// Any failing sub-query fails the whole search.
pub async fn search(
    store: &dyn DocumentStore,
    collection: &str,
    query: &RadiusQuery,
) -> Result<Vec<GeoMatch>, StoreError> {
    let ranges = bounding_ranges(query.center, query.radius_km * 1000.0);
    debug!(
        "Radius search around ({}, {}) r={}km over {} geohash ranges",
        query.center.lat,
        query.center.lng,
        query.radius_km,
        ranges.len()
    );

    let range_queries: Vec<RangeQuery> = ranges
        .into_iter()
        .map(|range| RangeQuery {
            order_by: GEOHASH_FIELD.to_string(),
            start: range.start,
            end: range.end,
            filters: query.filters.clone(),
            limit: query.limit,
        })
        .collect();

    let batches = try_join_all(
        range_queries
            .iter()
            .map(|range_query| store.range_query(collection, range_query)),
    )
    .await?;

    let mut seen = HashSet::new();
    let mut matches = Vec::new();
    for doc in batches.into_iter().flatten() {
        if !seen.insert(doc.id.clone()) {
            continue;
        }
        let Some(point) = document_point(&doc.fields) else {
            continue;
        };

        let distance = distance_km(query.center, point);
        if distance <= query.radius_km {
            matches.push(GeoMatch {
                id: doc.id,
                distance_km: distance,
                fields: doc.fields,
            });
        }
    }

    matches.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    matches.truncate(query.limit);
    Ok(matches)
}

/// Reads valid coordinates from a document, if it has any.
fn document_point(fields: &Map<String, Value>) -> Option<GeoPoint> {
    let point: GeoPoint = serde_json::from_value(fields.get(GEO_FIELD)?.clone()).ok()?;
    point.validate().is_none().then_some(point)
}

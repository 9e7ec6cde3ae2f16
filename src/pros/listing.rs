//! PRO listing: request normalization, cache keys and the store lookup
//! behind a cache miss.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{Category, ProStatus, SubscriptionStatus, PROS_COLLECTION};
use crate::cache::{CacheStore, PROS_PREFIX};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::geo::{self, GeoPoint, RadiusQuery};
use crate::models::ListProsQuery;
use crate::store::{DocumentStore, Filter, StoreError};

/// Cache holding listing results.
pub type ListingCache = CacheStore<Vec<ProListing>>;

/// Listing cache shared by every request handler.
pub type SharedListingCache = Arc<RwLock<ListingCache>>;

/// Placeholder for an absent component of a cache key.
const KEY_ANY: &str = "-";
const KEY_ANY_CATEGORY: &str = "*";

// == Listing Settings ==
/// Tunables for listing requests, taken from [`Config`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListingSettings {
    pub ttl_seconds: u64,
    pub default_radius_km: f64,
    pub max_radius_km: f64,
    pub default_limit: usize,
    pub max_limit: usize,
    pub bucket_decimals: u32,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ListingSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ttl_seconds: config.listing_ttl,
            default_radius_km: config.default_radius_km,
            max_radius_km: config.max_radius_km,
            default_limit: config.default_limit,
            max_limit: config.max_limit,
            bucket_decimals: config.location_bucket_decimals,
        }
    }
}

// == Pro Listing ==
/// One row of a listing response: `{id, distanceKm?, ...fields}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProListing {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

// == Listing Plan ==
/// Search area of a geo listing, centred on the bucketed coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchArea {
    pub center: GeoPoint,
    pub radius_km: f64,
}

/// A validated, normalized listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPlan {
    pub cache_key: String,
    pub area: Option<SearchArea>,
    pub category: Option<Category>,
    pub limit: usize,
}

impl ListingPlan {
    /// Validates query parameters and derives the cache key.
    ///
    /// Equal normalized parameters always produce the same key, and the key
    /// carries every parameter that affects the result.
    pub fn from_query(query: &ListProsQuery, settings: &ListingSettings) -> Result<Self> {
        let limit = query.limit.unwrap_or(settings.default_limit);
        if limit == 0 || limit > settings.max_limit {
            return Err(AppError::InvalidRequest(format!(
                "limit must be between 1 and {}",
                settings.max_limit
            )));
        }

        let area = match (query.lat, query.lng) {
            (Some(lat), Some(lng)) => {
                let raw = GeoPoint::new(lat, lng);
                if let Some(msg) = raw.validate() {
                    return Err(AppError::InvalidRequest(msg));
                }
                let radius_km = query.radius.unwrap_or(settings.default_radius_km);
                if !radius_km.is_finite() || !(1.0..=settings.max_radius_km).contains(&radius_km) {
                    return Err(AppError::InvalidRequest(format!(
                        "radius must be between 1 and {} km",
                        settings.max_radius_km
                    )));
                }
                let center = GeoPoint::new(
                    bucket(lat, settings.bucket_decimals),
                    bucket(lng, settings.bucket_decimals),
                );
                Some(SearchArea { center, radius_km })
            }
            (None, None) => None,
            _ => {
                return Err(AppError::InvalidRequest(
                    "lat and lng must be supplied together".to_string(),
                ))
            }
        };

        let cache_key = cache_key(area.as_ref(), query.category, limit);
        Ok(Self {
            cache_key,
            area,
            category: query.category,
            limit,
        })
    }

    /// Store predicates selecting listable PROs.
    pub fn filters(&self) -> Vec<Filter> {
        let mut filters = vec![
            Filter::eq("status", ProStatus::Approved.as_str()),
            Filter::eq("subscriptionStatus", SubscriptionStatus::Active.as_str()),
            Filter::eq("visible", true),
        ];
        if let Some(category) = self.category {
            filters.push(Filter::array_contains("categories", category.as_str()));
        }
        filters
    }
}

/// Rounds a coordinate to the configured location bucket.
fn bucket(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    // `+ 0.0` folds -0.0 into 0.0 so both format identically
    (value * scale).round() / scale + 0.0
}

fn cache_key(area: Option<&SearchArea>, category: Option<Category>, limit: usize) -> String {
    let category = category.map_or(KEY_ANY_CATEGORY, |c| c.as_str());
    match area {
        Some(area) => format!(
            "{}{}:{}:{}:{}:{}",
            PROS_PREFIX, area.center.lat, area.center.lng, area.radius_km, category, limit
        ),
        None => format!(
            "{}{}:{}:{}:{}:{}",
            PROS_PREFIX, KEY_ANY, KEY_ANY, KEY_ANY, category, limit
        ),
    }
}

// == Fetch ==
/// Loads the listing for a plan from the store.
///
/// Geo plans go through the radius search, others through a plain filtered
/// query.
pub async fn fetch_listing(
    store: &dyn DocumentStore,
    plan: &ListingPlan,
) -> std::result::Result<Vec<ProListing>, StoreError> {
    match plan.area {
        Some(area) => {
            let query = RadiusQuery::new(area.center, area.radius_km)
                .with_filters(plan.filters())
                .with_limit(plan.limit);
            let matches = geo::search(store, PROS_COLLECTION, &query).await?;
            Ok(matches
                .into_iter()
                .map(|m| ProListing {
                    id: m.id,
                    distance_km: Some(m.distance_km),
                    fields: m.fields,
                })
                .collect())
        }
        None => {
            let docs = store
                .find(PROS_COLLECTION, &plan.filters(), plan.limit)
                .await?;
            Ok(docs
                .into_iter()
                .map(|doc| ProListing {
                    id: doc.id,
                    distance_km: None,
                    fields: doc.fields,
                })
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Document, MemoryStore};
    use serde_json::json;

    fn query(lat: Option<f64>, lng: Option<f64>, radius: Option<f64>) -> ListProsQuery {
        ListProsQuery {
            lat,
            lng,
            radius,
            category: Some(Category::Veterinari),
            limit: None,
        }
    }

    #[test]
    fn test_geo_cache_key() {
        let plan = ListingPlan::from_query(
            &query(Some(45.5), Some(9.2), Some(10.0)),
            &ListingSettings::default(),
        )
        .unwrap();

        assert_eq!(plan.cache_key, "pros:45.5:9.2:10:veterinari:20");
        assert_eq!(plan.limit, 20);
    }

    #[test]
    fn test_nearby_coordinates_share_bucket() {
        let settings = ListingSettings::default();
        let a = ListingPlan::from_query(&query(Some(45.4642), Some(9.1901), Some(10.0)), &settings).unwrap();
        let b = ListingPlan::from_query(&query(Some(45.4598), Some(9.1949), Some(10.0)), &settings).unwrap();

        assert_eq!(a.cache_key, b.cache_key);
        assert_eq!(a.area.unwrap().center, GeoPoint::new(45.46, 9.19));
    }

    #[test]
    fn test_distinct_shapes_get_distinct_keys() {
        let settings = ListingSettings::default();
        let base = ListingPlan::from_query(&query(Some(45.5), Some(9.2), Some(10.0)), &settings).unwrap();
        let wider = ListingPlan::from_query(&query(Some(45.5), Some(9.2), Some(20.0)), &settings).unwrap();
        let mut other_category = query(Some(45.5), Some(9.2), Some(10.0));
        other_category.category = Some(Category::Parchi);
        let other_category = ListingPlan::from_query(&other_category, &settings).unwrap();
        let plain = ListingPlan::from_query(&query(None, None, None), &settings).unwrap();

        let keys = [
            &base.cache_key,
            &wider.cache_key,
            &other_category.cache_key,
            &plain.cache_key,
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
            assert!(a.starts_with(PROS_PREFIX));
        }
        assert_eq!(plain.cache_key, "pros:-:-:-:veterinari:20");
    }

    #[test]
    fn test_default_radius_applies() {
        let plan = ListingPlan::from_query(&query(Some(45.5), Some(9.2), None), &ListingSettings::default()).unwrap();
        assert_eq!(plan.area.unwrap().radius_km, 10.0);
    }

    #[test]
    fn test_negative_zero_bucket() {
        assert_eq!(format!("{}", bucket(-0.001, 2)), "0");
    }

    #[test]
    fn test_validation_errors() {
        let settings = ListingSettings::default();
        let cases = [
            query(Some(45.5), None, None),
            query(Some(95.0), Some(9.2), None),
            query(Some(45.5), Some(9.2), Some(0.5)),
            query(Some(45.5), Some(9.2), Some(500.0)),
        ];
        for case in cases {
            assert!(matches!(
                ListingPlan::from_query(&case, &settings),
                Err(AppError::InvalidRequest(_))
            ));
        }

        let mut too_many = query(None, None, None);
        too_many.limit = Some(101);
        assert!(ListingPlan::from_query(&too_many, &settings).is_err());
    }

    #[test]
    fn test_filters_include_category() {
        let plan = ListingPlan::from_query(&query(None, None, None), &ListingSettings::default()).unwrap();
        let filters = plan.filters();

        assert!(filters.contains(&Filter::eq("status", "approved")));
        assert!(filters.contains(&Filter::eq("subscriptionStatus", "active")));
        assert!(filters.contains(&Filter::array_contains("categories", "veterinari")));
    }

    async fn seed(store: &MemoryStore, id: &str, lat: f64, lng: f64, category: &str, status: &str) {
        let point = GeoPoint::new(lat, lng);
        let fields = json!({
            "displayName": id,
            "categories": [category],
            "geo": point,
            "geohash": point.geohash(),
            "status": status,
            "subscriptionStatus": "active",
            "visible": true,
        });
        store
            .put(PROS_COLLECTION, Document::new(id, fields.as_object().cloned().unwrap()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_fetch_geo_listing() {
        let store = MemoryStore::new();
        seed(&store, "near", 45.47, 9.19, "veterinari", "approved").await;
        seed(&store, "parco", 45.47, 9.19, "parchi", "approved").await;
        seed(&store, "pending", 45.46, 9.19, "veterinari", "pending").await;
        seed(&store, "far", 46.5, 9.19, "veterinari", "approved").await;

        let plan = ListingPlan::from_query(&query(Some(45.46), Some(9.19), Some(10.0)), &ListingSettings::default()).unwrap();
        let listing = fetch_listing(&store, &plan).await.unwrap();

        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].id, "near");
        assert!(listing[0].distance_km.unwrap() < 2.0);
    }

    #[tokio::test]
    async fn test_fetch_plain_listing() {
        let store = MemoryStore::new();
        seed(&store, "a", 45.47, 9.19, "veterinari", "approved").await;
        seed(&store, "b", 41.9, 12.5, "veterinari", "approved").await;
        seed(&store, "c", 41.9, 12.5, "parchi", "approved").await;

        let plan = ListingPlan::from_query(&query(None, None, None), &ListingSettings::default()).unwrap();
        let listing = fetch_listing(&store, &plan).await.unwrap();

        let ids: Vec<_> = listing.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(listing.iter().all(|p| p.distance_km.is_none()));
    }
}

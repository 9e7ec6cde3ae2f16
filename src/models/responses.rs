//! Response DTOs for the PRO directory API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, SweepReport};
use crate::pros::{Pro, ProListing};

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Body of a `200` listing response (`GET /api/pros`)
#[derive(Debug, Clone, Serialize)]
pub struct ListingResponse {
    pub ok: bool,
    pub data: Vec<ProListing>,
}

impl ListingResponse {
    pub fn new(data: Vec<ProListing>) -> Self {
        Self { ok: true, data }
    }
}

/// Single PRO returned by detail and write endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ProResponse {
    pub ok: bool,
    pub id: String,
    pub data: Pro,
}

impl ProResponse {
    pub fn new(id: impl Into<String>, data: Pro) -> Self {
        Self {
            ok: true,
            id: id.into(),
            data,
        }
    }
}

/// Response body for `DELETE /api/pros/:id`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub ok: bool,
    pub message: String,
    pub id: String,
}

impl DeleteResponse {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            ok: true,
            message: format!("PRO '{}' deleted successfully", id),
            id,
        }
    }
}

/// Response body for `GET /api/internal/cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub ok: bool,
    pub cache: CacheStats,
    pub timestamp: String,
}

impl CacheStatsResponse {
    pub fn new(cache: CacheStats) -> Self {
        Self {
            ok: true,
            cache,
            timestamp: now_rfc3339(),
        }
    }
}

/// Response body for `POST /api/internal/cache/sweep`
#[derive(Debug, Clone, Serialize)]
pub struct SweepResponse {
    pub ok: bool,
    pub message: String,
    #[serde(flatten)]
    pub report: SweepReport,
    pub timestamp: String,
}

impl SweepResponse {
    pub fn new(report: SweepReport) -> Self {
        Self {
            ok: true,
            message: "Cache sweep completed".to_string(),
            report,
            timestamp: now_rfc3339(),
        }
    }
}

/// Response body for `POST /api/internal/cache/invalidate`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub ok: bool,
    pub message: String,
    pub invalidated: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub timestamp: String,
}

impl InvalidateResponse {
    pub fn for_key(key: impl Into<String>, removed: bool) -> Self {
        Self {
            ok: true,
            message: "Cache invalidation completed".to_string(),
            invalidated: usize::from(removed),
            prefix: None,
            key: Some(key.into()),
            timestamp: now_rfc3339(),
        }
    }

    pub fn for_prefix(prefix: impl Into<String>, invalidated: usize) -> Self {
        Self {
            ok: true,
            message: "Cache invalidation completed".to_string(),
            invalidated,
            prefix: Some(prefix.into()),
            key: None,
            timestamp: now_rfc3339(),
        }
    }
}

/// Response body for the health endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub ok: bool,
    /// Health status (e.g., "healthy")
    pub status: String,
    pub cache: CacheStats,
    pub uptime_seconds: u64,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy(cache: CacheStats, uptime_seconds: u64) -> Self {
        Self {
            ok: true,
            status: "healthy".to_string(),
            cache,
            uptime_seconds,
            timestamp: now_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    /// Error message describing what went wrong
    pub error: String,
    /// Stable machine-readable error code
    pub code: &'static str,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: &'static str) -> Self {
        Self {
            ok: false,
            error: error.into(),
            code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_response_is_flat() {
        let resp = SweepResponse::new(SweepReport {
            cleaned: 2,
            before: 5,
            after: 3,
        });
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["cleaned"], 2);
        assert_eq!(json["before"], 5);
        assert_eq!(json["after"], 3);
        assert!(json.get("report").is_none());
    }

    #[test]
    fn test_invalidate_response_omits_unused_selector() {
        let json = serde_json::to_value(InvalidateResponse::for_prefix("pros:", 4)).unwrap();
        assert_eq!(json["invalidated"], 4);
        assert_eq!(json["prefix"], "pros:");
        assert!(json.get("key").is_none());

        let json = serde_json::to_value(InvalidateResponse::for_key("pros:x", false)).unwrap();
        assert_eq!(json["invalidated"], 0);
        assert!(json.get("prefix").is_none());
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy(CacheStats::new(1, 1, 1), 42);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["uptimeSeconds"], 42);
        assert_eq!(json["cache"]["hitRate"], "50.00%");
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn test_error_response_serialize() {
        let json = serde_json::to_value(ErrorResponse::new("Something went wrong", "INTERNAL_ERROR")).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"], "Something went wrong");
        assert_eq!(json["code"], "INTERNAL_ERROR");
    }
}

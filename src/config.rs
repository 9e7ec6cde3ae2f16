//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Lifetime of a cached listing in seconds
    pub listing_ttl: u64,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// Radius used when a geo listing omits one
    pub default_radius_km: f64,
    pub max_radius_km: f64,
    /// Page size used when a listing omits `limit`
    pub default_limit: usize,
    pub max_limit: usize,
    /// Decimal places search coordinates are rounded to before keying the cache
    pub location_bucket_decimals: u32,
    /// JSON array of PRO documents loaded into the store at startup
    pub pros_seed_file: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `LISTING_TTL` - Listing cache TTL in seconds (default: 60)
    /// - `SWEEP_INTERVAL` - Expired-entry sweep frequency in seconds (default: 3600)
    /// - `DEFAULT_RADIUS_KM` - Default search radius (default: 10)
    /// - `MAX_RADIUS_KM` - Largest accepted search radius (default: 200)
    /// - `DEFAULT_LIMIT` - Default listing size (default: 20)
    /// - `MAX_LIMIT` - Largest accepted listing size (default: 100)
    /// - `LOCATION_BUCKET_DECIMALS` - Coordinate rounding for cache keys (default: 2)
    /// - `PROS_SEED_FILE` - Optional seed file path
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            listing_ttl: env_or("LISTING_TTL", defaults.listing_ttl),
            sweep_interval: env_or("SWEEP_INTERVAL", defaults.sweep_interval),
            default_radius_km: env_or("DEFAULT_RADIUS_KM", defaults.default_radius_km),
            max_radius_km: env_or("MAX_RADIUS_KM", defaults.max_radius_km),
            default_limit: env_or("DEFAULT_LIMIT", defaults.default_limit),
            max_limit: env_or("MAX_LIMIT", defaults.max_limit),
            location_bucket_decimals: env_or(
                "LOCATION_BUCKET_DECIMALS",
                defaults.location_bucket_decimals,
            ),
            pros_seed_file: env::var("PROS_SEED_FILE").ok().filter(|v| !v.is_empty()),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            listing_ttl: 60,
            sweep_interval: 3600,
            default_radius_km: 10.0,
            max_radius_km: 200.0,
            default_limit: 20,
            max_limit: 100,
            location_bucket_decimals: 2,
            pros_seed_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.listing_ttl, 60);
        assert_eq!(config.sweep_interval, 3600);
        assert_eq!(config.default_radius_km, 10.0);
        assert_eq!(config.max_limit, 100);
        assert!(config.pros_seed_file.is_none());
    }

    #[test]
    fn test_config_from_env() {
        // Only this test touches these variables
        env::set_var("LISTING_TTL", "120");
        env::set_var("MAX_RADIUS_KM", "not-a-number");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert_eq!(config.listing_ttl, 120);
        assert_eq!(config.max_radius_km, 200.0);
        assert_eq!(config.server_port, 8080);

        env::remove_var("LISTING_TTL");
        env::remove_var("MAX_RADIUS_KM");
    }
}

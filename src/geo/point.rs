//! Geographic coordinates.

use serde::{Deserialize, Serialize};

use super::geohash::{encode, GEOHASH_PRECISION};

// == Geo Point ==
/// A WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns an error message when a coordinate is out of range or not finite.
    pub fn validate(&self) -> Option<String> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Some(format!("Latitude {} must be within [-90, 90]", self.lat));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Some(format!("Longitude {} must be within [-180, 180]", self.lng));
        }
        None
    }

    /// Geohash at the precision stored on documents.
    ///
    /// Always derived from the coordinates, never stored independently.
    pub fn geohash(&self) -> String {
        encode(*self, GEOHASH_PRECISION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_bounds() {
        assert!(GeoPoint::new(90.0, 180.0).validate().is_none());
        assert!(GeoPoint::new(-90.0, -180.0).validate().is_none());
        assert!(GeoPoint::new(45.46, 9.19).validate().is_none());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(GeoPoint::new(90.5, 0.0).validate().is_some());
        assert!(GeoPoint::new(0.0, -180.1).validate().is_some());
        assert!(GeoPoint::new(f64::NAN, 0.0).validate().is_some());
    }

    #[test]
    fn test_geohash_follows_coordinates() {
        let mut point = GeoPoint::new(57.64911, 10.40744);
        assert_eq!(point.geohash(), "u4pruydqqv");

        point.lat = 42.6;
        point.lng = -5.6;
        assert!(point.geohash().starts_with("ezs42"));
    }
}

//! Geo Module
//!
//! Coordinates, geohash encoding, range planning and the radius search engine
//! used by the PRO listing.

mod distance;
mod geohash;
mod planner;
mod point;
mod radius;


pub use distance::{distance_km, EARTH_RADIUS_KM};
pub use geohash::{encode, GEOHASH_PRECISION};
pub use planner::{bounding_ranges, GeohashRange, MAX_QUERY_BITS};
pub use point::GeoPoint;
pub use radius::{search, GeoMatch, RadiusQuery, GEOHASH_FIELD, GEO_FIELD};

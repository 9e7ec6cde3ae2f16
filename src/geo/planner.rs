//! Geohash range planning for radius searches.
//!
//! A circle is covered by the geohash cells of nine sample points: the centre
//! and the north/south/east/west edges of the circle's bounding box, plus the
//! box corners. The cell resolution is chosen so that a cell is at least as
//! tall and as wide as the circle's half-extent, which means the bounding box
//! can touch at most three cells per axis and every one of them is sampled.

use std::f64::consts::FRAC_PI_2;

use serde::Serialize;

use super::distance::EARTH_RADIUS_KM;
use super::geohash::{char_value, encode, BASE32, BITS_PER_CHAR, GEOHASH_PRECISION};
use super::GeoPoint;

/// Finest resolution a range can have: the full stored geohash.
pub const MAX_QUERY_BITS: u32 = GEOHASH_PRECISION as u32 * BITS_PER_CHAR;

/// Sorts after every geohash character.
const RANGE_END_SENTINEL: char = '~';

/// Relative widening of the circle's extent to absorb float rounding.
const SPAN_PADDING: f64 = 1.0 + 1e-9;

// == Geohash Range ==
/// An inclusive range over geohash strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeohashRange {
    pub start: String,
    pub end: String,
}

impl GeohashRange {
    /// The whole geohash space.
    pub fn everything() -> Self {
        Self {
            start: String::new(),
            end: RANGE_END_SENTINEL.to_string(),
        }
    }

    pub fn contains(&self, geohash: &str) -> bool {
        geohash >= self.start.as_str() && geohash <= self.end.as_str()
    }
}

// == Bounding Ranges ==
/// Geohash ranges whose union covers every point within `radius_m` metres
/// of `center`.
///
/// The ranges over-include; callers must post-filter by exact distance.
pub fn bounding_ranges(center: GeoPoint, radius_m: f64) -> Vec<GeohashRange> {
    let angular = (radius_m.max(0.0) / 1000.0) / EARTH_RADIUS_KM;
    let lat_span = angular.to_degrees() * SPAN_PADDING;
    let lng_span = longitude_span(center.lat, angular) * SPAN_PADDING;

    let bits = query_bits(lat_span, lng_span);
    if bits == 0 {
        return vec![GeohashRange::everything()];
    }
    let precision = bits.div_ceil(BITS_PER_CHAR) as usize;

    let north = (center.lat + lat_span).min(90.0);
    let south = (center.lat - lat_span).max(-90.0);
    let west = wrap_longitude(center.lng - lng_span);
    let east = wrap_longitude(center.lng + lng_span);

    let mut ranges: Vec<GeohashRange> = Vec::with_capacity(9);
    for lat in [center.lat, north, south] {
        for lng in [center.lng, west, east] {
            let range = cell_range(&encode(GeoPoint::new(lat, lng), precision), bits);
            if !ranges.contains(&range) {
                ranges.push(range);
            }
        }
    }
    ranges
}

/// Largest longitude offset, in degrees, reached by a spherical cap of
/// `angular` radians centred at `lat` degrees. 360 when the cap holds a pole.
fn longitude_span(lat: f64, angular: f64) -> f64 {
    if angular >= FRAC_PI_2 {
        return 360.0;
    }
    let cos_lat = lat.to_radians().cos();
    let sin_radius = angular.sin();
    if cos_lat <= sin_radius {
        return 360.0;
    }
    (sin_radius / cos_lat).asin().to_degrees()
}

/// Number of leading geohash bits whose cells span at least the given
/// latitude and longitude extents.
fn query_bits(lat_span: f64, lng_span: f64) -> u32 {
    let lat_bits = axis_bits(180.0, lat_span);
    let lng_bits = axis_bits(360.0, lng_span);
    // Bits interleave starting with longitude: n bits hold ceil(n/2)
    // longitude bits and floor(n/2) latitude bits.
    (2 * lat_bits + 1).min(2 * lng_bits).min(MAX_QUERY_BITS)
}

/// Largest bit count whose cell width along an axis of `full` degrees is
/// still at least `span`.
fn axis_bits(full: f64, span: f64) -> u32 {
    if span <= 0.0 {
        return MAX_QUERY_BITS;
    }
    if span >= full {
        return 0;
    }
    let mut bits = (full / span).log2().floor().min(MAX_QUERY_BITS as f64) as u32;
    while bits > 0 && full / 2f64.powi(bits as i32) < span {
        bits -= 1;
    }
    bits
}

/// Range of every geohash inside the `bits`-bit cell holding `geohash`.
///
/// `geohash` must be exactly `ceil(bits / 5)` characters long.
fn cell_range(geohash: &str, bits: u32) -> GeohashRange {
    let (base, last) = geohash.split_at(geohash.len() - 1);
    let last_value = last.chars().next().and_then(char_value).unwrap_or(0);

    let significant = bits - BITS_PER_CHAR * base.len() as u32;
    let unused = BITS_PER_CHAR - significant;
    let first = (last_value >> unused) << unused;
    let final_char = first + (1 << unused) - 1;

    GeohashRange {
        start: format!("{}{}", base, BASE32[first] as char),
        end: format!("{}{}{}", base, BASE32[final_char] as char, RANGE_END_SENTINEL),
    }
}

/// Maps a longitude into `[-180, 180]`.
fn wrap_longitude(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        lng
    } else {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }
}

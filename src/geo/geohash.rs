//! Geohash encoding.
//!
//! Bits alternate longitude/latitude starting with longitude, five bits per
//! base32 character.

use super::GeoPoint;

// == Alphabet ==

/// Geohash alphabet, in sort order.
pub const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Characters stored in a document's `geohash` field.
pub const GEOHASH_PRECISION: usize = 10;

pub const BITS_PER_CHAR: u32 = 5;

// == Encode ==

/// Encodes `point` into a geohash of `precision` characters.
pub fn encode(point: GeoPoint, precision: usize) -> String {
    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut lng_range = (-180.0_f64, 180.0_f64);
    let mut hash = String::with_capacity(precision);
    let mut even_bit = true;
    let mut bits = 0u32;
    let mut value = 0usize;

    while hash.len() < precision {
        let (range, coordinate) = if even_bit {
            (&mut lng_range, point.lng)
        } else {
            (&mut lat_range, point.lat)
        };
        let mid = (range.0 + range.1) / 2.0;
        if coordinate >= mid {
            value = (value << 1) | 1;
            range.0 = mid;
        } else {
            value <<= 1;
            range.1 = mid;
        }
        even_bit = !even_bit;

        bits += 1;
        if bits == BITS_PER_CHAR {
            hash.push(BASE32[value] as char);
            bits = 0;
            value = 0;
        }
    }

    hash
}

/// Position of a geohash character in [`BASE32`].
pub fn char_value(c: char) -> Option<usize> {
    BASE32.iter().position(|&b| b as char == c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_points() {
        assert_eq!(encode(GeoPoint::new(57.64911, 10.40744), 11), "u4pruydqqvj");
        assert_eq!(encode(GeoPoint::new(42.6, -5.6), 5), "ezs42");
        assert_eq!(encode(GeoPoint::new(0.0, 0.0), 4), "s000");
    }

    #[test]
    fn test_encode_corners() {
        assert_eq!(encode(GeoPoint::new(-90.0, -180.0), 3), "000");
        assert_eq!(encode(GeoPoint::new(90.0, 180.0), 3), "zzz");
    }

    #[test]
    fn test_prefix_property() {
        let point = GeoPoint::new(45.4642, 9.19);
        let long = encode(point, 10);
        let short = encode(point, 6);
        assert!(long.starts_with(&short));
    }

    #[test]
    fn test_char_value() {
        assert_eq!(char_value('0'), Some(0));
        assert_eq!(char_value('b'), Some(10));
        assert_eq!(char_value('z'), Some(31));
        assert_eq!(char_value('a'), None);
    }
}

//! Encoded-polyline geometry codec.
//!
//! The routing provider returns geometry in the standard polyline format:
//! each coordinate is delta-encoded against the previous one, scaled by 1e5,
//! zigzag-signed and emitted as base-64-offset characters in 5-bit chunks,
//! latitude first. Decoded output preserves path order.

use crate::entities::Coordinates;
use crate::error::{format_error, Error};

const PRECISION: f64 = 1e5;

pub fn decode(encoded: &str) -> Result<Vec<Coordinates>, Error> {
    let bytes = encoded.as_bytes();
    let mut coordinates = Vec::new();

    let mut index = 0;
    let mut latitude = 0i64;
    let mut longitude = 0i64;

    while index < bytes.len() {
        let (delta_lat, next) = decode_value(bytes, index)?;
        let (delta_lng, after) = decode_value(bytes, next)?;
        index = after;

        latitude += delta_lat;
        longitude += delta_lng;

        coordinates.push(Coordinates::new(
            longitude as f64 / PRECISION,
            latitude as f64 / PRECISION,
        ));
    }

    Ok(coordinates)
}

pub fn encode(coordinates: &[Coordinates]) -> String {
    let mut encoded = String::new();

    let mut previous_lat = 0i64;
    let mut previous_lng = 0i64;

    for point in coordinates {
        let lat = (point.latitude * PRECISION).round() as i64;
        let lng = (point.longitude * PRECISION).round() as i64;

        encode_value(lat - previous_lat, &mut encoded);
        encode_value(lng - previous_lng, &mut encoded);

        previous_lat = lat;
        previous_lng = lng;
    }

    encoded
}

fn decode_value(bytes: &[u8], mut index: usize) -> Result<(i64, usize), Error> {
    let mut result = 0u64;
    let mut shift = 0u32;

    loop {
        if index >= bytes.len() || shift > 60 {
            // truncated chunk, or a value no real coordinate delta produces
            return Err(format_error());
        }

        let byte = bytes[index] as i64 - 63;
        if !(0..64).contains(&byte) {
            return Err(format_error());
        }

        result |= ((byte & 0x1f) as u64) << shift;
        shift += 5;
        index += 1;

        if byte < 0x20 {
            break;
        }
    }

    let value = if result & 1 == 1 {
        !(result >> 1) as i64
    } else {
        (result >> 1) as i64
    };

    Ok((value, index))
}

fn encode_value(value: i64, out: &mut String) {
    let mut value = if value < 0 { !(value << 1) } else { value << 1 };

    while value >= 0x20 {
        out.push((((value & 0x1f) | 0x20) + 63) as u8 as char);
        value >>= 5;
    }

    out.push((value + 63) as u8 as char);
}

#[cfg(test)]
mod tests {
    use super::*;

    // reference fixture from the polyline format documentation
    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn reference_points() -> Vec<Coordinates> {
        vec![
            Coordinates::new(-120.2, 38.5),
            Coordinates::new(-120.95, 40.7),
            Coordinates::new(-126.453, 43.252),
        ]
    }

    #[test]
    fn decodes_reference_polyline() {
        let decoded = decode(REFERENCE).unwrap();
        assert_eq!(decoded, reference_points());
    }

    #[test]
    fn encodes_reference_points() {
        assert_eq!(encode(&reference_points()), REFERENCE);
    }

    #[test]
    fn round_trips_arbitrary_paths() {
        let points = vec![
            Coordinates::new(-1.930556, 52.450556),
            Coordinates::new(-1.93061, 52.45102),
            Coordinates::new(-1.92988, 52.45155),
            Coordinates::new(0.0, 0.0),
            Coordinates::new(179.99999, -89.99999),
        ];

        let decoded = decode(&encode(&points)).unwrap();
        assert_eq!(decoded.len(), points.len());

        for (got, want) in decoded.iter().zip(&points) {
            assert!((got.longitude - want.longitude).abs() < 1e-5);
            assert!((got.latitude - want.latitude).abs() < 1e-5);
        }
    }

    #[test]
    fn empty_input_decodes_to_no_points() {
        assert_eq!(decode("").unwrap(), vec![]);
    }

    #[test]
    fn rejects_truncated_input() {
        // dropping the final byte leaves an unterminated chunk
        let truncated = &REFERENCE[..REFERENCE.len() - 1];
        assert!(decode(truncated).is_err());

        // a longitude chunk missing entirely
        assert!(decode("_p~iF").is_err());
    }

    #[test]
    fn rejects_bytes_outside_the_alphabet() {
        assert!(decode("_p~iF\x1f~ps|U").is_err());
        assert!(decode("!!!!").is_err());
    }
}

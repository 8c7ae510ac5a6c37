//! Decoder for the encoded polyline format used by route geometries.

use super::oracle::OracleError;
use crate::domain::GeoPoint;

/// Decode an encoded polyline (precision 1e-5) into points
pub fn decode_polyline(encoded: &str) -> Result<Vec<GeoPoint>, OracleError> {
    let mut bytes = encoded.bytes();
    let mut points = Vec::new();
    let (mut lat, mut lng) = (0i64, 0i64);

    loop {
        let Some(d_lat) = next_value(&mut bytes)? else {
            break;
        };
        let d_lng = next_value(&mut bytes)?
            .ok_or_else(|| OracleError::Malformed("polyline ends mid-coordinate".to_string()))?;
        lat += d_lat;
        lng += d_lng;
        points.push(GeoPoint::new(lat as f64 / 1e5, lng as f64 / 1e5));
    }

    Ok(points)
}

/// Read one zig-zag varint; `None` at a clean end of input
fn next_value(bytes: &mut impl Iterator<Item = u8>) -> Result<Option<i64>, OracleError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let Some(byte) = bytes.next() else {
            if shift == 0 {
                return Ok(None);
            }
            return Err(OracleError::Malformed("truncated polyline".to_string()));
        };
        if !(63..=126).contains(&byte) || shift > 60 {
            return Err(OracleError::Malformed(format!(
                "invalid polyline byte {byte:#04x}"
            )));
        }
        let chunk = (byte - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    let value = if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    };
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_reference_polyline() {
        let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        let expected = [(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)];

        assert_eq!(points.len(), expected.len());
        for (p, (lat, lng)) in points.iter().zip(expected) {
            assert!((p.lat - lat).abs() < 1e-9);
            assert!((p.lng - lng).abs() < 1e-9);
        }
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode_polyline("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_truncated() {
        assert!(decode_polyline("_p~iF").is_err());
        assert!(decode_polyline("_p~i").is_err());
    }
}

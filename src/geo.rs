use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, as used by the haversine formula.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 coordinate in decimal degrees.
///
/// Ranges are not validated; out-of-range input is accepted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Great-circle distance between two coordinates in meters (haversine).
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_to_self() {
        let p = Coordinate::new(36.632275, 127.453036);
        assert_eq!(distance_meters(p, p), 0.0);
    }

    #[test]
    fn symmetric() {
        let a = Coordinate::new(36.6245, 127.4545);
        let b = Coordinate::new(36.628345, 127.457695);
        assert_eq!(distance_meters(a, b), distance_meters(b, a));
    }

    #[test]
    fn known_distance_roughly_one_degree_latitude() {
        // One degree of latitude is ~111.2 km on a 6371 km sphere.
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let d = distance_meters(a, b);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn campus_spots_are_hundreds_of_meters_apart() {
        let gate = Coordinate::new(36.632275, 127.453036);
        let library = Coordinate::new(36.628345, 127.457695);
        let d = distance_meters(gate, library);
        assert!(d > 400.0 && d < 800.0, "got {d}");
    }
}

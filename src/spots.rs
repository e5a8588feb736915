use serde::{Deserialize, Serialize};

use crate::geo::{distance_meters, Coordinate};

/// A fixed real-world location with an arrival radius. Identity is `key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    pub key: String,
    pub name: String,
    pub center: Coordinate,
    pub radius_m: f64,
}

impl Spot {
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        distance_meters(coordinate, self.center) <= self.radius_m
    }
}

/// Ordered spot list. Order is load-bearing: arrival checks return the first
/// match in declaration order, not the nearest spot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotRegistry {
    spots: Vec<Spot>,
}

impl Default for SpotRegistry {
    fn default() -> Self {
        let spot = |key: &str, name: &str, lat: f64, lon: f64, radius_m: f64| Spot {
            key: key.to_string(),
            name: name.to_string(),
            center: Coordinate::new(lat, lon),
            radius_m,
        };

        Self {
            spots: vec![
                spot("hosp", "University Hospital", 36.6245, 127.4545, 80.0),
                spot("gate", "Main Gate", 36.632275, 127.453036, 80.0),
                spot("bio", "Bio Research Center (S20)", 36.628861, 127.452371, 80.0),
                spot("lib", "University Library", 36.628345, 127.457695, 80.0),
                spot("sb", "Campus Coffee Shop", 36.627559, 127.458570, 60.0),
            ],
        }
    }
}

impl SpotRegistry {
    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    pub fn get(&self, key: &str) -> Option<&Spot> {
        self.spots.iter().find(|s| s.key == key)
    }

    /// Override one spot's center and radius before tracking begins. Unknown
    /// keys are ignored; order is never affected.
    pub fn configure(&mut self, key: &str, lat: f64, lon: f64, radius_m: f64) {
        if let Some(spot) = self.spots.iter_mut().find(|s| s.key == key) {
            spot.center = Coordinate::new(lat, lon);
            spot.radius_m = radius_m;
        }
    }

    /// First spot in declaration order whose radius contains the coordinate.
    pub fn locate(&self, coordinate: Coordinate) -> Option<&Spot> {
        self.spots.iter().find(|s| s.contains(coordinate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_order_is_preserved() {
        let registry = SpotRegistry::default();
        let keys: Vec<&str> = registry.spots().iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["hosp", "gate", "bio", "lib", "sb"]);
    }

    #[test]
    fn locate_returns_first_match_in_declaration_order() {
        let mut registry = SpotRegistry::default();
        // Stack two spots on the same center; the earlier one must win even
        // though the later one is just as near.
        registry.configure("gate", 36.0, 127.0, 100.0);
        registry.configure("lib", 36.0, 127.0, 100.0);

        let hit = registry.locate(Coordinate::new(36.0, 127.0)).unwrap();
        assert_eq!(hit.key, "gate");
    }

    #[test]
    fn locate_prefers_declaration_order_over_nearness() {
        let mut registry = SpotRegistry::default();
        // "hosp" barely contains the point, "gate" is dead-center on it.
        registry.configure("hosp", 36.0004, 127.0, 80.0);
        registry.configure("gate", 36.0, 127.0, 80.0);

        let hit = registry.locate(Coordinate::new(36.0, 127.0)).unwrap();
        assert_eq!(hit.key, "hosp");
    }

    #[test]
    fn locate_outside_all_radii_is_none() {
        let registry = SpotRegistry::default();
        assert!(registry.locate(Coordinate::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn configure_overrides_center_and_radius() {
        let mut registry = SpotRegistry::default();
        registry.configure("sb", 10.0, 20.0, 120.0);
        let sb = registry.get("sb").unwrap();
        assert_eq!(sb.center, Coordinate::new(10.0, 20.0));
        assert_eq!(sb.radius_m, 120.0);
    }
}

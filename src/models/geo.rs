use serde::{Deserialize, Serialize};
use validator::Validate;

/// A latitude/longitude pair in signed degrees.
///
/// Range validation only happens on request bodies; values read back from
/// the store are used as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Coordinates {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Axis-aligned latitude/longitude rectangle.
///
/// Callers are expected to pass `southwest <= northeast` on both axes. Boxes
/// crossing the antimeridian are not wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub southwest: Coordinates,
    pub northeast: Coordinates,
}

impl MapBounds {
    pub fn new(southwest: Coordinates, northeast: Coordinates) -> Self {
        Self {
            southwest,
            northeast,
        }
    }

    /// Inclusive containment check on both axes
    pub fn contains(&self, point: &Coordinates) -> bool {
        point.latitude >= self.southwest.latitude
            && point.latitude <= self.northeast.latitude
            && point.longitude >= self.southwest.longitude
            && point.longitude <= self.northeast.longitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_contains_edges_inclusive() {
        let bounds = MapBounds::new(Coordinates::new(10.0, 20.0), Coordinates::new(11.0, 21.0));

        assert!(bounds.contains(&Coordinates::new(10.5, 20.5)));
        assert!(bounds.contains(&Coordinates::new(10.0, 20.0)));
        assert!(bounds.contains(&Coordinates::new(11.0, 21.0)));
        assert!(!bounds.contains(&Coordinates::new(9.99, 20.5)));
        assert!(!bounds.contains(&Coordinates::new(10.5, 21.01)));
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinates::new(40.0, -74.0).validate().is_ok());
        assert!(Coordinates::new(91.0, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, -181.0).validate().is_err());
    }
}

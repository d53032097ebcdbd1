use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

/// Start point used when the caller supplies no usable location
/// (University of Birmingham campus).
pub const FALLBACK_START: Coordinates = Coordinates {
    longitude: -1.930556,
    latitude: 52.450556,
};

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }
}

/// Minimal rectangle containing a route's geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Coordinates,
    pub max: Coordinates,
}

impl BoundingBox {
    /// Builds from the provider's flat bbox form: `[min_lon, min_lat,
    /// max_lon, max_lat]`, or the 3D variant that interleaves elevations as
    /// `[min_lon, min_lat, min_ele, max_lon, max_lat, max_ele]`. Elevations
    /// are dropped.
    pub fn from_flat(values: &[f64]) -> Option<Self> {
        let (min, max) = match values.len() {
            4 | 5 => (
                Coordinates::new(values[0], values[1]),
                Coordinates::new(values[2], values[3]),
            ),
            n if n >= 6 => (
                Coordinates::new(values[0], values[1]),
                Coordinates::new(values[3], values[4]),
            ),
            _ => return None,
        };

        Some(Self { min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_validity() {
        assert!(Coordinates::new(-1.930556, 52.450556).is_valid());
        assert!(Coordinates::new(-180.0, -90.0).is_valid());
        assert!(Coordinates::new(180.0, 90.0).is_valid());

        assert!(!Coordinates::new(-180.1, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, 90.5).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn bounding_box_from_flat() {
        let bbox = BoundingBox::from_flat(&[-1.95, 52.40, -1.88, 52.48]).unwrap();
        assert_eq!(bbox.min, Coordinates::new(-1.95, 52.40));
        assert_eq!(bbox.max, Coordinates::new(-1.88, 52.48));

        assert!(BoundingBox::from_flat(&[-1.95, 52.40]).is_none());
    }

    #[test]
    fn bounding_box_from_flat_drops_interleaved_elevations() {
        // 3D form: [min_lon, min_lat, min_ele, max_lon, max_lat, max_ele]
        let bbox = BoundingBox::from_flat(&[-1.95, 52.40, 10.0, -1.88, 52.48, 40.0]).unwrap();
        assert_eq!(bbox.min, Coordinates::new(-1.95, 52.40));
        assert_eq!(bbox.max, Coordinates::new(-1.88, 52.48));
    }
}

/// Geographic coordinates and local-flat metric conversions
use constants::coordinate_system::{METERS_PER_DEGREE_LATITUDE, meters_per_degree_longitude};
use serde::{Deserialize, Serialize};

/// WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check coordinate lies within valid WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Shift this coordinate by a metric offset using the scale factors at
    /// this point's latitude. Positive east/north move towards E/N.
    pub fn offset_by_meters(&self, east_meters: f64, north_meters: f64) -> GeoCoordinate {
        GeoCoordinate {
            latitude: self.latitude + north_meters / METERS_PER_DEGREE_LATITUDE,
            longitude: self.longitude + east_meters / meters_per_degree_longitude(self.latitude),
        }
    }

    /// Equirectangular ground distance in metres, evaluated at the mean
    /// latitude of the two points. Accurate at survey scale.
    pub fn distance_meters(&self, other: &GeoCoordinate) -> f64 {
        let mean_latitude = 0.5 * (self.latitude + other.latitude);
        let north = (other.latitude - self.latitude) * METERS_PER_DEGREE_LATITUDE;
        let east = (other.longitude - self.longitude) * meters_per_degree_longitude(mean_latitude);
        (north * north + east * east).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_offset_is_identity() {
        let origin = GeoCoordinate::new(38.7368, -9.1389);
        let shifted = origin.offset_by_meters(0.0, 0.0);
        assert!((shifted.latitude - origin.latitude).abs() < 1e-12);
        assert!((shifted.longitude - origin.longitude).abs() < 1e-12);
    }

    #[test]
    fn metric_offset_round_trips_through_distance() {
        let origin = GeoCoordinate::new(38.70, -9.15);
        let moved = origin.offset_by_meters(30.0, 40.0);
        let distance = origin.distance_meters(&moved);
        assert!((distance - 50.0).abs() < 0.01, "got {distance}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoCoordinate::new(38.710, -9.140);
        let b = GeoCoordinate::new(38.712, -9.138);
        let d_ab = a.distance_meters(&b);
        let d_ba = b.distance_meters(&a);
        assert!((d_ab - d_ba).abs() < 1e-9);
    }

    #[test]
    fn validity_ranges() {
        assert!(GeoCoordinate::new(38.7, -9.1).is_valid());
        assert!(!GeoCoordinate::new(91.0, 0.0).is_valid());
        assert!(!GeoCoordinate::new(0.0, -181.0).is_valid());
    }
}

/// Survey region bounds tracking and validation
use crate::geo::GeoCoordinate;
use constants::coordinate_system::{METERS_PER_DEGREE_LATITUDE, meters_per_degree_longitude};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl GeoBounds {
    /// Create new bounds initialised to infinity values
    pub fn new() -> Self {
        Self {
            min_latitude: f64::INFINITY,
            max_latitude: f64::NEG_INFINITY,
            min_longitude: f64::INFINITY,
            max_longitude: f64::NEG_INFINITY,
        }
    }

    /// Build bounds from explicit corner values.
    pub fn from_extent(
        min_latitude: f64,
        min_longitude: f64,
        max_latitude: f64,
        max_longitude: f64,
    ) -> Self {
        Self {
            min_latitude,
            max_latitude,
            min_longitude,
            max_longitude,
        }
    }

    /// Build a square region of the given side length centred on a point.
    pub fn centered_square(center: GeoCoordinate, side_meters: f64) -> Self {
        let half = side_meters / 2.0;
        let south_west = center.offset_by_meters(-half, -half);
        let north_east = center.offset_by_meters(half, half);
        Self::from_extent(
            south_west.latitude,
            south_west.longitude,
            north_east.latitude,
            north_east.longitude,
        )
    }

    /// Update bounds with a new coordinate
    pub fn update(&mut self, coordinate: &GeoCoordinate) {
        self.min_latitude = self.min_latitude.min(coordinate.latitude);
        self.max_latitude = self.max_latitude.max(coordinate.latitude);
        self.min_longitude = self.min_longitude.min(coordinate.longitude);
        self.max_longitude = self.max_longitude.max(coordinate.longitude);
    }

    pub fn center(&self) -> GeoCoordinate {
        GeoCoordinate::new(
            0.5 * (self.min_latitude + self.max_latitude),
            0.5 * (self.min_longitude + self.max_longitude),
        )
    }

    /// Ground extent in metres (east-west, north-south), evaluated at the
    /// region's central latitude.
    pub fn extent_meters(&self) -> (f64, f64) {
        let central_latitude = 0.5 * (self.min_latitude + self.max_latitude);
        let width = (self.max_longitude - self.min_longitude)
            * meters_per_degree_longitude(central_latitude);
        let height = (self.max_latitude - self.min_latitude) * METERS_PER_DEGREE_LATITUDE;
        (width, height)
    }

    pub fn contains(&self, coordinate: &GeoCoordinate) -> bool {
        coordinate.latitude >= self.min_latitude
            && coordinate.latitude <= self.max_latitude
            && coordinate.longitude >= self.min_longitude
            && coordinate.longitude <= self.max_longitude
    }

    /// True when the bounds never saw a point or describe a zero/negative
    /// extent in either axis.
    pub fn is_degenerate(&self) -> bool {
        !(self.min_latitude < self.max_latitude && self.min_longitude < self.max_longitude)
    }
}

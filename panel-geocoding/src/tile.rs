/// Tile geometry: acquired image specs and pixel-to-coordinate resolution
use crate::geo::GeoCoordinate;
use constants::survey::{MAX_ZOOM_LEVEL, MIN_ZOOM_LEVEL};
use serde::{Deserialize, Serialize};

/// Error types for tile geometry operations.
#[derive(Debug)]
pub enum GeometryError {
    PixelOutOfBounds {
        x: f64,
        y: f64,
        width: u32,
        height: u32,
    },
    InvalidTile(String),
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::PixelOutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "Pixel ({}, {}) outside tile bounds {}x{}",
                x, y, width, height
            ),
            GeometryError::InvalidTile(msg) => write!(f, "Invalid tile: {}", msg),
        }
    }
}

impl std::error::Error for GeometryError {}

/// One acquired aerial image with a known centre coordinate.
/// Created by the grid planner at acquisition time, immutable thereafter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TileSpec {
    pub center: GeoCoordinate,
    pub zoom_level: u8,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl TileSpec {
    /// Validate the tile invariants: positive pixel dimensions, zoom level
    /// within the provider's range, centre coordinate in WGS84 range.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.pixel_width == 0 || self.pixel_height == 0 {
            return Err(GeometryError::InvalidTile(format!(
                "zero pixel dimensions {}x{}",
                self.pixel_width, self.pixel_height
            )));
        }
        if !(MIN_ZOOM_LEVEL..=MAX_ZOOM_LEVEL).contains(&self.zoom_level) {
            return Err(GeometryError::InvalidTile(format!(
                "zoom level {} outside provider range",
                self.zoom_level
            )));
        }
        if !self.center.is_valid() {
            return Err(GeometryError::InvalidTile(format!(
                "centre ({}, {}) outside WGS84 range",
                self.center.latitude, self.center.longitude
            )));
        }
        Ok(())
    }
}

/// Ground footprint of one tile at the survey zoom level, in metres.
/// A property of the tile provider, supplied through configuration and
/// never derived here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TileFootprint {
    pub ground_width_meters: f64,
    pub ground_height_meters: f64,
}

/// Resolves pixel positions within a tile to geographic coordinates.
pub struct TileResolver {
    footprint: TileFootprint,
}

impl TileResolver {
    pub fn new(footprint: TileFootprint) -> Self {
        Self { footprint }
    }

    /// Ground metres covered by one pixel along each image axis.
    pub fn meters_per_pixel(&self, tile: &TileSpec) -> (f64, f64) {
        (
            self.footprint.ground_width_meters / tile.pixel_width as f64,
            self.footprint.ground_height_meters / tile.pixel_height as f64,
        )
    }

    /// Convert a pixel position within the tile to a geographic coordinate.
    /// Image-space y increases downward, so the northward offset is -dy.
    pub fn pixel_to_geo(
        &self,
        tile: &TileSpec,
        pixel_x: f64,
        pixel_y: f64,
    ) -> Result<GeoCoordinate, GeometryError> {
        tile.validate()?;

        let in_x = (0.0..=tile.pixel_width as f64).contains(&pixel_x);
        let in_y = (0.0..=tile.pixel_height as f64).contains(&pixel_y);
        if !in_x || !in_y {
            return Err(GeometryError::PixelOutOfBounds {
                x: pixel_x,
                y: pixel_y,
                width: tile.pixel_width,
                height: tile.pixel_height,
            });
        }

        let (meters_per_px, meters_per_py) = self.meters_per_pixel(tile);
        let dx = pixel_x - tile.pixel_width as f64 / 2.0;
        let dy = pixel_y - tile.pixel_height as f64 / 2.0;

        let east_meters = dx * meters_per_px;
        let north_meters = -dy * meters_per_py;

        Ok(tile.center.offset_by_meters(east_meters, north_meters))
    }
}

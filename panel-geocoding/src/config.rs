/// Survey configuration loaded from JSON
use crate::bounds::GeoBounds;
use crate::dedup::MergePolicy;
use crate::grid::GridTileParams;
use crate::tile::TileFootprint;
use constants::survey::{
    DEFAULT_DEDUP_DISTANCE_METERS, DEFAULT_OVERLAP_FRACTION, DEFAULT_SURVEY_CENTER,
    DEFAULT_SURVEY_EXTENT_METERS, DEFAULT_TILE_PIXELS, DEFAULT_TILE_SIZE_METERS,
    DEFAULT_ZOOM_LEVEL,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Parameters for one survey run. Every field has a default matching the
/// original Lisbon acquisition, so a config file only needs to override
/// what differs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    /// Region to cover with the acquisition grid.
    pub region: GeoBounds,
    /// Ground side of one tile in metres.
    pub tile_size_meters: f64,
    /// Fractional overlap between adjacent tiles, in [0, 1).
    pub overlap_fraction: f64,
    /// Tile provider zoom level used for acquisition.
    pub zoom_level: u8,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Ground footprint of one tile at `zoom_level`. A provider property;
    /// configured, never derived.
    pub ground_width_meters: f64,
    pub ground_height_meters: f64,
    /// Ground radius within which same-class detections are duplicates.
    pub dedup_distance_meters: f64,
    pub merge_policy: MergePolicy,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        let (latitude, longitude) = DEFAULT_SURVEY_CENTER;
        Self {
            region: GeoBounds::centered_square(
                crate::geo::GeoCoordinate::new(latitude, longitude),
                DEFAULT_SURVEY_EXTENT_METERS,
            ),
            tile_size_meters: DEFAULT_TILE_SIZE_METERS,
            overlap_fraction: DEFAULT_OVERLAP_FRACTION,
            zoom_level: DEFAULT_ZOOM_LEVEL,
            pixel_width: DEFAULT_TILE_PIXELS,
            pixel_height: DEFAULT_TILE_PIXELS,
            ground_width_meters: DEFAULT_TILE_SIZE_METERS,
            ground_height_meters: DEFAULT_TILE_SIZE_METERS,
            dedup_distance_meters: DEFAULT_DEDUP_DISTANCE_METERS,
            merge_policy: MergePolicy::LargerBox,
        }
    }
}

impl SurveyConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
        let config: SurveyConfig = serde_json::from_str(&text)
            .map_err(|e| format!("Cannot parse config {}: {}", path.display(), e))?;
        Ok(config)
    }

    pub fn footprint(&self) -> TileFootprint {
        TileFootprint {
            ground_width_meters: self.ground_width_meters,
            ground_height_meters: self.ground_height_meters,
        }
    }

    pub fn tile_params(&self) -> GridTileParams {
        GridTileParams {
            zoom_level: self.zoom_level,
            pixel_width: self.pixel_width,
            pixel_height: self.pixel_height,
        }
    }
}

/// Acquisition grid planning: overlapping tile centres covering a region
use crate::bounds::GeoBounds;
use crate::tile::TileSpec;

/// Error types for grid planning operations.
#[derive(Debug)]
pub enum GridError {
    InvalidRegion(String),
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::InvalidRegion(msg) => write!(f, "Invalid region: {}", msg),
        }
    }
}

impl std::error::Error for GridError {}

/// Tile pixel parameters applied uniformly across a planned grid.
#[derive(Debug, Clone, Copy)]
pub struct GridTileParams {
    pub zoom_level: u8,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Number of tile centres needed to cover `extent_meters` with tiles of
/// `tile_size_meters` stepped `step_meters` apart. At least one tile; the
/// last centre is placed so the far edge stays covered.
fn centers_along_axis(extent_meters: f64, tile_size_meters: f64, step_meters: f64) -> usize {
    if extent_meters <= tile_size_meters {
        return 1;
    }
    (((extent_meters - tile_size_meters) / step_meters).ceil() as usize) + 1
}

/// Centre position along one axis, metres from the region's near edge.
/// A region narrower than one tile gets a single centred tile; otherwise
/// the final centre is pulled back so the far edge stays covered, which
/// can only increase overlap.
fn center_position(
    index: usize,
    extent_meters: f64,
    tile_size_meters: f64,
    step_meters: f64,
) -> f64 {
    let half_tile = tile_size_meters / 2.0;
    if extent_meters <= tile_size_meters {
        return extent_meters / 2.0;
    }
    (half_tile + index as f64 * step_meters).min(extent_meters - half_tile)
}

/// Plan a regular grid of overlapping tile centres covering `region`.
///
/// Centres are spaced `tile_size_meters * (1 - overlap_fraction)` apart in
/// both axes, using the local-flat approximation at the region's central
/// latitude. The first centre sits half a tile inside the south-west
/// corner; the final row/column is pulled back so the region's far edges
/// still fall within a tile, which can only increase overlap.
pub fn plan_grid(
    region: &GeoBounds,
    tile_size_meters: f64,
    overlap_fraction: f64,
    tile_params: GridTileParams,
) -> Result<Vec<TileSpec>, GridError> {
    if region.is_degenerate() {
        return Err(GridError::InvalidRegion(format!(
            "non-positive extent ({:.6}..{:.6}, {:.6}..{:.6})",
            region.min_latitude, region.max_latitude, region.min_longitude, region.max_longitude
        )));
    }
    if !(0.0..1.0).contains(&overlap_fraction) {
        return Err(GridError::InvalidRegion(format!(
            "overlap fraction {} outside [0, 1)",
            overlap_fraction
        )));
    }
    if tile_size_meters <= 0.0 {
        return Err(GridError::InvalidRegion(format!(
            "non-positive tile size {} m",
            tile_size_meters
        )));
    }

    let (width_meters, height_meters) = region.extent_meters();
    let step_meters = tile_size_meters * (1.0 - overlap_fraction);

    let columns = centers_along_axis(width_meters, tile_size_meters, step_meters);
    let rows = centers_along_axis(height_meters, tile_size_meters, step_meters);

    let south_west = crate::geo::GeoCoordinate::new(region.min_latitude, region.min_longitude);
    let mut tiles = Vec::with_capacity(columns * rows);

    for row in 0..rows {
        let north_meters = center_position(row, height_meters, tile_size_meters, step_meters);
        for column in 0..columns {
            let east_meters =
                center_position(column, width_meters, tile_size_meters, step_meters);
            tiles.push(TileSpec {
                center: south_west.offset_by_meters(east_meters, north_meters),
                zoom_level: tile_params.zoom_level,
                pixel_width: tile_params.pixel_width,
                pixel_height: tile_params.pixel_height,
            });
        }
    }

    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoCoordinate;

    const PARAMS: GridTileParams = GridTileParams {
        zoom_level: 19,
        pixel_width: 256,
        pixel_height: 256,
    };

    fn lisbon_region() -> GeoBounds {
        GeoBounds::centered_square(GeoCoordinate::new(38.736763, -9.138933), 3_000.0)
    }

    /// Every corner and edge midpoint of the region must fall inside the
    /// footprint of at least one planned tile.
    fn assert_full_coverage(region: &GeoBounds, tiles: &[TileSpec], tile_size_meters: f64) {
        let half = tile_size_meters / 2.0;
        let probes = [
            (region.min_latitude, region.min_longitude),
            (region.min_latitude, region.max_longitude),
            (region.max_latitude, region.min_longitude),
            (region.max_latitude, region.max_longitude),
            (region.center().latitude, region.min_longitude),
            (region.center().latitude, region.max_longitude),
            (region.min_latitude, region.center().longitude),
            (region.max_latitude, region.center().longitude),
            (region.center().latitude, region.center().longitude),
        ];
        for (latitude, longitude) in probes {
            let probe = GeoCoordinate::new(latitude, longitude);
            let covered = tiles.iter().any(|tile| {
                let east = (probe.longitude - tile.center.longitude)
                    * constants::coordinate_system::meters_per_degree_longitude(
                        tile.center.latitude,
                    );
                let north = (probe.latitude - tile.center.latitude)
                    * constants::coordinate_system::METERS_PER_DEGREE_LATITUDE;
                // Couple of metres of slack: the planner applies longitude
                // scale at the region's south edge, the probe at the tile
                // centre latitude.
                east.abs() <= half + 2.0 && north.abs() <= half + 2.0
            });
            assert!(covered, "probe ({latitude}, {longitude}) uncovered");
        }
    }

    #[test]
    fn grid_covers_region_for_various_overlaps() {
        let region = lisbon_region();
        for overlap in [0.0, 0.1, 0.2, 0.5, 0.9] {
            let tiles = plan_grid(&region, 300.0, overlap, PARAMS).unwrap();
            assert!(!tiles.is_empty());
            assert_full_coverage(&region, &tiles, 300.0);
        }
    }

    #[test]
    fn adjacent_tiles_keep_requested_overlap() {
        let region = lisbon_region();
        let overlap = 0.2;
        let tiles = plan_grid(&region, 300.0, overlap, PARAMS).unwrap();
        // First two tiles of the bottom row are horizontally adjacent.
        let spacing = tiles[0].center.distance_meters(&tiles[1].center);
        assert!(
            spacing <= 300.0 * (1.0 - overlap) + 0.1,
            "spacing {spacing}"
        );
    }

    #[test]
    fn single_tile_when_region_smaller_than_tile() {
        let region =
            GeoBounds::centered_square(GeoCoordinate::new(38.70, -9.15), 100.0);
        let tiles = plan_grid(&region, 300.0, 0.2, PARAMS).unwrap();
        assert_eq!(tiles.len(), 1);
        let center = region.center();
        assert!(tiles[0].center.distance_meters(&center) < 1.0);
    }

    #[test]
    fn degenerate_region_is_rejected() {
        let region = GeoBounds::from_extent(38.70, -9.15, 38.70, -9.15);
        assert!(matches!(
            plan_grid(&region, 300.0, 0.2, PARAMS),
            Err(GridError::InvalidRegion(_))
        ));
    }

    #[test]
    fn out_of_range_overlap_is_rejected() {
        let region = lisbon_region();
        for overlap in [-0.1, 1.0, 1.5] {
            assert!(matches!(
                plan_grid(&region, 300.0, overlap, PARAMS),
                Err(GridError::InvalidRegion(_))
            ));
        }
    }
}

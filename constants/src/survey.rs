/// Default survey parameters, matching the original Lisbon acquisition:
/// a 3x3 km square centred on Instituto Superior Técnico.
pub const DEFAULT_SURVEY_CENTER: (f64, f64) = (38.736763, -9.138933);

/// Side of the default survey square in metres.
pub const DEFAULT_SURVEY_EXTENT_METERS: f64 = 3_000.0;

/// Ground footprint of one acquired tile in metres.
pub const DEFAULT_TILE_SIZE_METERS: f64 = 300.0;

/// Fractional overlap between adjacent tiles in the acquisition grid.
pub const DEFAULT_OVERLAP_FRACTION: f64 = 0.2;

/// Tile provider zoom range accepted for acquisition.
pub const MIN_ZOOM_LEVEL: u8 = 0;
pub const MAX_ZOOM_LEVEL: u8 = 21;

/// Zoom level used for the default survey.
pub const DEFAULT_ZOOM_LEVEL: u8 = 19;

/// Default acquired image resolution in pixels.
pub const DEFAULT_TILE_PIXELS: u32 = 256;

/// Default duplicate suppression radius in metres, roughly half a typical
/// panel's ground footprint.
pub const DEFAULT_DEDUP_DISTANCE_METERS: f64 = 2.0;

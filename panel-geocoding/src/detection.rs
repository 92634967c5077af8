/// Detection records emitted by the vision model, one JSON file per tile
use crate::geo::GeoCoordinate;
use crate::tile::TileSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Panel class assigned by the detection model. WINDOW and NULL exist in
/// the training data to curb misclassifications; they are never geocoded
/// into the output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelClass {
    #[serde(rename = "PV")]
    Pv,
    #[serde(rename = "ST")]
    St,
    #[serde(rename = "WINDOW")]
    Window,
    #[serde(rename = "NULL")]
    Null,
}

impl PanelClass {
    pub fn code(&self) -> &'static str {
        match self {
            PanelClass::Pv => "PV",
            PanelClass::St => "ST",
            PanelClass::Window => "WINDOW",
            PanelClass::Null => "NULL",
        }
    }

    /// Whether this class is written to the output table.
    pub fn is_mapped(&self) -> bool {
        constants::class::is_mapped_class(self.code())
    }

    pub fn parse(code: &str) -> Option<PanelClass> {
        match code {
            "PV" => Some(PanelClass::Pv),
            "ST" => Some(PanelClass::St),
            "WINDOW" => Some(PanelClass::Window),
            "NULL" => Some(PanelClass::Null),
            _ => None,
        }
    }
}

/// Axis-aligned bounding box in tile pixel space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PixelBox {
    pub x_min: u32,
    pub y_min: u32,
    pub x_max: u32,
    pub y_max: u32,
}

impl PixelBox {
    /// Check the box is non-empty and lies within the tile's pixel grid.
    pub fn is_valid_for(&self, pixel_width: u32, pixel_height: u32) -> bool {
        self.x_min < self.x_max
            && self.y_min < self.y_max
            && self.x_max <= pixel_width
            && self.y_max <= pixel_height
    }

    /// Representative pixel: the box centroid.
    pub fn centroid(&self) -> (f64, f64) {
        (
            (self.x_min + self.x_max) as f64 / 2.0,
            (self.y_min + self.y_max) as f64 / 2.0,
        )
    }

    pub fn area(&self) -> u64 {
        (self.x_max - self.x_min) as u64 * (self.y_max - self.y_min) as u64
    }
}

/// One model detection bound to its source tile. Owned by the geocoder
/// only long enough to project it.
#[derive(Debug, Clone)]
pub struct Detection {
    pub id: String,
    pub class: PanelClass,
    pub pixel_box: PixelBox,
    pub source_tile: TileSpec,
    pub image_path: String,
}

/// Durable output row consumed by the dashboard. Immutable once written;
/// `pixel_area` rides along for duplicate suppression and never reaches
/// the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoDetection {
    pub id: String,
    pub class: PanelClass,
    pub coordinate: GeoCoordinate,
    pub image_path: String,
    pub pixel_area: u64,
}

/// Raw detection row as serialised by the model runner. The class stays a
/// string here so an unknown label skips one row instead of failing the
/// whole file.
#[derive(Debug, Deserialize)]
struct DetectionRecord {
    id: String,
    class: String,
    #[serde(rename = "box")]
    pixel_box: PixelBox,
    image_path: String,
}

/// Per-tile detection file: the tile spec plus the model's detections.
#[derive(Debug, Deserialize)]
struct TileDetectionFile {
    tile: TileSpec,
    detections: Vec<DetectionRecord>,
}

/// Counters for lenient loading; malformed inputs are skipped, not fatal.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadStats {
    pub files_loaded: usize,
    pub files_skipped: usize,
    pub rows_skipped: usize,
}

/// Discover per-tile detection JSON files in a directory, sorted by name.
pub fn discover_detection_files(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    if !dir.is_dir() {
        return Err(format!("Detection directory does not exist: {}", dir.display()).into());
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    Ok(files)
}

/// Load detections from per-tile JSON files. Files that fail to parse and
/// rows with unknown classes are counted and skipped.
pub fn load_detections(paths: &[PathBuf]) -> (Vec<Detection>, LoadStats) {
    let mut detections = Vec::new();
    let mut stats = LoadStats::default();

    for path in paths {
        let parsed: TileDetectionFile = match fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()))
        {
            Ok(file) => file,
            Err(reason) => {
                eprintln!("Skipping {}: {}", path.display(), reason);
                stats.files_skipped += 1;
                continue;
            }
        };

        stats.files_loaded += 1;
        for record in parsed.detections {
            let Some(class) = PanelClass::parse(&record.class) else {
                eprintln!(
                    "Skipping detection {}: unknown class '{}'",
                    record.id, record.class
                );
                stats.rows_skipped += 1;
                continue;
            };
            detections.push(Detection {
                id: record.id,
                class,
                pixel_box: record.pixel_box,
                source_tile: parsed.tile,
                image_path: record.image_path,
            });
        }
    }

    (detections, stats)
}

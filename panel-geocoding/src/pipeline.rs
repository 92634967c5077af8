/// Survey pipeline orchestrating grid planning, geocoding, and aggregation
use crate::bounds::GeoBounds;
use crate::config::SurveyConfig;
use crate::dedup::aggregate;
use crate::detection::{discover_detection_files, load_detections};
use crate::geocoder::geocode_batch;
use crate::grid::plan_grid;
use crate::manifest::{ManifestGenerator, SurveyManifest};
use crate::table::{PanelTable, TypeFilter, write_table};
use crate::tile::TileResolver;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const OUTPUT_TABLE_NAME: &str = "detected_panels_clean.csv";
pub const TILE_CENTRES_NAME: &str = "tile_centres.csv";

/// One offline survey run. Planning and geocoding are separate commands
/// because acquisition and the detection model run in between, outside
/// this pipeline.
pub struct SurveyPipeline {
    config: SurveyConfig,
    output_dir: PathBuf,
}

impl SurveyPipeline {
    /// Create a pipeline from a config file, creating the output directory.
    pub fn new(config_path: &Path, output_dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let config = SurveyConfig::load(config_path)?;
        fs::create_dir_all(output_dir)?;
        Ok(Self {
            config,
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Plan the acquisition grid and store each tile's centre coordinate.
    /// An invalid region is logged and skipped; no partial grid is emitted.
    pub fn plan(&self) -> Result<(), Box<dyn std::error::Error>> {
        println!(
            "Planning acquisition grid ({} m tiles, {:.0}% overlap)...",
            self.config.tile_size_meters,
            self.config.overlap_fraction * 100.0
        );

        let tiles = match plan_grid(
            &self.config.region,
            self.config.tile_size_meters,
            self.config.overlap_fraction,
            self.config.tile_params(),
        ) {
            Ok(tiles) => tiles,
            Err(error) => {
                eprintln!("Skipping region: {}", error);
                return Ok(());
            }
        };

        let path = self.output_dir.join(TILE_CENTRES_NAME);
        let mut writer = BufWriter::new(File::create(&path)?);
        writeln!(writer, "tile_id,latitude,longitude")?;
        for (index, tile) in tiles.iter().enumerate() {
            writeln!(
                writer,
                "tile_{:04},{:.6},{:.6}",
                index, tile.center.latitude, tile.center.longitude
            )?;
        }
        writer.flush()?;

        println!("Planned {} tiles -> {}", tiles.len(), path.display());
        Ok(())
    }

    /// Geocode per-tile detections into the deduplicated output table.
    pub fn geocode(&self, detections_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
        println!("Loading detections from {}...", detections_dir.display());
        let files = discover_detection_files(detections_dir)?;
        println!("Found {} detection files", files.len());

        let (detections, load_stats) = load_detections(&files);
        println!(
            "Loaded {} detections ({} files skipped, {} rows skipped)",
            detections.len(),
            load_stats.files_skipped,
            load_stats.rows_skipped
        );

        let resolver = TileResolver::new(self.config.footprint());
        let (geocoded, geocode_stats) = geocode_batch(&resolver, &detections);
        println!(
            "Geocoded {} detections ({} dropped out of bounds)",
            geocode_stats.geocoded, geocode_stats.dropped
        );

        // Training-only classes (WINDOW, NULL) never reach the table.
        let before_class_filter = geocoded.len();
        let mapped: Vec<_> = geocoded
            .into_iter()
            .filter(|detection| detection.class.is_mapped())
            .collect();
        let unmapped_filtered = before_class_filter - mapped.len();

        let before_dedup = mapped.len();
        let merged = aggregate(
            mapped,
            self.config.dedup_distance_meters,
            self.config.merge_policy,
        );
        let duplicates_suppressed = before_dedup - merged.len();

        let table_path = self.output_dir.join(OUTPUT_TABLE_NAME);
        write_table(&table_path, &merged)?;
        println!("Wrote {} panels -> {}", merged.len(), table_path.display());

        // Re-read the table the way the dashboard will, as a verification
        // pass over the persisted rows.
        let (table, _) = PanelTable::load(&table_path)?;
        println!(
            "Verified table: {} rows ({} PV, {} ST)",
            table.len(),
            table.filter(TypeFilter::Pv).len(),
            table.filter(TypeFilter::St).len()
        );

        let outside_region = merged
            .iter()
            .filter(|detection| !self.config.region.contains(&detection.coordinate))
            .count();
        if outside_region > 0 {
            println!(
                "Warning: {} panels fall outside the configured survey region",
                outside_region
            );
        }

        let mut survey_bounds = GeoBounds::new();
        let mut panel_counts: HashMap<String, usize> = HashMap::new();
        for detection in &merged {
            survey_bounds.update(&detection.coordinate);
            *panel_counts
                .entry(detection.class.code().to_string())
                .or_insert(0) += 1;
        }

        let manifest = SurveyManifest {
            survey_bounds: (!merged.is_empty()).then_some(survey_bounds),
            panel_counts,
            detection_files_loaded: load_stats.files_loaded,
            detection_files_skipped: load_stats.files_skipped,
            detection_rows_skipped: load_stats.rows_skipped,
            dropped_out_of_bounds: geocode_stats.dropped,
            unmapped_classes_filtered: unmapped_filtered,
            duplicates_suppressed,
            output_table: OUTPUT_TABLE_NAME.to_string(),
        };
        ManifestGenerator::new(&self.output_dir).generate(&manifest)?;

        println!("Geocoding complete!");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{PanelTable, TypeFilter};

    fn write_tile_file(dir: &Path, name: &str, latitude: f64, longitude: f64, body: &str) {
        let contents = format!(
            r#"{{
                "tile": {{
                    "center": {{"latitude": {latitude}, "longitude": {longitude}}},
                    "zoom_level": 19,
                    "pixel_width": 256,
                    "pixel_height": 256
                }},
                "detections": [{body}]
            }}"#
        );
        fs::write(dir.join(name), contents).unwrap();
    }

    /// Two overlapping tiles both spot the same PV panel; the pipeline
    /// must emit a single row for it plus the unrelated ST panel.
    #[test]
    fn end_to_end_geocode_run() {
        let base = std::env::temp_dir().join("panel-geocoding-pipeline-test");
        let detections_dir = base.join("detections");
        let output_dir = base.join("output");
        fs::remove_dir_all(&base).ok();
        fs::create_dir_all(&detections_dir).unwrap();
        fs::create_dir_all(&output_dir).unwrap();

        // Tile A centred on the panel: detection at the image centre.
        write_tile_file(
            &detections_dir,
            "tile_0000.json",
            38.710,
            -9.140,
            r#"{"id": "a_pv_1", "class": "PV",
                "box": {"x_min": 120, "y_min": 120, "x_max": 136, "y_max": 136},
                "image_path": "tiles/tile_0000.png"},
               {"id": "a_win_1", "class": "WINDOW",
                "box": {"x_min": 10, "y_min": 10, "x_max": 20, "y_max": 20},
                "image_path": "tiles/tile_0000.png"}"#,
        );
        // Tile B about 120 m east; the same panel sits west of its centre
        // (256 px over a 300 m tile -> 1.171875 m per pixel). Box
        // (21,120)-(30,136) puts the centroid about 0.3 m from the true
        // position, well inside the 2 m duplicate radius.
        write_tile_file(
            &detections_dir,
            "tile_0001.json",
            38.710,
            -9.13861430,
            r#"{"id": "b_pv_1", "class": "PV",
                "box": {"x_min": 21, "y_min": 120, "x_max": 30, "y_max": 136},
                "image_path": "tiles/tile_0001.png"},
               {"id": "b_st_1", "class": "ST",
                "box": {"x_min": 200, "y_min": 40, "x_max": 220, "y_max": 60},
                "image_path": "tiles/tile_0001.png"}"#,
        );

        let config_path = base.join("survey.json");
        fs::write(&config_path, "{}").unwrap();

        let pipeline = SurveyPipeline::new(&config_path, &output_dir).unwrap();
        pipeline.geocode(&detections_dir).unwrap();

        let (table, skipped) = PanelTable::load(&output_dir.join(OUTPUT_TABLE_NAME)).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(table.filter(TypeFilter::Pv).len(), 1);
        assert_eq!(table.filter(TypeFilter::St).len(), 1);
        assert_eq!(table.filter(TypeFilter::Both).len(), 2);

        // Larger-box policy keeps tile A's 16x16 detection over B's 9x16.
        let pv_rows = table.filter(TypeFilter::Pv);
        assert_eq!(pv_rows[0].id, "a_pv_1");

        fs::remove_dir_all(&base).ok();
    }

    #[test]
    fn plan_writes_tile_centres() {
        let base = std::env::temp_dir().join("panel-geocoding-plan-test");
        fs::remove_dir_all(&base).ok();
        fs::create_dir_all(&base).unwrap();
        let config_path = base.join("survey.json");
        fs::write(&config_path, "{}").unwrap();

        let pipeline = SurveyPipeline::new(&config_path, &base).unwrap();
        pipeline.plan().unwrap();

        let centres = fs::read_to_string(base.join(TILE_CENTRES_NAME)).unwrap();
        let lines: Vec<_> = centres.lines().collect();
        assert_eq!(lines[0], "tile_id,latitude,longitude");
        // 3 km at 300 m tiles with 20% overlap: 13 centres per axis.
        assert_eq!(lines.len() - 1, 13 * 13);

        fs::remove_dir_all(&base).ok();
    }

    #[test]
    fn invalid_region_aborts_planning_without_output() {
        let base = std::env::temp_dir().join("panel-geocoding-badregion-test");
        fs::remove_dir_all(&base).ok();
        fs::create_dir_all(&base).unwrap();
        let config_path = base.join("survey.json");
        fs::write(
            &config_path,
            r#"{"region": {"min_latitude": 38.7, "max_latitude": 38.7,
                           "min_longitude": -9.15, "max_longitude": -9.14}}"#,
        )
        .unwrap();

        let pipeline = SurveyPipeline::new(&config_path, &base).unwrap();
        pipeline.plan().unwrap();
        assert!(!base.join(TILE_CENTRES_NAME).exists());

        fs::remove_dir_all(&base).ok();
    }
}

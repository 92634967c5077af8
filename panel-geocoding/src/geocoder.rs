/// Detection geocoding: project pixel boxes to geographic coordinates
use crate::detection::{Detection, GeoDetection};
use crate::tile::{GeometryError, TileResolver};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

/// Project one detection to its geographic coordinate. The representative
/// pixel is the centroid of the bounding box; id, class, and image path
/// pass through unchanged. Geometry is deterministic, so errors propagate
/// without retry.
pub fn geocode(
    resolver: &TileResolver,
    detection: &Detection,
) -> Result<GeoDetection, GeometryError> {
    let tile = &detection.source_tile;
    if !detection
        .pixel_box
        .is_valid_for(tile.pixel_width, tile.pixel_height)
    {
        let (x, y) = detection.pixel_box.centroid();
        return Err(GeometryError::PixelOutOfBounds {
            x,
            y,
            width: tile.pixel_width,
            height: tile.pixel_height,
        });
    }

    let (pixel_x, pixel_y) = detection.pixel_box.centroid();
    let coordinate = resolver.pixel_to_geo(tile, pixel_x, pixel_y)?;

    Ok(GeoDetection {
        id: detection.id.clone(),
        class: detection.class,
        coordinate,
        image_path: detection.image_path.clone(),
        pixel_area: detection.pixel_box.area(),
    })
}

/// Counters for a batch geocoding run.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeocodeStats {
    pub geocoded: usize,
    pub dropped: usize,
}

/// Geocode a batch of detections in parallel. Each projection is pure and
/// independent; detections whose boxes fall outside their tile are dropped
/// and counted rather than failing the batch.
pub fn geocode_batch(
    resolver: &TileResolver,
    detections: &[Detection],
) -> (Vec<GeoDetection>, GeocodeStats) {
    let pb = ProgressBar::new(detections.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.green/blue}] {pos}/{len} detections ({percent}%) {msg}")
            .unwrap()
            .progress_chars("█▉▊▋▌▍▎▏"),
    );
    pb.set_message("Geocoding detections");

    let results: Vec<Result<GeoDetection, GeometryError>> = detections
        .par_iter()
        .map(|detection| {
            let result = geocode(resolver, detection);
            pb.inc(1);
            result
        })
        .collect();

    pb.finish_with_message("Detections geocoded");

    let mut geocoded = Vec::with_capacity(results.len());
    let mut stats = GeocodeStats::default();
    for result in results {
        match result {
            Ok(geo_detection) => {
                geocoded.push(geo_detection);
                stats.geocoded += 1;
            }
            Err(error) => {
                eprintln!("Dropping detection: {}", error);
                stats.dropped += 1;
            }
        }
    }

    (geocoded, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{PanelClass, PixelBox};
    use crate::geo::GeoCoordinate;
    use crate::tile::{TileFootprint, TileSpec};

    fn test_resolver() -> TileResolver {
        TileResolver::new(TileFootprint {
            ground_width_meters: 300.0,
            ground_height_meters: 300.0,
        })
    }

    fn test_detection(id: &str, pixel_box: PixelBox) -> Detection {
        Detection {
            id: id.to_string(),
            class: PanelClass::Pv,
            pixel_box,
            source_tile: TileSpec {
                center: GeoCoordinate::new(38.70, -9.15),
                zoom_level: 19,
                pixel_width: 256,
                pixel_height: 256,
            },
            image_path: format!("tiles/{id}.png"),
        }
    }

    #[test]
    fn centered_box_geocodes_to_tile_center() {
        let detection = test_detection(
            "pv_001",
            PixelBox {
                x_min: 120,
                y_min: 120,
                x_max: 136,
                y_max: 136,
            },
        );
        let geocoded = geocode(&test_resolver(), &detection).unwrap();
        assert!((geocoded.coordinate.latitude - 38.70).abs() < 1e-4);
        assert!((geocoded.coordinate.longitude - (-9.15)).abs() < 1e-4);
        assert_eq!(geocoded.id, "pv_001");
        assert_eq!(geocoded.class, PanelClass::Pv);
        assert_eq!(geocoded.image_path, "tiles/pv_001.png");
        assert_eq!(geocoded.pixel_area, 256);
    }

    #[test]
    fn out_of_bounds_box_is_rejected() {
        let detection = test_detection(
            "pv_002",
            PixelBox {
                x_min: 250,
                y_min: 10,
                x_max: 300,
                y_max: 30,
            },
        );
        assert!(matches!(
            geocode(&test_resolver(), &detection),
            Err(GeometryError::PixelOutOfBounds { .. })
        ));
    }

    #[test]
    fn batch_drops_bad_detections_and_keeps_rest() {
        let good = test_detection(
            "pv_003",
            PixelBox {
                x_min: 0,
                y_min: 0,
                x_max: 16,
                y_max: 16,
            },
        );
        let bad = test_detection(
            "pv_004",
            PixelBox {
                x_min: 200,
                y_min: 200,
                x_max: 400,
                y_max: 400,
            },
        );
        let (geocoded, stats) = geocode_batch(&test_resolver(), &[good, bad]);
        assert_eq!(geocoded.len(), 1);
        assert_eq!(geocoded[0].id, "pv_003");
        assert_eq!(stats.geocoded, 1);
        assert_eq!(stats.dropped, 1);
    }
}

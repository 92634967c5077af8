/// Duplicate suppression for detections seen by overlapping tiles
use crate::detection::GeoDetection;
use serde::{Deserialize, Serialize};

/// Which duplicate survives a merge. The original acquisition described
/// its overlap handling only narratively, so the policy stays
/// configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Keep the detection with the larger pixel box, a proxy for a more
    /// centred, higher-confidence detection.
    LargerBox,
    /// Keep whichever detection was seen first in the input order.
    FirstSeen,
}

/// Merge per-tile detections, suppressing duplicates from tile overlap.
///
/// Two detections are duplicates when they share a class and sit within
/// `distance_meters` of each other on the ground. Suppressed ids are
/// discarded; output order is unspecified. A pairwise sweep is fine at
/// survey scale (hundreds of detections).
pub fn aggregate(
    mut detections: Vec<GeoDetection>,
    distance_meters: f64,
    policy: MergePolicy,
) -> Vec<GeoDetection> {
    if policy == MergePolicy::LargerBox {
        // Keep-first sweep below then preserves the largest of each
        // duplicate cluster.
        detections.sort_by(|a, b| b.pixel_area.cmp(&a.pixel_area));
    }

    let mut keep = vec![true; detections.len()];
    for i in 0..detections.len() {
        if !keep[i] {
            continue;
        }
        for j in (i + 1)..detections.len() {
            if !keep[j] || detections[i].class != detections[j].class {
                continue;
            }
            let separation = detections[i]
                .coordinate
                .distance_meters(&detections[j].coordinate);
            if separation < distance_meters {
                keep[j] = false;
            }
        }
    }

    detections
        .into_iter()
        .zip(keep)
        .filter_map(|(detection, kept)| kept.then_some(detection))
        .collect()
}

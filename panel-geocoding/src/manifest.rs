/// Survey manifest generation summarising a geocoding run
use crate::bounds::GeoBounds;
use constants::class::get_class_name;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Summary of one geocoding run, written next to the output table.
/// Everything a consumer needs to judge the run without re-reading it.
#[derive(Debug, Serialize, Deserialize)]
pub struct SurveyManifest {
    /// Bounds of the emitted detections; absent when nothing was mapped.
    pub survey_bounds: Option<GeoBounds>,
    /// Panel counts per class code in the final table.
    pub panel_counts: HashMap<String, usize>,
    pub detection_files_loaded: usize,
    pub detection_files_skipped: usize,
    pub detection_rows_skipped: usize,
    pub dropped_out_of_bounds: usize,
    pub unmapped_classes_filtered: usize,
    pub duplicates_suppressed: usize,
    /// Output table filename, relative to the manifest.
    pub output_table: String,
}

/// Writes the manifest and prints a run summary.
pub struct ManifestGenerator {
    output_dir: PathBuf,
}

impl ManifestGenerator {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Write `manifest.json` to the output directory and print a summary.
    pub fn generate(&self, manifest: &SurveyManifest) -> Result<(), Box<dyn std::error::Error>> {
        let manifest_path = self.output_dir.join("manifest.json");
        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(&manifest_path, manifest_json)?;

        println!("Generated survey manifest: {}", manifest_path.display());
        self.print_manifest_summary(manifest);

        Ok(())
    }

    /// Prints manifest summary for verification and debugging.
    fn print_manifest_summary(&self, manifest: &SurveyManifest) {
        println!("Manifest Summary:");
        let total: usize = manifest.panel_counts.values().sum();
        println!("  Panels mapped: {}", total);
        let mut counts: Vec<_> = manifest.panel_counts.iter().collect();
        counts.sort();
        for (code, count) in counts {
            println!("    {} ({}): {}", code, get_class_name(code), count);
        }

        if let Some(bounds) = &manifest.survey_bounds {
            println!(
                "  Survey bounds: ({:.6}, {:.6}) to ({:.6}, {:.6})",
                bounds.min_latitude,
                bounds.min_longitude,
                bounds.max_latitude,
                bounds.max_longitude
            );
        } else {
            println!("  No panels mapped");
        }

        println!(
            "  Skipped: {} files, {} rows, {} out-of-bounds, {} unmapped, {} duplicates",
            manifest.detection_files_skipped,
            manifest.detection_rows_skipped,
            manifest.dropped_out_of_bounds,
            manifest.unmapped_classes_filtered,
            manifest.duplicates_suppressed
        );
        println!("  Output table: {}", manifest.output_table);
    }
}

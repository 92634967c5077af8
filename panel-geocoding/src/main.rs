/// Panel detection geocoding pipeline entry point
mod bounds;
mod config;
mod dedup;
mod detection;
mod geo;
mod geocoder;
mod grid;
mod manifest;
mod pipeline;
mod table;
mod tile;

use pipeline::SurveyPipeline;
use std::env;
use std::path::Path;

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} plan <survey.json> <output-dir>", program);
    eprintln!("       {} geocode <survey.json> <detections-dir> <output-dir>", program);
    std::process::exit(1);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("plan") if args.len() == 4 => {
            let pipeline = SurveyPipeline::new(Path::new(&args[2]), Path::new(&args[3]))?;
            pipeline.plan()?;
        }
        Some("geocode") if args.len() == 5 => {
            let pipeline = SurveyPipeline::new(Path::new(&args[2]), Path::new(&args[4]))?;
            pipeline.geocode(Path::new(&args[3]))?;
        }
        _ => usage(&args[0]),
    }

    Ok(())
}

//! Analyse every KMZ/KML file in a folder in parallel.
//!
//! Run with: cargo run --example batch_analysis --features parallel -- <folder>

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use trip_segmenter::{analyze_files_parallel, AnalyseParams};

fn main() {
    let folder = env::args().nth(1).unwrap_or_else(|| ".".to_string());

    let paths: Vec<PathBuf> = match fs::read_dir(&folder) {
        Ok(entries) => entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "kmz" || ext == "kml"))
            .collect(),
        Err(e) => {
            eprintln!("Error reading folder {}: {}", folder, e);
            return;
        }
    };

    println!("Analysing {} files from {}", paths.len(), folder);

    let start = Instant::now();
    let results = analyze_files_parallel(&paths, &AnalyseParams::default());
    let elapsed = start.elapsed();

    let mut total_km = 0.0;
    for entry in &results {
        match &entry.outcome {
            Ok(result) => {
                total_km += result.total_distance_m / 1000.0;
                println!(
                    "  [OK]  {}: {} rides, {} stops",
                    entry.path.display(),
                    result.rides.len(),
                    result.stops.len()
                );
            }
            Err(e) => println!("  [ERR] {}: {}", entry.path.display(), e),
        }
    }

    println!("\n{:.1} km across {} files in {:?}", total_km, results.len(), elapsed);
}

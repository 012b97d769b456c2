//! trip-segmenter CLI - Summarise KMZ/KML track logs as rides and stops
//!
//! Usage:
//!   trip-segmenter analyze <file> [--v-min-kmh <v>] [--json] [--geojson <out>]
//!   trip-segmenter batch <file>...
//!
//! Threshold flags override the built-in defaults; anything not given on
//! the command line keeps its default value.

use chrono::DateTime;
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use trip_segmenter::{
    analyze_files, process_request, to_feature_collection, AnalyseParams, AnalysisResult,
    PartialAnalyseParams, WorkerRequest,
};

#[derive(Parser)]
#[command(name = "trip-segmenter")]
#[command(about = "Split GPS track logs into rides and stops", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a single KMZ or KML file
    Analyze {
        /// Track file (.kmz or .kml)
        file: PathBuf,

        #[command(flatten)]
        thresholds: ThresholdArgs,

        /// Print the raw JSON response instead of a summary
        #[arg(long)]
        json: bool,

        /// Write rides and stops as a GeoJSON FeatureCollection
        #[arg(long, value_name = "OUT")]
        geojson: Option<PathBuf>,
    },

    /// Analyse several files independently and print one line per file
    Batch {
        /// Track files (.kmz or .kml)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },
}

#[derive(Args)]
struct ThresholdArgs {
    /// Minimum speed (km/h) for an interval to count as moving
    #[arg(long)]
    v_min_kmh: Option<f64>,

    /// Minimum distance (m) for an interval to count as moving
    #[arg(long)]
    d_min_m: Option<f64>,

    /// Minimum ride duration in minutes
    #[arg(long)]
    ride_min_min: Option<f64>,

    /// Minimum stop duration in minutes
    #[arg(long)]
    stop_min_min: Option<f64>,

    /// Time gap in minutes that forces a segment break
    #[arg(long)]
    gap_split_min: Option<f64>,
}

impl ThresholdArgs {
    fn overrides(&self) -> PartialAnalyseParams {
        PartialAnalyseParams {
            v_min_kmh: self.v_min_kmh,
            d_min_m: self.d_min_m,
            ride_min_min: self.ride_min_min,
            stop_min_min: self.stop_min_min,
            gap_split_min: self.gap_split_min,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let outcome = match cli.command {
        Commands::Analyze { file, thresholds, json, geojson } => {
            run_analyze(&file, thresholds.overrides(), json, geojson.as_deref())
        }
        Commands::Batch { files, thresholds } => {
            run_batch(&files, thresholds.overrides().resolve(&AnalyseParams::default()))
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_analyze(
    file: &Path,
    overrides: PartialAnalyseParams,
    json: bool,
    geojson_out: Option<&Path>,
) -> Result<(), String> {
    let bytes = fs::read(file).map_err(|e| format!("{}: {}", file.display(), e))?;
    let request = WorkerRequest::new(bytes, overrides);
    let response = process_request(&request, &AnalyseParams::default());

    if json {
        let text = serde_json::to_string_pretty(&response).map_err(|e| e.to_string())?;
        println!("{}", text);
        return if response.ok { Ok(()) } else { Err("analysis failed".to_string()) };
    }

    let result = response.into_result()?;
    print_summary(file, &result);

    if let Some(out) = geojson_out {
        let collection = to_feature_collection(&result);
        let text = serde_json::to_string_pretty(&collection).map_err(|e| e.to_string())?;
        fs::write(out, text).map_err(|e| format!("{}: {}", out.display(), e))?;
        println!("\nGeoJSON written to {}", out.display());
    }
    Ok(())
}

fn run_batch(files: &[PathBuf], params: AnalyseParams) -> Result<(), String> {
    let results = analyze_files(files, &params);
    let failed = results.iter().filter(|r| !r.is_ok()).count();

    for entry in &results {
        match &entry.outcome {
            Ok(result) => println!(
                "  [OK]  {} - {} km, {} rides, {} stops",
                entry.path.display(),
                format_km(result.total_distance_m),
                result.rides.len(),
                result.stops.len()
            ),
            Err(e) => println!("  [ERR] {} - {}", entry.path.display(), e),
        }
    }

    println!("\n{} of {} files analysed", results.len() - failed, results.len());
    if failed == results.len() {
        return Err("no file could be analysed".to_string());
    }
    Ok(())
}

fn print_summary(file: &Path, result: &AnalysisResult) {
    println!("\n{}", "=".repeat(60));
    println!("{}", file.display());
    println!("{}", "=".repeat(60));
    println!(
        "Total: {} km over {} points, moving {}",
        format_km(result.total_distance_m),
        result.points.len(),
        format_duration(result.moving_time_s())
    );

    println!("\nRides ({}):", result.rides.len());
    for ride in &result.rides {
        println!(
            "  #{:<3} {:>7} km  {} -> {}  {:>7}  {:>5.1} km/h",
            ride.id,
            format_km(ride.distance_m),
            format_clock(ride.start_time),
            format_clock(ride.end_time),
            format_duration(ride.duration_s),
            ride.avg_speed_kmh
        );
    }

    println!("\nStops ({}):", result.stops.len());
    for stop in &result.stops {
        println!(
            "  #{:<3} {} -> {}  {:>7}  at ({:.5}, {:.5}) r={:.0} m",
            stop.id,
            format_clock(stop.start_time),
            format_clock(stop.end_time),
            format_duration(stop.duration_s),
            stop.centroid.latitude,
            stop.centroid.longitude,
            stop.radius_m
        );
    }
}

/// Meters as kilometers with two decimals.
fn format_km(meters: f64) -> String {
    format!("{:.2}", meters / 1000.0)
}

/// Seconds as `{h}h {m}m`, partial minutes dropped.
fn format_duration(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor().max(0.0) as u64;
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Epoch milliseconds as a UTC wall-clock time.
fn format_clock(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

//! Independent analysis of several track files.
//!
//! Each file is read and analysed on its own; nothing is merged across
//! files. Results keep the input order.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use crate::analysis::{analyze_track_bytes, AnalysisResult};
use crate::error::Result;
use crate::AnalyseParams;

/// The outcome for one input file.
#[derive(Debug)]
pub struct FileAnalysis {
    pub path: PathBuf,
    pub outcome: Result<AnalysisResult>,
}

impl FileAnalysis {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Read and analyse a single file.
pub fn analyze_file(path: &Path, params: &AnalyseParams) -> Result<AnalysisResult> {
    let bytes = fs::read(path)?;
    analyze_track_bytes(&bytes, params)
}

fn run_one(path: &Path, params: &AnalyseParams) -> FileAnalysis {
    let outcome = analyze_file(path, params);
    if let Err(ref e) = outcome {
        warn!("[Batch] {}: {}", path.display(), e);
    }
    FileAnalysis { path: path.to_path_buf(), outcome }
}

/// Analyse each file sequentially.
pub fn analyze_files<P: AsRef<Path>>(paths: &[P], params: &AnalyseParams) -> Vec<FileAnalysis> {
    paths.iter().map(|p| run_one(p.as_ref(), params)).collect()
}

/// Analyse files in parallel using rayon.
///
/// Same output as [`analyze_files`]; order still follows `paths`.
#[cfg(feature = "parallel")]
pub fn analyze_files_parallel<P: AsRef<Path> + Sync>(
    paths: &[P],
    params: &AnalyseParams,
) -> Vec<FileAnalysis> {
    use rayon::prelude::*;

    paths.par_iter().map(|p| run_one(p.as_ref(), params)).collect()
}

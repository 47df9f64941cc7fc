//! Running reports and optimizations over files on disk

use crate::stats::{model_report, ModelReport, ReportOptions};
use anyhow::{Context, Result};
use g3dkit_core::Model;
use g3dkit_optimize::{join_model, JoinOptions, JoinSummary};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of reporting on one file
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<ModelReport>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

fn load(path: &Path) -> Result<Model> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    g3dkit_io::decode(&bytes).with_context(|| format!("Failed to decode {:?}", path))
}

/// Decode one file and report on it
pub fn report_file<P: AsRef<Path>>(path: P, options: &ReportOptions) -> Result<ModelReport> {
    let path = path.as_ref();
    let model = load(path)?;
    let report = model_report(&model, options);
    tracing::info!("{}: {} meshes, {:.1}% of input size", path.display(), report.meshes.len(), report.ratio() * 100.0);
    Ok(report)
}

/// Report on many files in parallel.
///
/// A file that fails to load does not stop the others; its outcome carries
/// the error. Outcomes are returned in input order.
pub fn process_files<P: AsRef<Path> + Sync>(paths: &[P], options: &ReportOptions) -> Vec<FileOutcome> {
    let outcomes: Vec<FileOutcome> = paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            let result = report_file(path, options);
            if let Err(e) = &result {
                tracing::warn!("{:#}", e);
            }
            FileOutcome {
                path: path.to_path_buf(),
                result,
            }
        })
        .collect();

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    if failed > 0 {
        tracing::warn!("{} of {} files failed", failed, outcomes.len());
    }
    outcomes
}

/// Join the compatible meshes of `src` and write the result to `dest`
pub fn optimize_file<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dest: Q, options: &JoinOptions) -> Result<JoinSummary> {
    let (src, dest) = (src.as_ref(), dest.as_ref());
    let mut model = load(src)?;
    tracing::info!("{}", model.describe().trim_end());

    let summary = join_model(&mut model, options);
    g3dkit_io::write_model(dest, &model).with_context(|| format!("Failed to write {:?}", dest))?;

    tracing::info!(
        "{} -> {}: {} meshes -> {}",
        src.display(),
        dest.display(),
        summary.meshes_before,
        summary.meshes_after
    );
    Ok(summary)
}

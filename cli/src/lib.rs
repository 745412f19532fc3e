use serde::Serialize;
use shapes::{AnalyzerConfig, CompletionReport, ShapeAnalysis};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Load an analyzer configuration, detecting the format from the file
/// extension.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AnalyzerConfig, CliError> {
    let path_ref = path.as_ref();
    let content = fs::read_to_string(path_ref)?;
    match path_ref.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => Ok(toml::from_str(&content)?),
        Some("json") => Ok(serde_json::from_str(&content)?),
        _ => Err(CliError::UnsupportedFileFormat),
    }
}

/// Machine-readable summary of an analysis run.
#[derive(Debug, Serialize)]
pub struct AnalysisReport<'a> {
    pub width: u32,
    pub height: u32,
    pub outcomes: &'a [shapes::ContourOutcome],
}

impl<'a> AnalysisReport<'a> {
    pub fn new(analysis: &'a ShapeAnalysis) -> Self {
        Self {
            width: analysis.width,
            height: analysis.height,
            outcomes: &analysis.outcomes,
        }
    }
}

/// Machine-readable summary of a completion run.
#[derive(Debug, Serialize)]
pub struct CompletionSummary {
    pub width: u32,
    pub height: u32,
    pub outer_ellipses: usize,
    pub inner_ellipses: usize,
    pub missing_outer_regions: usize,
    pub missing_inner_regions: usize,
    pub is_complete: bool,
    pub skipped: Vec<shapes::SkipReason>,
}

impl CompletionSummary {
    pub fn new(report: &CompletionReport) -> Self {
        Self {
            width: report.width,
            height: report.height,
            outer_ellipses: report.outer_ellipses.len(),
            inner_ellipses: report.inner_ellipses.len(),
            missing_outer_regions: report.missing_outer.len(),
            missing_inner_regions: report.missing_inner.len(),
            is_complete: report.is_complete(),
            skipped: report.skipped.clone(),
        }
    }
}

/// Write any serializable report as pretty-printed JSON.
pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<(), CliError> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content)?;
    Ok(())
}

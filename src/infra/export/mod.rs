use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::error::ExtractError;
use crate::infra::import::extension_of;
use crate::usecase::ports::workbook::ReportSink;

pub mod csv;
pub mod xlsx;

pub const DEFAULT_OUTPUT: &str = "parsed_output.xlsx";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        match extension_of(path).as_str() {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(ExtractError::Validation(format!(
                "output {} must end in .xlsx or .csv",
                path.display()
            ))),
        }
    }
}

pub fn sink_for(path: &Path) -> Result<Box<dyn ReportSink>, ExtractError> {
    Ok(match OutputFormat::from_path(path)? {
        OutputFormat::Xlsx => Box::new(xlsx::XlsxReportWriter),
        OutputFormat::Csv => Box::new(csv::CsvReportWriter),
    })
}

/// Scratch directory owned by one write. The report is written inside it and
/// renamed over the destination on success; dropping it removes whatever is
/// left, on every exit path.
pub struct StagedOutput {
    dir: TempDir,
    staged: PathBuf,
    destination: PathBuf,
}

impl StagedOutput {
    pub fn new(destination: &Path) -> Result<Self, ExtractError> {
        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = destination
            .file_name()
            .ok_or_else(|| ExtractError::write(destination, "output path has no file name"))?;
        let dir = tempfile::Builder::new()
            .prefix(".flagged-orders-")
            .tempdir_in(parent)
            .map_err(|e| ExtractError::write(destination, e))?;
        let staged = dir.path().join(file_name);
        Ok(Self {
            dir,
            staged,
            destination: destination.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.staged
    }

    pub fn commit(self) -> Result<(), ExtractError> {
        fs::rename(&self.staged, &self.destination)
            .map_err(|e| ExtractError::write(&self.destination, e))?;
        debug!(
            scratch = %self.dir.path().display(),
            destination = %self.destination.display(),
            "committed staged report"
        );
        Ok(())
    }
}

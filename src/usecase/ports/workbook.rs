use std::path::Path;

use crate::domain::entities::order_line::OutputRow;
use crate::domain::entities::sheet::Sheet;
use crate::error::ExtractError;

/// Reads the active sheet of an input resource.
pub trait SheetSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<Sheet, ExtractError>;
}

/// Writes the simplified report. Implementations replace any existing file
/// at `path` and must not leave a partial file behind on failure.
pub trait ReportSink: Send + Sync {
    fn write(&self, rows: &[OutputRow], path: &Path) -> Result<(), ExtractError>;
}

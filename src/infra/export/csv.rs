use std::path::Path;

use tracing::info;

use crate::domain::entities::layout::OUTPUT_HEADERS;
use crate::domain::entities::order_line::OutputRow;
use crate::error::ExtractError;
use crate::infra::export::StagedOutput;
use crate::usecase::ports::workbook::ReportSink;

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReportWriter;

impl ReportSink for CsvReportWriter {
    fn write(&self, rows: &[OutputRow], path: &Path) -> Result<(), ExtractError> {
        let stage = StagedOutput::new(path)?;
        write_csv(rows, stage.path()).map_err(|e| ExtractError::write(path, e))?;
        stage.commit()?;
        info!(path = %path.display(), rows = rows.len(), "wrote csv report");
        Ok(())
    }
}

fn write_csv(rows: &[OutputRow], path: &Path) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(OUTPUT_HEADERS)?;
    for row in rows {
        match row {
            OutputRow::Line(line) => {
                writer.write_record(line.values().map(|value| value.to_string()))?
            }
            OutputRow::Separator => writer.write_record(["", "", ""])?,
        }
    }
    writer.flush()?;
    Ok(())
}

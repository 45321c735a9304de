use std::path::Path;

use tracing::info;
use umya_spreadsheet::Worksheet;

use crate::domain::entities::layout::OUTPUT_HEADERS;
use crate::domain::entities::order_line::OutputRow;
use crate::domain::entities::sheet::CellValue;
use crate::error::ExtractError;
use crate::infra::export::StagedOutput;
use crate::usecase::ports::workbook::ReportSink;

const OUTPUT_COLUMNS: [&str; 3] = ["A", "B", "C"];

#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxReportWriter;

impl ReportSink for XlsxReportWriter {
    fn write(&self, rows: &[OutputRow], path: &Path) -> Result<(), ExtractError> {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_active_sheet_mut();

        for (column, header) in OUTPUT_COLUMNS.iter().zip(OUTPUT_HEADERS) {
            sheet
                .get_cell_mut(format!("{column}1").as_str())
                .set_value_string(header);
        }
        // Separators are rows with no cells; the row counter still advances.
        for (offset, row) in rows.iter().enumerate() {
            if let OutputRow::Line(line) = row {
                let row_number = offset + 2;
                for (column, value) in OUTPUT_COLUMNS.iter().zip(line.values()) {
                    write_value(sheet, &format!("{column}{row_number}"), value);
                }
            }
        }

        let stage = StagedOutput::new(path)?;
        umya_spreadsheet::writer::xlsx::write(&book, stage.path())
            .map_err(|e| ExtractError::write(path, e))?;
        stage.commit()?;
        info!(path = %path.display(), rows = rows.len(), "wrote xlsx report");
        Ok(())
    }
}

fn write_value(sheet: &mut Worksheet, coordinate: &str, value: &CellValue) {
    match value {
        CellValue::Empty => {}
        CellValue::Number(v) => {
            sheet.get_cell_mut(coordinate).set_value_number(*v);
        }
        CellValue::Text(v) => {
            sheet.get_cell_mut(coordinate).set_value_string(v.as_str());
        }
        CellValue::Bool(v) => {
            sheet.get_cell_mut(coordinate).set_value_bool(*v);
        }
    }
}

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::debug;

use crate::domain::entities::sheet::{Cell, CellValue, Sheet, SheetRow};
use crate::error::ExtractError;
use crate::infra::import::ensure_input_path;
use crate::infra::import::fills::{read_active_sheet_fills, SheetFills};
use crate::usecase::ports::workbook::SheetSource;

/// Workbook loader: values through calamine, fills from the sheet styles.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxSheetSource;

impl SheetSource for XlsxSheetSource {
    fn load(&self, path: &Path) -> Result<Sheet, ExtractError> {
        load_active_sheet(path)
    }
}

pub fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::String(v) => CellValue::Text(v.to_string()),
        Data::Float(v) => CellValue::Number(*v),
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Bool(v) => CellValue::Bool(*v),
        Data::DateTime(v) => CellValue::Text(v.to_string()),
        Data::DateTimeIso(v) => CellValue::Text(v.to_string()),
        Data::DurationIso(v) => CellValue::Text(v.to_string()),
        Data::Error(v) => CellValue::Text(format!("{v:?}")),
        Data::Empty => CellValue::Empty,
    }
}

pub fn load_active_sheet(path: &Path) -> Result<Sheet, ExtractError> {
    ensure_input_path(path)?;
    if !path.is_file() {
        return Err(ExtractError::resource(path, "file not found"));
    }

    let fills = read_active_sheet_fills(path)?;
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ExtractError::resource(path, e))?;
    let range = workbook
        .worksheet_range(&fills.sheet_name)
        .map_err(|e| ExtractError::resource(path, format!("sheet {}: {e}", fills.sheet_name)))?;

    let sheet = assemble_sheet(&fills.sheet_name, &range, &fills);
    debug!(
        path = %path.display(),
        sheet = %sheet.name,
        rows = sheet.rows.len(),
        columns = sheet.width(),
        "loaded workbook"
    );
    Ok(sheet)
}

/// Grid from A1 to the furthest cell holding a value or a fill, so column
/// positions stay absolute.
fn assemble_sheet(name: &str, range: &Range<Data>, fills: &SheetFills) -> Sheet {
    let (value_rows, value_cols) = range.end().map_or((0, 0), |(r, c)| (r + 1, c + 1));
    let (fill_rows, fill_cols) = fills.extent().map_or((0, 0), |(r, c)| (r + 1, c + 1));
    let height = value_rows.max(fill_rows);
    let width = value_cols.max(fill_cols);

    let rows = (0..height)
        .map(|r| SheetRow {
            number: r + 1,
            cells: (0..width)
                .map(|c| {
                    Cell::new(
                        range.get_value((r, c)).map(cell_value).unwrap_or_default(),
                        fills.get(r, c).cloned(),
                    )
                })
                .collect(),
        })
        .collect();

    Sheet {
        name: name.to_string(),
        rows,
    }
}

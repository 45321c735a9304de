use crate::domain::entities::highlight::ColorTag;
use crate::domain::entities::layout::ResolvedLayout;
use crate::domain::entities::sheet::{CellValue, Sheet, SheetRow};

/// One data row of the report, read through a resolved layout.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    /// 1-based row number in the source sheet.
    pub source_row: u32,
    /// Zero-based position among the data rows (header excluded). Counts
    /// every data row, so skip and stop rows never shift later ordinals.
    pub ordinal: usize,
    pub order_id: CellValue,
    pub item_id: CellValue,
    pub required_qty: CellValue,
    pub group_key: CellValue,
    pub select_marker: Option<ColorTag>,
    pub skip_marker: Option<ColorTag>,
    pub stop_marker: Option<ColorTag>,
}

impl OrderLine {
    pub fn from_row(row: &SheetRow, ordinal: usize, layout: &ResolvedLayout) -> Self {
        Self {
            source_row: row.number,
            ordinal,
            order_id: row.value(layout.order_id),
            item_id: row.value(layout.item_id),
            required_qty: row.value(layout.required_qty),
            group_key: row.value(layout.group_key),
            select_marker: row.fill(layout.select_marker),
            skip_marker: row.fill(layout.skip_marker),
            stop_marker: row.fill(layout.stop_marker),
        }
    }

    pub fn project(&self) -> ProjectedLine {
        ProjectedLine {
            order_id: self.order_id.clone(),
            item_id: self.item_id.clone(),
            required_qty: self.required_qty.clone(),
        }
    }
}

/// All data rows of a sheet as order lines.
pub fn order_lines(sheet: &Sheet, layout: &ResolvedLayout) -> Vec<OrderLine> {
    sheet
        .data_rows()
        .iter()
        .enumerate()
        .map(|(ordinal, row)| OrderLine::from_row(row, ordinal, layout))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedLine {
    pub order_id: CellValue,
    pub item_id: CellValue,
    pub required_qty: CellValue,
}

impl ProjectedLine {
    pub fn values(&self) -> [&CellValue; 3] {
        [&self.order_id, &self.item_id, &self.required_qty]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputRow {
    Line(ProjectedLine),
    Separator,
}

impl OutputRow {
    pub fn is_separator(&self) -> bool {
        matches!(self, OutputRow::Separator)
    }
}

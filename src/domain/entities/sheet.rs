use std::cmp::Ordering;
use std::fmt;

use crate::domain::entities::highlight::ColorTag;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Empty => 0,
            CellValue::Number(_) => 1,
            CellValue::Text(_) => 2,
            CellValue::Bool(_) => 3,
        }
    }

    /// Total order used for sorting and grouping:
    /// empty < numbers < text < booleans.
    pub fn key_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    pub fn same_key(&self, other: &Self) -> bool {
        self.key_cmp(other) == Ordering::Equal
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(v) => f.write_str(&format_number(*v)),
            CellValue::Text(v) => f.write_str(v),
            CellValue::Bool(v) => write!(f, "{}", if *v { "TRUE" } else { "FALSE" }),
        }
    }
}

pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value.fract().abs() < f64::EPSILON && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    pub value: CellValue,
    pub fill: Option<ColorTag>,
}

impl Cell {
    pub fn new(value: CellValue, fill: Option<ColorTag>) -> Self {
        Self { value, fill }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    /// 1-based row number in the source sheet.
    pub number: u32,
    pub cells: Vec<Cell>,
}

impl SheetRow {
    pub fn cell(&self, idx: usize) -> Option<&Cell> {
        self.cells.get(idx)
    }

    pub fn value(&self, idx: usize) -> CellValue {
        self.cell(idx).map(|c| c.value.clone()).unwrap_or_default()
    }

    pub fn fill(&self, idx: usize) -> Option<ColorTag> {
        self.cell(idx).and_then(|c| c.fill.clone())
    }

    pub fn has_values(&self) -> bool {
        self.cells.iter().any(|c| !c.value.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<SheetRow>,
}

impl Sheet {
    /// Widest row, counting styled empty cells.
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    /// Position of the header row (first row holding any value).
    pub fn header_position(&self) -> Option<usize> {
        self.rows.iter().position(SheetRow::has_values)
    }

    pub fn header(&self) -> Option<&SheetRow> {
        self.header_position().map(|idx| &self.rows[idx])
    }

    /// Rows after the header.
    pub fn data_rows(&self) -> &[SheetRow] {
        match self.header_position() {
            Some(idx) => &self.rows[idx + 1..],
            None => &[],
        }
    }

    pub fn header_labels(&self) -> Vec<String> {
        self.header()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|c| c.value.to_string().trim().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

use std::fmt;

use crate::domain::entities::sheet::Sheet;
use crate::error::ExtractError;

pub const SALES_ORDER_HEADER: &str = "Sales Order";
pub const ITEM_ID_HEADER: &str = "Item ID";
pub const REQUIRED_QTY_HEADER: &str = "Required Qty";

/// Output header, in column order.
pub const OUTPUT_HEADERS: [&str; 3] = [SALES_ORDER_HEADER, ITEM_ID_HEADER, REQUIRED_QTY_HEADER];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    /// Zero-based column position.
    Index(usize),
    /// Header label, matched after trimming.
    Header(String),
}

impl ColumnRef {
    pub fn header(label: impl Into<String>) -> Self {
        ColumnRef::Header(label.into())
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Index(idx) => write!(f, "#{idx}"),
            ColumnRef::Header(label) => write!(f, "'{label}'"),
        }
    }
}

/// Where each field of an order line lives in the source sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub order_id: ColumnRef,
    pub item_id: ColumnRef,
    pub required_qty: ColumnRef,
    pub group_key: ColumnRef,
    pub select_marker: ColumnRef,
    pub skip_marker: ColumnRef,
    pub stop_marker: ColumnRef,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::positional()
    }
}

impl ColumnLayout {
    /// Fixed positions of the fulfillment report export.
    pub fn positional() -> Self {
        Self {
            order_id: ColumnRef::Index(3),
            item_id: ColumnRef::Index(6),
            required_qty: ColumnRef::Index(13),
            group_key: ColumnRef::Index(3),
            select_marker: ColumnRef::Index(3),
            skip_marker: ColumnRef::Index(4),
            stop_marker: ColumnRef::Index(0),
        }
    }

    /// Data columns by header label, grouped by `group_column`; marker
    /// cells stay positional.
    pub fn by_header(group_column: &str) -> Self {
        Self {
            order_id: ColumnRef::header(SALES_ORDER_HEADER),
            item_id: ColumnRef::header(ITEM_ID_HEADER),
            required_qty: ColumnRef::header(REQUIRED_QTY_HEADER),
            group_key: ColumnRef::header(group_column),
            ..Self::positional()
        }
    }

    pub fn resolve(&self, sheet: &Sheet) -> Result<ResolvedLayout, ExtractError> {
        if sheet.header().is_none() {
            return Err(ExtractError::column("header row (sheet is empty)"));
        }
        let labels = sheet.header_labels();
        let width = sheet.width();
        let find = |column: &ColumnRef| -> Result<usize, ExtractError> {
            match column {
                ColumnRef::Index(idx) if *idx < width => Ok(*idx),
                ColumnRef::Index(idx) => Err(ExtractError::column(format!(
                    "position {idx} (sheet has {width} columns)"
                ))),
                ColumnRef::Header(label) => labels
                    .iter()
                    .position(|candidate| candidate == label.trim())
                    .ok_or_else(|| ExtractError::column(label.clone())),
            }
        };

        Ok(ResolvedLayout {
            order_id: find(&self.order_id)?,
            item_id: find(&self.item_id)?,
            required_qty: find(&self.required_qty)?,
            group_key: find(&self.group_key)?,
            select_marker: find(&self.select_marker)?,
            skip_marker: find(&self.skip_marker)?,
            stop_marker: find(&self.stop_marker)?,
        })
    }
}

/// A layout with every column pinned to a position of one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLayout {
    pub order_id: usize,
    pub item_id: usize,
    pub required_qty: usize,
    pub group_key: usize,
    pub select_marker: usize,
    pub skip_marker: usize,
    pub stop_marker: usize,
}

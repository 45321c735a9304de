use crate::domain::entities::highlight::Palette;
use crate::domain::entities::layout::ColumnLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// What a stop-colored row does to the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopPolicy {
    /// Leave the row out and keep scanning.
    #[default]
    IgnoreRow,
    /// Leave the row out and end the scan there.
    EndScan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterPolicy {
    /// Select rows whose select marker has the select color.
    #[default]
    Marker,
    /// Classify rows by the skip, stop and select markers, in that order.
    Disposition(StopPolicy),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractOptions {
    pub layout: ColumnLayout,
    pub palette: Palette,
    pub policy: FilterPolicy,
    pub direction: SortDirection,
}

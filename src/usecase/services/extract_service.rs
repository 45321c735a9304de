use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::domain::entities::highlight::ColorTag;
use crate::domain::entities::layout::ColumnRef;
use crate::domain::entities::options::ExtractOptions;
use crate::domain::entities::order_line::order_lines;
use crate::domain::entities::sheet::Sheet;
use crate::error::ExtractError;
use crate::infra::export::{sink_for, OutputFormat};
use crate::infra::import::ensure_input_path;
use crate::infra::import::xlsx::XlsxSheetSource;
use crate::usecase::ports::workbook::{ReportSink, SheetSource};
use crate::usecase::services::filter::select_lines;
use crate::usecase::services::grouping::{group_lines, separate_groups, sort_lines};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub options: ExtractOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub scanned: usize,
    pub selected: usize,
    pub skipped: usize,
    pub stopped: usize,
    pub groups: usize,
    /// Data rows plus separators, header excluded.
    pub rows_written: usize,
    pub finished_at: DateTime<Local>,
}

impl ExtractReport {
    pub fn summary(&self) -> String {
        format!(
            "{} → {}: {} of {} rows selected in {} groups ({} skipped, {} stopped) at {}",
            self.input.display(),
            self.output.display(),
            self.selected,
            self.scanned,
            self.groups,
            self.skipped,
            self.stopped,
            self.finished_at.format("%H:%M:%S"),
        )
    }
}

pub struct ExtractService {
    source: Arc<dyn SheetSource>,
}

impl Default for ExtractService {
    fn default() -> Self {
        Self::new(Arc::new(XlsxSheetSource))
    }
}

impl ExtractService {
    pub fn new(source: Arc<dyn SheetSource>) -> Self {
        Self { source }
    }

    /// Runs the pipeline and writes with the sink matching the output
    /// extension.
    pub fn run(&self, request: &ExtractRequest) -> Result<ExtractReport, ExtractError> {
        let sink = sink_for(&request.output)?;
        self.run_with_sink(request, sink.as_ref())
    }

    pub fn run_with_sink(
        &self,
        request: &ExtractRequest,
        sink: &dyn ReportSink,
    ) -> Result<ExtractReport, ExtractError> {
        ensure_input_path(&request.input)?;
        OutputFormat::from_path(&request.output)?;

        let sheet = self.source.load(&request.input)?;
        let options = &request.options;
        let layout = options.layout.resolve(&sheet)?;
        let lines = order_lines(&sheet, &layout);
        debug!(lines = lines.len(), ?layout, "built order lines");

        let selection = select_lines(lines, &options.palette, options.policy);
        let stats = selection.stats;
        let mut selected = selection.lines;
        sort_lines(&mut selected, options.direction);
        let groups = group_lines(&selected);
        let rows = separate_groups(&groups);

        sink.write(&rows, &request.output)?;

        let report = ExtractReport {
            input: request.input.clone(),
            output: request.output.clone(),
            scanned: stats.scanned,
            selected: stats.selected,
            skipped: stats.skipped,
            stopped: stats.stopped,
            groups: groups.len(),
            rows_written: rows.len(),
            finished_at: Local::now(),
        };
        info!(
            input = %report.input.display(),
            output = %report.output.display(),
            selected = report.selected,
            groups = report.groups,
            "extraction finished"
        );
        Ok(report)
    }

    pub fn load(&self, input: &Path) -> Result<Sheet, ExtractError> {
        ensure_input_path(input)?;
        self.source.load(input)
    }

    /// Header labels of the active sheet, in column order.
    pub fn headers(&self, input: &Path) -> Result<Vec<String>, ExtractError> {
        let sheet = self.load(input)?;
        if sheet.header().is_none() {
            return Err(ExtractError::column("header row (sheet is empty)"));
        }
        Ok(sheet.header_labels())
    }

    /// Fill tags found in `column` over the data rows, with counts.
    pub fn marker_census(
        &self,
        input: &Path,
        column: &ColumnRef,
    ) -> Result<BTreeMap<ColorTag, usize>, ExtractError> {
        let sheet = self.load(input)?;
        let idx = column_index(&sheet, column)?;
        let mut census = BTreeMap::new();
        for tag in sheet.data_rows().iter().filter_map(|row| row.fill(idx)) {
            *census.entry(tag).or_insert(0) += 1;
        }
        Ok(census)
    }
}

fn column_index(sheet: &Sheet, column: &ColumnRef) -> Result<usize, ExtractError> {
    match column {
        ColumnRef::Index(idx) => Ok(*idx),
        ColumnRef::Header(label) => sheet
            .header_labels()
            .iter()
            .position(|candidate| candidate == label.trim())
            .ok_or_else(|| ExtractError::column(label.clone())),
    }
}

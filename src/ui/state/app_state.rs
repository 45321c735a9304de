use std::path::PathBuf;

use chrono::Local;
use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::layout::SALES_ORDER_HEADER;
use crate::domain::entities::options::SortDirection;
use crate::usecase::services::extract_service::ExtractReport;

pub struct AppState {
    pub input_path: Signal<Option<PathBuf>>,
    pub headers: Signal<Vec<String>>,
    pub group_column: Signal<Option<String>>,
    pub direction: Signal<SortDirection>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
    pub last_report: Signal<Option<ExtractReport>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            input_path: use_signal(|| None::<PathBuf>),
            headers: use_signal(Vec::<String>::new),
            group_column: use_signal(|| None::<String>),
            direction: use_signal(SortDirection::default),
            busy: use_signal(|| false),
            status: use_signal(|| "Choose a report to begin".to_string()),
            last_report: use_signal(|| None::<ExtractReport>),
        }
    }
}

/// Save-dialog suggestion, e.g. `processed_output_1018.xlsx`.
pub fn default_output_name() -> String {
    format!("processed_output_{}.xlsx", Local::now().format("%m%d"))
}

/// Grouping column preselected after a report is opened.
pub fn default_group_column(headers: &[String]) -> Option<String> {
    headers
        .iter()
        .find(|h| h.as_str() == SALES_ORDER_HEADER)
        .or_else(|| headers.iter().find(|h| !h.is_empty()))
        .cloned()
}

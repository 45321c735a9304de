use std::sync::Arc;

use dioxus::prelude::*;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};

use crate::config::{load_config, AppConfig, StopKind};
use crate::domain::entities::layout::ColumnLayout;
use crate::domain::entities::options::{ExtractOptions, FilterPolicy, SortDirection, StopPolicy};
use crate::error::ExtractError;
use crate::infra::import::INPUT_EXTENSIONS;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::state::app_state::{default_group_column, default_output_name, AppState};
use crate::usecase::services::extract_service::{ExtractRequest, ExtractService};

fn show_error(title: &str, err: &ExtractError) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(err.to_string())
        .set_buttons(MessageButtons::Ok)
        .show();
}

/// Desktop runs follow the upload form: header layout grouped by the chosen
/// column, disposition policy with the configured stop handling.
fn desktop_options(
    config: &AppConfig,
    group_column: &str,
    direction: SortDirection,
) -> ExtractOptions {
    let stop = match config.filter.stop {
        StopKind::Ignore => StopPolicy::IgnoreRow,
        StopKind::End => StopPolicy::EndScan,
    };
    let mut options = config.options();
    options.layout = ColumnLayout::by_header(group_column);
    options.policy = FilterPolicy::Disposition(stop);
    options.direction = direction;
    options
}

#[component]
pub fn App() -> Element {
    let AppState {
        mut input_path,
        mut headers,
        mut group_column,
        mut direction,
        mut busy,
        mut status,
        mut last_report,
    } = AppState::new();

    let config = use_hook(|| load_config(None).unwrap_or_default());
    let service = use_hook(|| Arc::new(ExtractService::default()));
    let service_for_pick = service.clone();
    let service_for_extract = service.clone();

    let pick_input = move |_: MouseEvent| {
        let Some(file_path) = FileDialog::new()
            .add_filter("Excel", &INPUT_EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        *busy.write() = true;
        *status.write() = format!("Reading {}", file_path.display());
        match run_blocking("read headers", || service_for_pick.headers(&file_path)) {
            Ok(labels) => {
                *group_column.write() = default_group_column(&labels);
                *headers.write() = labels;
                *status.write() = format!("Loaded {}", file_path.display());
                *input_path.write() = Some(file_path);
                *last_report.write() = None;
            }
            Err(err) => {
                *status.write() = format!("Failed to open report: {err}");
                show_error("Cannot open report", &err);
            }
        }
        *busy.write() = false;
    };

    let config_for_extract = config.clone();
    let extract = move |_: MouseEvent| {
        let Some(input) = input_path() else {
            return;
        };
        let Some(group) = group_column() else {
            *status.write() = "Choose a grouping column first".to_string();
            return;
        };
        let Some(output) = FileDialog::new()
            .add_filter("Excel", &["xlsx"])
            .add_filter("CSV", &["csv"])
            .set_file_name(default_output_name())
            .save_file()
        else {
            return;
        };

        let request = ExtractRequest {
            input,
            output,
            options: desktop_options(&config_for_extract, &group, direction()),
        };
        *busy.write() = true;
        *status.write() = format!("Extracting to {}", request.output.display());
        match run_blocking("extract", || service_for_extract.run(&request)) {
            Ok(report) => {
                *status.write() = report.summary();
                *last_report.write() = Some(report);
            }
            Err(err) => {
                *status.write() = format!("Extraction failed: {err}");
                show_error("Extraction failed", &err);
            }
        }
        *busy.write() = false;
    };

    let input_label = input_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(no report selected)".to_string());
    let header_options: Vec<String> = headers
        .read()
        .iter()
        .filter(|label| !label.is_empty())
        .cloned()
        .collect();
    let no_headers = header_options.is_empty();
    let selected_group = group_column();
    let is_busy = busy();
    let can_extract = !is_busy && input_path.read().is_some() && selected_group.is_some();
    let descending = direction() == SortDirection::Desc;
    let report_line = last_report().map(|report| {
        format!(
            "{} rows written ({} groups) to {}",
            report.rows_written,
            report.groups,
            report.output.display()
        )
    });

    rsx! {
        div {
            style: "font-family: sans-serif; padding: 16px; display: flex; flex-direction: column; gap: 12px;",
            h2 { "Flagged sales orders" }
            div {
                style: "display: flex; gap: 8px; align-items: center;",
                button {
                    style: "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;",
                    disabled: is_busy,
                    onclick: pick_input,
                    "Choose report…"
                }
                span { "{input_label}" }
            }
            div {
                style: "display: flex; gap: 6px; align-items: center;",
                span { "Group by" }
                select {
                    disabled: no_headers || is_busy,
                    onchange: move |event| *group_column.write() = Some(event.value()),
                    for label in header_options {
                        option {
                            value: "{label}",
                            selected: selected_group.as_deref() == Some(label.as_str()),
                            "{label}"
                        }
                    }
                }
            }
            div {
                style: "display: flex; gap: 6px; align-items: center;",
                span { "Order" }
                select {
                    disabled: is_busy,
                    onchange: move |event| {
                        *direction.write() = if event.value() == "d" {
                            SortDirection::Desc
                        } else {
                            SortDirection::Asc
                        };
                    },
                    option { value: "a", selected: !descending, "Ascending" }
                    option { value: "d", selected: descending, "Descending" }
                }
            }
            div {
                button {
                    style: "border: 1px solid #3a6ee8; background: #eef4ff; padding: 6px 14px; border-radius: 6px; cursor: pointer;",
                    disabled: !can_extract,
                    onclick: extract,
                    "Extract…"
                }
            }
            p { style: "color: #444;", "{status}" }
            if let Some(line) = report_line {
                p { style: "color: #666; font-size: 0.9em;", "{line}" }
            }
        }
    }
}

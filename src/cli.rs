use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{AppConfig, LayoutKind, OrderKind, PolicyKind, StopKind};
use crate::domain::entities::highlight::ColorTag;
use crate::error::ExtractError;
use crate::infra::export::DEFAULT_OUTPUT;
use crate::infra::import::ensure_input_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    /// Header labels of the active sheet
    Headers,
    /// Fill colors found in the select marker column
    Colors,
}

/// Extract highlight-flagged sales order lines from a fulfillment report.
#[derive(Debug, Parser)]
#[command(name = "flagged-orders", version, about)]
pub struct Cli {
    /// Path to the .xlsx report. Opens the desktop app when omitted.
    #[arg(value_parser = parse_input_path)]
    pub file_path: Option<PathBuf>,

    /// Output file path (.xlsx or .csv). Default is 'parsed_output.xlsx'.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Sort order: 'a' for ascending and 'd' for descending.
    #[arg(long, value_enum)]
    pub order: Option<OrderKind>,

    /// Group by this header label (implies --by-header).
    #[arg(short = 'g', long)]
    pub group_column: Option<String>,

    /// Locate data columns by header label instead of position.
    #[arg(long)]
    pub by_header: bool,

    /// Row selection policy.
    #[arg(long, value_enum)]
    pub policy: Option<PolicyKind>,

    /// What a stop-colored row does under the disposition policy.
    #[arg(long, value_enum)]
    pub stop: Option<StopKind>,

    /// Select color as ARGB hex, e.g. FF92D050.
    #[arg(long, value_parser = parse_color)]
    pub color: Option<ColorTag>,

    /// TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// List specific data instead of extracting.
    #[arg(short, long, value_enum)]
    pub list: Option<ListKind>,

    /// Debug logging (RUST_LOG takes precedence).
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_input_path(raw: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(raw);
    ensure_input_path(&path).map_err(|err| err.to_string())?;
    Ok(path)
}

fn parse_color(raw: &str) -> Result<ColorTag, String> {
    let valid = raw.len() == 8 && raw.chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(ColorTag::new(raw))
    } else {
        Err(format!("{raw} is not an 8-digit ARGB hex color"))
    }
}

impl Cli {
    /// Folds command-line flags over a loaded configuration.
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(group) = &self.group_column {
            config.columns.layout = LayoutKind::Header;
            config.columns.group_column = Some(group.clone());
        }
        if self.by_header {
            config.columns.layout = LayoutKind::Header;
        }
        if let Some(order) = self.order {
            config.output.order = order;
        }
        if let Some(policy) = self.policy {
            config.filter.policy = policy;
        }
        if let Some(stop) = self.stop {
            config.filter.stop = stop;
        }
        if let Some(color) = &self.color {
            config.colors.select = Some(color.clone());
        }
        if let Some(output) = &self.output {
            config.output.path = Some(output.clone());
        }
        config
    }

    pub fn output_path(config: &AppConfig) -> PathBuf {
        config
            .output
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    pub fn input(&self) -> Result<&PathBuf, ExtractError> {
        self.file_path
            .as_ref()
            .ok_or_else(|| ExtractError::Validation("an input .xlsx file is required".into()))
    }
}

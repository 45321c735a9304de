use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use directories::ProjectDirs;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::entities::highlight::{ColorTag, Palette};
use crate::domain::entities::layout::{ColumnLayout, ColumnRef, SALES_ORDER_HEADER};
use crate::domain::entities::options::{ExtractOptions, FilterPolicy, SortDirection, StopPolicy};
use crate::error::ExtractError;

pub const CONFIG_FILE_NAME: &str = "config.toml";

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "hellhbbd", "flagged-orders")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// Fixed column positions of the report export
    #[default]
    Positional,
    /// Data columns located by header label
    Header,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Select rows by the select marker only
    #[default]
    Marker,
    /// Classify rows by skip, stop and select markers
    Disposition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    /// Leave stop rows out and keep scanning
    #[default]
    Ignore,
    /// End the scan at the first stop row
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
pub enum OrderKind {
    /// Ascending
    #[default]
    #[serde(rename = "a")]
    #[value(name = "a")]
    Ascending,
    /// Descending
    #[serde(rename = "d")]
    #[value(name = "d")]
    Descending,
}

impl From<OrderKind> for SortDirection {
    fn from(value: OrderKind) -> Self {
        match value {
            OrderKind::Ascending => SortDirection::Asc,
            OrderKind::Descending => SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnsConfig {
    pub layout: LayoutKind,
    pub group_column: Option<String>,
    pub order_id: Option<usize>,
    pub item_id: Option<usize>,
    pub required_qty: Option<usize>,
    pub select_marker: Option<usize>,
    pub skip_marker: Option<usize>,
    pub stop_marker: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorsConfig {
    pub select: Option<ColorTag>,
    pub skip: Option<ColorTag>,
    pub stop: Option<ColorTag>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    pub policy: PolicyKind,
    pub stop: StopKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
    pub order: OrderKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub columns: ColumnsConfig,
    pub colors: ColorsConfig,
    pub filter: FilterConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn layout(&self) -> ColumnLayout {
        let columns = &self.columns;
        let mut layout = match (columns.layout, &columns.group_column) {
            (LayoutKind::Header, group) => {
                ColumnLayout::by_header(group.as_deref().unwrap_or(SALES_ORDER_HEADER))
            }
            (LayoutKind::Positional, Some(group)) => ColumnLayout::by_header(group),
            (LayoutKind::Positional, None) => ColumnLayout::positional(),
        };

        let overrides = [
            (columns.order_id, &mut layout.order_id),
            (columns.item_id, &mut layout.item_id),
            (columns.required_qty, &mut layout.required_qty),
            (columns.select_marker, &mut layout.select_marker),
            (columns.skip_marker, &mut layout.skip_marker),
            (columns.stop_marker, &mut layout.stop_marker),
        ];
        for (idx, slot) in overrides {
            if let Some(idx) = idx {
                *slot = ColumnRef::Index(idx);
            }
        }
        // Positional grouping follows the order id column.
        if columns.layout == LayoutKind::Positional && columns.group_column.is_none() {
            layout.group_key = layout.order_id.clone();
        }
        layout
    }

    pub fn palette(&self) -> Palette {
        let defaults = Palette::default();
        Palette {
            select: self.colors.select.clone().unwrap_or(defaults.select),
            skip: self.colors.skip.clone().unwrap_or(defaults.skip),
            stop: self.colors.stop.clone().unwrap_or(defaults.stop),
        }
    }

    pub fn policy(&self) -> FilterPolicy {
        match self.filter.policy {
            PolicyKind::Marker => FilterPolicy::Marker,
            PolicyKind::Disposition => FilterPolicy::Disposition(match self.filter.stop {
                StopKind::Ignore => StopPolicy::IgnoreRow,
                StopKind::End => StopPolicy::EndScan,
            }),
        }
    }

    pub fn options(&self) -> ExtractOptions {
        ExtractOptions {
            layout: self.layout(),
            palette: self.palette(),
            policy: self.policy(),
            direction: self.output.order.into(),
        }
    }
}

/// An explicit `--config` path must load; the per-user file is optional and
/// falls back to defaults when broken.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, ExtractError> {
    if let Some(path) = explicit {
        let contents = fs::read_to_string(path).map_err(|e| ExtractError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = AppConfig::parse(&contents).map_err(|e| ExtractError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), "loaded config");
        return Ok(config);
    }

    let Some(path) = project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME)) else {
        return Ok(AppConfig::default());
    };
    match fs::read_to_string(&path) {
        Ok(contents) => match AppConfig::parse(&contents) {
            Ok(config) => {
                debug!(path = %path.display(), "loaded user config");
                Ok(config)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "invalid user config, using defaults");
                Ok(AppConfig::default())
            }
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "unreadable user config, using defaults");
            Ok(AppConfig::default())
        }
    }
}

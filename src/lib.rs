//! Extracts highlight-flagged sales order lines from fulfillment report
//! workbooks, groups them by order and writes a simplified report.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod usecase;

#[cfg(feature = "desktop")]
pub mod app;
#[cfg(feature = "desktop")]
pub mod platform;
#[cfg(feature = "desktop")]
pub mod ui;

#[cfg(test)]
mod test_support;

pub use error::ExtractError;

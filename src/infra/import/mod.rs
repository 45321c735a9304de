use std::path::Path;

use crate::error::ExtractError;

pub mod fills;
pub mod xlsx;

/// Workbook extensions the loader accepts (OOXML only; fills are read from
/// the package parts).
pub const INPUT_EXTENSIONS: [&str; 2] = ["xlsx", "xlsm"];

pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default()
}

pub fn ensure_input_path(path: &Path) -> Result<(), ExtractError> {
    let ext = extension_of(path);
    if INPUT_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(ExtractError::Validation(format!(
            "File {} is not a valid .xlsx file.",
            path.display()
        )))
    }
}

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::config::project_dirs;

pub fn default_webview_data_dir() -> Result<PathBuf> {
    let dirs = project_dirs().ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    ensure_webview_data_dir(dirs.data_local_dir())
}

/// WebView2 keeps its profile under the app's local data dir instead of
/// next to the executable.
pub fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

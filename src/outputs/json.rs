//! JSON output of the run [`Report`].
//!
//! The report carries the query parameters, the dataset origin (live or
//! placeholder), the summary statistics, recurring terms and the exported
//! rows, so an external dashboard can render every view from one file.

use super::Report;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialize a [`Report`] to pretty-printed JSON.
pub fn report_to_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Write a [`Report`] to `path`, creating parent directories as needed.
///
/// # Returns
///
/// `Ok(())` on success, or an error if serialization, directory creation or
/// file writing fails.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn write_report(report: &Report, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    let json = report_to_json(report)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!(items = report.items.len(), "Wrote JSON report");
    Ok(())
}

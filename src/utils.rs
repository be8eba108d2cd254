//! Utility functions for edition naming, string shaping, and file system checks.
//!
//! - Time classification for edition naming
//! - Slugs for output file names
//! - Relative ages and truncation for the Markdown report
//! - Output directory validation

use crate::normalize::normalize;
use chrono::{DateTime, Local, Timelike, Utc};
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Classify an hour of the day into an edition name.
///
/// - **morning**: 00:00 - 08:00
/// - **afternoon**: 08:00 - 16:00
/// - **evening**: 16:00 - 24:00
pub fn edition_for_hour(hour: u32) -> &'static str {
    match hour {
        0..=7 => "morning",
        8..=15 => "afternoon",
        _ => "evening",
    }
}

/// Edition name for the current local time.
pub fn time_of_day() -> String {
    let hour = Local::now().time().hour();
    let which = edition_for_hour(hour);
    tracing::debug!(hour, %which, "Computed time_of_day");
    which.to_string()
}

/// Convert free text to a file-name friendly slug.
///
/// Accents are folded, anything that is not ASCII alphanumeric becomes a
/// separator, and runs of separators collapse to one hyphen.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify(r#"("Inteligência Artificial" Piauí)"#), "inteligencia-artificial-piaui");
/// ```
pub fn slugify(text: &str) -> String {
    normalize(text)
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Capitalize the first character of a string.
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Keep at most `max` characters, marking a cut with an ellipsis.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}…", &s[..idx]),
    }
}

/// Human-readable age of `published` relative to `now`.
///
/// Timestamps in the future read as "just now".
pub fn humanize_age(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let mins = (now - published).num_minutes();
    if mins < 1 {
        return "just now".to_string();
    }
    if mins < 60 {
        return format!("{mins} min ago");
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{hours} h ago");
    }
    format!("{} d ago", hours / 24)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn ensure_writable_dir(path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}

//! CSV export of the item table.
//!
//! Columns: `title, link, description, sentiment, domain, publishedAt`.
//! `publishedAt` is RFC 3339 in UTC, or empty when the date was not parsable.

use crate::models::ClassifiedItem;
use chrono::SecondsFormat;
use std::error::Error;
use std::io::Write;
use std::path::Path;
use tracing::{info, instrument};

pub const HEADER: [&str; 6] = ["title", "link", "description", "sentiment", "domain", "publishedAt"];

/// Write the table to any writer.
pub fn write_items<W: Write>(items: &[ClassifiedItem], writer: W) -> Result<(), ::csv::Error> {
    let mut writer = ::csv::Writer::from_writer(writer);
    writer.write_record(HEADER)?;
    for item in items {
        let published_at = item
            .published_at()
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_default();
        writer.write_record([
            item.title(),
            item.link(),
            item.description(),
            item.sentiment.as_str(),
            item.domain(),
            published_at.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the table to `path`.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub fn write_csv_file(items: &[ClassifiedItem], path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let file = std::fs::File::create(path.as_ref())?;
    write_items(items, file)?;
    info!(rows = items.len(), "Wrote CSV export");
    Ok(())
}

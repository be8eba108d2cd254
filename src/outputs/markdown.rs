//! Markdown summary of a run.
//!
//! Sections, in order: headline numbers, top sources, latest items (newest
//! first), recurring terms, and the filtered item table.

use super::Report;
use crate::models::{ClassifiedItem, DatasetOrigin};
use crate::utils::{humanize_age, truncate_chars, upcase};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{self, Write};
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Number of cards in the "Latest" section.
pub const LATEST_LIMIT: usize = 6;

/// Description length shown on each latest card.
const CARD_DESCRIPTION_CHARS: usize = 200;

/// Render `report` as Markdown; ages are computed against `now`.
pub fn report_to_markdown(report: &Report, now: DateTime<Utc>) -> String {
    let mut md = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut md, report, now);
    md
}

/// Render `report` and write it to `path`.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn write_markdown_file(
    report: &Report,
    now: DateTime<Utc>,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn Error>> {
    let md = report_to_markdown(report, now);
    fs::write(path.as_ref(), md).await?;
    info!(items = report.items.len(), "Wrote Markdown summary");
    Ok(())
}

fn write_report(md: &mut String, report: &Report, now: DateTime<Utc>) -> fmt::Result {
    writeln!(md, "# News Pulse: {}\n", escape_inline(&report.query))?;
    writeln!(
        md,
        "*{} edition, generated {} ({} / {})*\n",
        upcase(&report.edition),
        report.generated_at.format("%Y-%m-%d %H:%M UTC"),
        report.language,
        report.region
    )?;

    if report.origin == DatasetOrigin::Placeholder {
        writeln!(md, "> No items came back from the feed; showing placeholder records.\n")?;
    }

    writeln!(md, "## Overview\n")?;
    writeln!(md, "| Metric | Count | Share |")?;
    writeln!(md, "|---|---:|---:|")?;
    writeln!(md, "| Total | {} | |", report.summary.total)?;
    for share in &report.summary.labels {
        writeln!(md, "| {} | {} | {}% |", share.sentiment, share.count, share.percent)?;
    }
    writeln!(md)?;

    writeln!(md, "## Top sources\n")?;
    if report.summary.top_domains.is_empty() {
        writeln!(md, "No sources could be identified.\n")?;
    } else {
        for (domain, count) in &report.summary.top_domains {
            writeln!(md, "- `{}` • {}", domain, count)?;
        }
        writeln!(md)?;
    }

    writeln!(md, "## Latest\n")?;
    for item in latest(&report.items, LATEST_LIMIT) {
        write_card(md, item, now)?;
    }

    writeln!(md, "## Recurring terms\n")?;
    if report.top_terms.is_empty() {
        writeln!(md, "No recurring terms.\n")?;
    } else {
        writeln!(md, "| Term | Freq | Bigram | Freq |")?;
        writeln!(md, "|---|---:|---|---:|")?;
        let rows = report.top_terms.len().max(report.top_bigrams.len());
        for i in 0..rows {
            let (term, term_freq) = cell(report.top_terms.get(i));
            let (bigram, bigram_freq) = cell(report.top_bigrams.get(i));
            writeln!(md, "| {term} | {term_freq} | {bigram} | {bigram_freq} |")?;
        }
        writeln!(md)?;
    }

    writeln!(md, "## Items\n")?;
    writeln!(md, "| Title | Sentiment | Source | Published |")?;
    writeln!(md, "|---|---|---|---|")?;
    for item in &report.items {
        let published = item
            .published_at()
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        writeln!(
            md,
            "| {} | {} | {} | {} |",
            title_link(item),
            item.sentiment,
            item.domain(),
            published
        )?;
    }
    Ok(())
}

fn write_card(md: &mut String, item: &ClassifiedItem, now: DateTime<Utc>) -> fmt::Result {
    let when = item
        .published_at()
        .map(|ts| humanize_age(ts, now))
        .unwrap_or_default();
    writeln!(md, "### {}\n", title_link(item))?;
    writeln!(md, "<small>{} • {} • {}</small>\n", item.domain(), when, item.sentiment)?;
    let description = truncate_chars(item.clean_description().trim(), CARD_DESCRIPTION_CHARS);
    if !description.is_empty() {
        writeln!(md, "{}\n", escape_inline(&description))?;
    }
    Ok(())
}

/// Items sorted newest first; undated items go last in input order.
fn latest(items: &[ClassifiedItem], limit: usize) -> Vec<&ClassifiedItem> {
    let mut sorted: Vec<&ClassifiedItem> = items.iter().collect();
    sorted.sort_by(|a, b| b.published_at().cmp(&a.published_at()));
    sorted.truncate(limit);
    sorted
}

fn cell(entry: Option<&(String, usize)>) -> (String, String) {
    entry
        .map(|(text, freq)| (text.clone(), freq.to_string()))
        .unwrap_or_default()
}

fn title_link(item: &ClassifiedItem) -> String {
    let title = if item.title().trim().is_empty() {
        "(untitled)".to_string()
    } else {
        escape_inline(item.title())
    };
    if item.link().is_empty() {
        title
    } else {
        format!("[{}]({})", title, item.link())
    }
}

/// Escape characters that would break a table cell or a link label.
fn escape_inline(s: &str) -> String {
    s.replace('|', "\\|")
        .replace('[', "\\[")
        .replace(']', "\\]")
        .replace('\n', " ")
}

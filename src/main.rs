//! # News Pulse
//!
//! Fetches the Google News RSS feed for a query, labels every item's
//! sentiment and writes the dataset as CSV, JSON and Markdown.
//!
//! ## Usage
//!
//! ```sh
//! news_pulse "inteligência artificial" --must Piauí -o ./out
//! ```
//!
//! Logging verbosity follows `RUST_LOG` (default `info`).

use chrono::{Local, Utc};
use clap::Parser;
use news_pulse::cli::Cli;
use news_pulse::feed::FeedFetcher;
use news_pulse::models::{FeedRequest, Sentiment};
use news_pulse::outputs::{OutputFormat, Report, csv, json, markdown};
use news_pulse::pipeline::{Pipeline, placeholder_items};
use news_pulse::query::build_query;
use news_pulse::sentiment::Lexicon;
use news_pulse::utils::{ensure_writable_dir, slugify, time_of_day};
use std::error::Error;
use std::path::PathBuf;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_pulse starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Early check: fail before the network call if nothing can be written
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let lexicon = match &args.lexicon {
        Some(path) => match Lexicon::load(path) {
            Ok(lexicon) => lexicon,
            Err(e) => {
                error!(path = %path, error = %e, "Failed to load lexicon");
                return Err(e.into());
            }
        },
        None => Lexicon::default(),
    };

    let query = build_query(&args.query, &args.must, &args.exclude, &args.site);
    let request = FeedRequest::new(query, args.max_items as usize, args.language, args.region);
    info!(
        query = %request.query,
        max_items = request.max_items,
        language = %request.language,
        region = %request.region,
        "Built feed request"
    );

    // ---- Fetch and classify ----
    let fetcher = FeedFetcher::with_base_url(args.feed_url.clone(), args.timeout());
    let mut pipeline = Pipeline::new(fetcher, lexicon);
    let dataset = if args.no_placeholder {
        pipeline.run(&request).await
    } else {
        pipeline.run_or_placeholder(&request, placeholder_items()).await
    };
    info!(count = dataset.len(), origin = ?dataset.origin, "Dataset ready");

    // ---- Report ----
    let item_filter = args.item_filter();
    let rows = item_filter.apply(&dataset.items);
    if !item_filter.is_empty() {
        info!(kept = rows.len(), total = dataset.len(), "Applied export filters");
    }

    let edition = time_of_day();
    let now = Utc::now();
    let report = Report::new(&request, &dataset, rows, args.top_domains, edition, now);
    info!(
        total = report.summary.total,
        positive = report.summary.count(Sentiment::Positive),
        neutral = report.summary.count(Sentiment::Neutral),
        negative = report.summary.count(Sentiment::Negative),
        "Summary computed"
    );

    // ---- Write outputs ----
    let stem = output_stem(&Local::now().date_naive().to_string(), &report.edition, &args.query);
    for format in &args.formats {
        let path = PathBuf::from(&args.output_dir).join(format!("{stem}.{}", format.extension()));
        let result = match format {
            OutputFormat::Csv => csv::write_csv_file(&report.items, &path),
            OutputFormat::Json => json::write_report(&report, &path).await,
            OutputFormat::Markdown => markdown::write_markdown_file(&report, now, &path).await,
        };
        match result {
            Ok(()) => info!(path = %path.display(), "Wrote output"),
            Err(e) => error!(path = %path.display(), error = %e, "Failed writing output"),
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// File stem shared by every output of a run.
fn output_stem(date: &str, edition: &str, query: &str) -> String {
    let slug = slugify(query);
    if slug.is_empty() {
        format!("{date}_{edition}")
    } else {
        format!("{date}_{edition}_{slug}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_stem() {
        assert_eq!(
            output_stem("2025-05-06", "morning", r#"("Inteligência Artificial" Piauí)"#),
            "2025-05-06_morning_inteligencia-artificial-piaui"
        );
        assert_eq!(output_stem("2025-05-06", "evening", "  "), "2025-05-06_evening");
    }
}

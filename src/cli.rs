//! Command-line interface definitions for News Pulse.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Output locations, the feed endpoint and the lexicon file can also be set
//! through environment variables.

use crate::feed::GOOGLE_NEWS_RSS_URL;
use crate::filter::ItemFilter;
use crate::models::{Language, Region, Sentiment};
use crate::outputs::OutputFormat;
use chrono::NaiveDate;
use clap::Parser;
use std::time::Duration;

/// Base query used when none is given on the command line.
pub const DEFAULT_BASE_QUERY: &str = r#"("Inteligência Artificial" Piauí) OR ("SIA Piauí")"#;

/// Command-line arguments for the News Pulse application.
///
/// # Examples
///
/// ```sh
/// # Default query, every output format
/// news_pulse
///
/// # Narrow the search and keep only negative coverage from one outlet
/// news_pulse "inteligência artificial" --must "Piauí,governo estadual" --exclude esporte \
///     --sentiment negative --source g1.globo.com -o ./out
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Base search expression, used verbatim
    #[arg(default_value = DEFAULT_BASE_QUERY)]
    pub query: String,

    /// Comma-separated terms that must appear (phrases allowed)
    #[arg(long, default_value = "")]
    pub must: String,

    /// Comma-separated terms to exclude
    #[arg(long, default_value = "")]
    pub exclude: String,

    /// Restrict results to one site (scheme and "www." are ignored)
    #[arg(long, default_value = "")]
    pub site: String,

    /// Maximum number of feed items to read (duplicates among them are dropped)
    #[arg(short = 'n', long, default_value_t = 15, value_parser = clap::value_parser!(u64).range(5..=30))]
    pub max_items: u64,

    /// Interface language of the feed
    #[arg(long, value_enum, default_value_t = Language::PtBr)]
    pub language: Language,

    /// Edition (region) of the feed
    #[arg(long, value_enum, default_value_t = Region::Brazil)]
    pub region: Region,

    /// Output directory for the generated files
    #[arg(short, long, env = "NEWS_PULSE_OUTPUT_DIR", default_value = "./news_pulse")]
    pub output_dir: String,

    /// Comma-separated list of formats to write
    #[arg(
        short,
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [OutputFormat::Csv, OutputFormat::Json, OutputFormat::Markdown]
    )]
    pub formats: Vec<OutputFormat>,

    /// Optional path to a YAML lexicon replacing the built-in vocabulary
    #[arg(short, long, env = "NEWS_PULSE_LEXICON")]
    pub lexicon: Option<String>,

    /// Number of sources listed in the summary
    #[arg(long, default_value_t = 10)]
    pub top_domains: usize,

    /// Write empty outputs instead of placeholder records when the feed is empty
    #[arg(long)]
    pub no_placeholder: bool,

    /// HTTP timeout for the feed request, in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,

    /// RSS search endpoint
    #[arg(long, env = "NEWS_PULSE_FEED_URL", default_value = GOOGLE_NEWS_RSS_URL)]
    pub feed_url: String,

    /// Export only items whose title or description contains this text
    #[arg(long)]
    pub term: Option<String>,

    /// Export only items from these domains (repeatable)
    #[arg(long = "source")]
    pub sources: Vec<String>,

    /// Export only items with these labels (repeatable)
    #[arg(long = "sentiment", value_enum)]
    pub sentiments: Vec<Sentiment>,

    /// Export only items published on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<NaiveDate>,

    /// Export only items published on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<NaiveDate>,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The export filter described by the filter flags.
    pub fn item_filter(&self) -> ItemFilter {
        ItemFilter {
            term: self.term.clone().filter(|t| !t.trim().is_empty()),
            sources: self.sources.clone(),
            sentiments: self.sentiments.clone(),
            since: self.since,
            until: self.until,
        }
    }
}

//! Output generation for the classified dataset.
//!
//! # Submodules
//!
//! - [`csv`]: the exported table (`title, link, description, sentiment, domain, publishedAt`)
//! - [`json`]: the full [`Report`] for API consumers
//! - [`markdown`]: a readable summary with KPIs, sources, latest items and recurring terms
//!
//! # Output Structure
//!
//! Every run writes files sharing one stem built from the local date, the
//! edition and the query slug:
//!
//! ```text
//! output_dir/
//! ├── 2025-05-06_morning_inteligencia-artificial-piaui.csv
//! ├── 2025-05-06_morning_inteligencia-artificial-piaui.json
//! └── 2025-05-06_morning_inteligencia-artificial-piaui.md
//! ```

pub mod csv;
pub mod json;
pub mod markdown;

use crate::aggregate::{Summary, top_bigrams, top_terms, word_cloud_text};
use crate::models::{ClassifiedItem, Dataset, DatasetOrigin, FeedRequest, Language, Region};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

/// Number of entries in the recurring-term lists.
pub const TERM_LIMIT: usize = 15;

/// File formats the CLI can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
        }
    }
}

/// Everything a presentation layer needs from one run.
///
/// Statistics describe the whole dataset; `items` holds the rows that passed
/// the export filters.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub query: String,
    pub language: Language,
    pub region: Region,
    pub generated_at: DateTime<Utc>,
    pub edition: String,
    pub origin: DatasetOrigin,
    pub summary: Summary,
    pub top_terms: Vec<(String, usize)>,
    pub top_bigrams: Vec<(String, usize)>,
    /// Clean descriptions joined into one text, for word-cloud renderers.
    pub word_cloud: String,
    pub items: Vec<ClassifiedItem>,
}

impl Report {
    pub fn new(
        request: &FeedRequest,
        dataset: &Dataset,
        items: Vec<ClassifiedItem>,
        domain_limit: usize,
        edition: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            query: request.query.clone(),
            language: request.language,
            region: request.region,
            generated_at,
            edition: edition.into(),
            origin: dataset.origin,
            summary: Summary::from_items(&dataset.items, domain_limit),
            top_terms: top_terms(&dataset.items, TERM_LIMIT),
            top_bigrams: top_bigrams(&dataset.items, TERM_LIMIT),
            word_cloud: word_cloud_text(&dataset.items),
            items,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::pipeline::{classify_items, placeholder_items};
    use crate::sentiment::Lexicon;
    use chrono::TimeZone;

    pub fn report() -> Report {
        let mut raw = placeholder_items();
        raw[0].pub_date = "Tue, 06 May 2025 09:00:00 GMT".to_string();
        raw[1].title = "Debate | impactos da IA".to_string();
        let dataset = Dataset::live(classify_items(raw, &Lexicon::default(), 10));
        let request = FeedRequest::new("ia piaui", 10, Language::PtBr, Region::Brazil);
        Report::new(
            &request,
            &dataset,
            dataset.items.clone(),
            10,
            "afternoon",
            Utc.with_ymd_and_hms(2025, 5, 6, 12, 0, 0).unwrap(),
        )
    }
}

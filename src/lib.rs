//! # News Pulse
//!
//! Collects the items Google News publishes for a search query over RSS,
//! cleans their text, drops duplicates and labels each item Positive,
//! Neutral or Negative with a keyword lexicon. The labelled dataset is
//! summarized (label shares, top sources, recurring terms) and written as
//! CSV, JSON and Markdown.
//!
//! ## Architecture
//!
//! 1. **Query**: [`query::build_query`] composes the search expression
//! 2. **Fetching**: [`feed::FeedFetcher`] downloads and parses the feed
//! 3. **Cleaning**: [`normalize`] strips markup, folds accents and derives domain and date
//! 4. **Dedupe**: [`dedupe::dedupe`] keeps the first item per (link, title) pair
//! 5. **Labelling**: [`sentiment::Lexicon`] scores the normalized text
//! 6. **Aggregation**: [`aggregate::Summary`] and the term rankings
//! 7. **Output**: [`outputs`] writes the selected formats
//!
//! [`pipeline::Pipeline`] wires steps 2 to 5 together with an optional
//! [`cache::DatasetCache`].

pub mod aggregate;
pub mod cache;
pub mod cli;
pub mod dedupe;
pub mod error;
pub mod feed;
pub mod filter;
pub mod models;
pub mod normalize;
pub mod outputs;
pub mod pipeline;
pub mod query;
pub mod sentiment;
pub mod utils;

#[cfg(test)]
mod test_support;

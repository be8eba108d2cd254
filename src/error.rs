//! Error types for feed retrieval and lexicon loading.
//!
//! Neither error crosses the pipeline boundary: [`FeedError`] is logged and
//! degraded to an empty result by the fetcher, and [`LexiconError`] only
//! surfaces when a caller asks to load a lexicon file.

use thiserror::Error;

/// Failures while retrieving or parsing the RSS feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport failure: DNS, connect, timeout, body read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The feed answered with a non-success status.
    #[error("feed returned status {0}")]
    Status(u16),

    /// The body is not well-formed XML.
    #[error("malformed feed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The document ended with elements still open, e.g. a cut-off body.
    #[error("feed XML ended with {open} unclosed element(s)")]
    Incomplete { open: usize },
}

/// Failures while loading a keyword lexicon.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("cannot read lexicon file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid lexicon YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A stem ended up in both the positive and the negative set.
    #[error("terms present in both positive and negative sets: {}", .0.join(", "))]
    Overlap(Vec<String>),
}

//! Data models for feed items and their cleaned, classified representations.
//!
//! Items move through three shapes as the pipeline runs:
//! - [`NewsItem`]: raw record as read from the RSS feed
//! - [`NormalizedItem`]: markup stripped, text folded, domain and date derived
//! - [`ClassifiedItem`]: normalized item plus its [`Sentiment`] label
//!
//! A [`Dataset`] is the ordered, deduplicated collection handed to the outputs.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw feed item as parsed from an `<item>` element.
///
/// Every field is trimmed text; a missing element yields an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewsItem {
    /// The headline.
    pub title: String,
    /// The article link.
    pub link: String,
    /// The description, which may still contain markup.
    pub description: String,
    /// The publication date text (RFC 822 style in RSS).
    pub pub_date: String,
}

/// A [`NewsItem`] with its description cleaned and its source attributed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedItem {
    /// The raw item this was derived from.
    #[serde(flatten)]
    pub item: NewsItem,
    /// Markup-stripped, lower-cased, accent-folded, whitespace-collapsed description.
    pub clean_description: String,
    /// Host of `link` without a leading `www.`; empty when unparsable.
    pub domain: String,
    /// Parsed publication timestamp, if `pub_date` was in an accepted format.
    pub published_at: Option<DateTime<Utc>>,
}

/// The three sentiment labels, declared in display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Display order used by reports.
    pub const ORDER: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Map a lexicon score to its label.
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s > 0 => Sentiment::Positive,
            s if s < 0 => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A [`NormalizedItem`] with its sentiment label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedItem {
    #[serde(flatten)]
    pub normalized: NormalizedItem,
    /// Positive minus negative keyword hits in `clean_description`.
    pub score: i32,
    pub sentiment: Sentiment,
}

impl ClassifiedItem {
    pub fn title(&self) -> &str {
        &self.normalized.item.title
    }

    pub fn link(&self) -> &str {
        &self.normalized.item.link
    }

    pub fn description(&self) -> &str {
        &self.normalized.item.description
    }

    pub fn clean_description(&self) -> &str {
        &self.normalized.clean_description
    }

    pub fn domain(&self) -> &str {
        &self.normalized.domain
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.normalized.published_at
    }
}

/// Where the items of a [`Dataset`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetOrigin {
    /// Fetched from the feed (possibly empty).
    Live,
    /// Caller-supplied stand-in records used because the feed returned nothing.
    Placeholder,
}

/// An ordered collection of classified items, unique by `(link, title)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub origin: DatasetOrigin,
    pub items: Vec<ClassifiedItem>,
}

impl Dataset {
    pub fn live(items: Vec<ClassifiedItem>) -> Self {
        Self {
            origin: DatasetOrigin::Live,
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Interface language passed to the feed as `hl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Language {
    #[value(name = "pt-BR")]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[value(name = "pt-PT")]
    #[serde(rename = "pt-PT")]
    PtPt,
    #[value(name = "en-US")]
    #[serde(rename = "en-US")]
    EnUs,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::PtBr => "pt-BR",
            Language::PtPt => "pt-PT",
            Language::EnUs => "en-US",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Edition passed to the feed as `ceid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Region {
    #[value(name = "BR:pt-419")]
    #[serde(rename = "BR:pt-419")]
    Brazil,
    #[value(name = "PT:pt-150")]
    #[serde(rename = "PT:pt-150")]
    Portugal,
    #[value(name = "US:en")]
    #[serde(rename = "US:en")]
    UnitedStates,
}

impl Region {
    pub fn code(&self) -> &'static str {
        match self {
            Region::Brazil => "BR:pt-419",
            Region::Portugal => "PT:pt-150",
            Region::UnitedStates => "US:en",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Parameters of one fetch; also the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedRequest {
    pub query: String,
    pub max_items: usize,
    pub language: Language,
    pub region: Region,
}

impl FeedRequest {
    pub fn new(query: impl Into<String>, max_items: usize, language: Language, region: Region) -> Self {
        Self {
            query: query.into(),
            max_items,
            language,
            region,
        }
    }
}

//! Table filters applied before export.
//!
//! Every criterion is optional; an empty [`ItemFilter`] keeps everything.

use crate::models::{ClassifiedItem, Sentiment};
use chrono::NaiveDate;

/// Conjunction of the export filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    /// Case-insensitive substring of the title or the raw description.
    pub term: Option<String>,
    /// Keep only these source domains.
    pub sources: Vec<String>,
    /// Keep only these labels.
    pub sentiments: Vec<Sentiment>,
    /// Earliest publication date (inclusive, UTC).
    pub since: Option<NaiveDate>,
    /// Latest publication date (inclusive, UTC).
    pub until: Option<NaiveDate>,
}

impl ItemFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `item` passes every configured criterion.
    ///
    /// Items without a publication date fail any date bound.
    pub fn matches(&self, item: &ClassifiedItem) -> bool {
        if let Some(term) = self.term.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let hit = item.title().to_lowercase().contains(&term)
                || item.description().to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }

        if !self.sources.is_empty() && !self.sources.iter().any(|s| s == item.domain()) {
            return false;
        }

        if !self.sentiments.is_empty() && !self.sentiments.contains(&item.sentiment) {
            return false;
        }

        if self.since.is_some() || self.until.is_some() {
            let Some(date) = item.published_at().map(|ts| ts.date_naive()) else {
                return false;
            };
            if self.since.is_some_and(|since| date < since) {
                return false;
            }
            if self.until.is_some_and(|until| date > until) {
                return false;
            }
        }

        true
    }

    /// The matching items, in order.
    pub fn apply(&self, items: &[ClassifiedItem]) -> Vec<ClassifiedItem> {
        items.iter().filter(|i| self.matches(i)).cloned().collect()
    }
}

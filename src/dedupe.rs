//! Removal of repeated feed items.
//!
//! Google News frequently lists the same story twice within one result page.
//! Two items are the same story when both their link and their title match.

use crate::models::{ClassifiedItem, NewsItem, NormalizedItem};
use itertools::Itertools;

/// Items that can be deduplicated by `(link, title)`.
pub trait DedupeKey {
    fn link(&self) -> &str;
    fn title(&self) -> &str;
}

impl DedupeKey for NewsItem {
    fn link(&self) -> &str {
        &self.link
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl DedupeKey for NormalizedItem {
    fn link(&self) -> &str {
        &self.item.link
    }

    fn title(&self) -> &str {
        &self.item.title
    }
}

impl DedupeKey for ClassifiedItem {
    fn link(&self) -> &str {
        ClassifiedItem::link(self)
    }

    fn title(&self) -> &str {
        ClassifiedItem::title(self)
    }
}

/// Keep the first occurrence of every `(link, title)` pair, preserving order.
pub fn dedupe<T: DedupeKey>(items: Vec<T>) -> Vec<T> {
    let before = items.len();
    let unique: Vec<T> = items
        .into_iter()
        .unique_by(|item| (item.link().to_string(), item.title().to_string()))
        .collect();
    if unique.len() < before {
        tracing::debug!(before, after = unique.len(), "Dropped duplicate items");
    }
    unique
}

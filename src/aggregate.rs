//! Summary statistics over a classified dataset.
//!
//! Everything here is a pure function of the items and preserves first-seen
//! order among ties, so reports are stable between runs over the same feed.

use crate::models::{ClassifiedItem, Sentiment};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

/// Portuguese function words skipped when looking for recurring terms.
const STOP_WORDS: &[&str] = &[
    "de", "da", "do", "das", "dos", "a", "o", "as", "os", "e", "em", "um", "uma", "para", "por",
    "com", "no", "na", "nas", "nos", "que", "se", "sua", "seu", "sao", "ser", "ao", "aos", "ou",
    "mais", "menos", "sobre", "entre", "ate", "como", "tambem", "ja", "apos", "pela", "pelo",
];

static STOP_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOP_WORDS.iter().copied().collect());

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9\-]+").expect("valid word regex"));

/// Number of items per label; every label is present, zero when unused.
pub fn count_by_label(items: &[ClassifiedItem]) -> BTreeMap<Sentiment, usize> {
    let mut counts: BTreeMap<Sentiment, usize> = Sentiment::ORDER.iter().map(|s| (*s, 0)).collect();
    for item in items {
        *counts.entry(item.sentiment).or_insert(0) += 1;
    }
    counts
}

/// The `k` most frequent source domains.
///
/// Sorted by count descending; ties keep first-seen order. Items without a
/// domain are not counted.
pub fn top_domains(items: &[ClassifiedItem], k: usize) -> Vec<(String, usize)> {
    ranked(
        items
            .iter()
            .map(|i| i.domain())
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        k,
    )
}

/// Count occurrences and rank them by count descending, ties by first-seen.
fn ranked<K, I>(keys: I, k: usize) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();
    for key in keys {
        match index.get(&key) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }
    // Stable sort keeps first-seen order within equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(k);
    counts
}

/// Content words of a clean description: stop words and tokens of two
/// characters or fewer are dropped.
fn content_words(text: &str) -> impl Iterator<Item = &str> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|w| w.len() > 2 && !STOP_SET.contains(*w))
}

/// The `k` most frequent content words across all clean descriptions.
pub fn top_terms(items: &[ClassifiedItem], k: usize) -> Vec<(String, usize)> {
    ranked(
        items
            .iter()
            .flat_map(|i| content_words(i.clean_description()))
            .map(str::to_string),
        k,
    )
}

/// The `k` most frequent adjacent content-word pairs.
///
/// Pairs are formed over the concatenated word stream of the dataset, as the
/// word cloud reads it.
pub fn top_bigrams(items: &[ClassifiedItem], k: usize) -> Vec<(String, usize)> {
    let words: Vec<&str> = items
        .iter()
        .flat_map(|i| content_words(i.clean_description()))
        .collect();
    ranked(words.windows(2).map(|w| format!("{} {}", w[0], w[1])), k)
}

/// All clean descriptions joined with single spaces.
pub fn word_cloud_text(items: &[ClassifiedItem]) -> String {
    items
        .iter()
        .map(|i| i.clean_description())
        .filter(|d| !d.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Per-label count with its rounded share of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelShare {
    pub sentiment: Sentiment,
    pub count: usize,
    /// Whole-number percentage of the total; 0 for an empty dataset.
    pub percent: u32,
}

/// Headline numbers for a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub labels: Vec<LabelShare>,
    pub top_domains: Vec<(String, usize)>,
}

impl Summary {
    pub fn from_items(items: &[ClassifiedItem], domain_limit: usize) -> Self {
        let total = items.len();
        let counts = count_by_label(items);
        let labels = Sentiment::ORDER
            .iter()
            .map(|s| {
                let count = counts.get(s).copied().unwrap_or(0);
                LabelShare {
                    sentiment: *s,
                    count,
                    percent: percent(count, total),
                }
            })
            .collect();
        Self {
            total,
            labels,
            top_domains: top_domains(items, domain_limit),
        }
    }

    pub fn count(&self, sentiment: Sentiment) -> usize {
        self.labels
            .iter()
            .find(|l| l.sentiment == sentiment)
            .map(|l| l.count)
            .unwrap_or(0)
    }
}

fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}

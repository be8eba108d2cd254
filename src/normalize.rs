//! Text cleanup applied to feed items before keyword matching.
//!
//! - [`strip_markup_keep_text`]: visible text of an HTML fragment, entities decoded
//! - [`normalize`]: case-fold, accent-fold, whitespace-collapse
//! - [`extract_domain`]: source attribution from the item link
//! - [`parse_pub_date`]: RFC 2822 / RFC 3339 publication timestamps
//!
//! None of these fail: malformed input degrades to a best-effort or empty value.

use crate::models::{NewsItem, NormalizedItem};
use chrono::{DateTime, Utc};
use deunicode::deunicode_with_tofu;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use url::Url;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// Extract the visible text of an HTML fragment.
///
/// Text nodes are joined with a single space so words on either side of a tag
/// boundary stay apart, and HTML entities are decoded. When the HTML parser
/// reports errors the fragment is stripped with a `<...>` regex instead.
///
/// ```
/// use news_pulse::normalize::strip_markup_keep_text;
///
/// assert_eq!(strip_markup_keep_text("<i>A&amp;B</i>"), "A&B");
/// ```
pub fn strip_markup_keep_text(s: &str) -> String {
    if s.trim().is_empty() {
        return String::new();
    }

    let text = match visible_text(s) {
        Some(text) => text,
        None => TAG_RE.replace_all(s, " ").into_owned(),
    };
    html_escape::decode_html_entities(&text).into_owned()
}

/// Visible text of `s` parsed as an HTML fragment, or `None` on parse errors.
fn visible_text(s: &str) -> Option<String> {
    let fragment = Html::parse_fragment(s);
    if !fragment.errors.is_empty() {
        tracing::debug!(errors = ?fragment.errors, "Markup parse errors; falling back to regex strip");
        return None;
    }

    let text = fragment
        .root_element()
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) => {
                let hidden = node
                    .parent()
                    .and_then(|p| p.value().as_element().map(|el| el.name()))
                    .is_some_and(|name| matches!(name, "script" | "style" | "template"));
                (!hidden).then(|| (**text).to_string())
            }
            _ => None,
        })
        .join(" ");
    Some(text)
}

/// Normalize text for keyword matching: lower-case, transliterate to the
/// closest ASCII spelling, and collapse whitespace.
///
/// ```
/// use news_pulse::normalize::normalize;
///
/// assert_eq!(normalize("  Inovação   no\tPIAUÍ "), "inovacao no piaui");
/// ```
pub fn normalize(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    fold_to_ascii(&s.to_lowercase()).split_whitespace().join(" ")
}

/// Drop combining marks after canonical decomposition, then transliterate
/// whatever is still non-ASCII. Characters with no ASCII rendering vanish.
fn fold_to_ascii(s: &str) -> String {
    let stripped: String = s.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    if stripped.is_ascii() {
        return stripped;
    }
    deunicode_with_tofu(&stripped, "").to_ascii_lowercase()
}

/// Host of `link` without a leading `www.`; empty when `link` does not parse
/// as an absolute URL with a host.
pub fn extract_domain(link: &str) -> String {
    Url::parse(link.trim())
        .ok()
        .and_then(|url| {
            url.host_str()
                .map(|host| host.strip_prefix("www.").unwrap_or(host).to_string())
        })
        .unwrap_or_default()
}

/// Parse a feed publication date.
///
/// Accepted formats are RFC 2822 (the RSS `pubDate` format, e.g.
/// `Tue, 06 May 2025 14:30:00 GMT`) and RFC 3339. Anything else is treated as
/// absent.
pub fn parse_pub_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(s)
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Derive the cleaned description, domain and timestamp of a raw item.
pub fn normalize_item(item: NewsItem) -> NormalizedItem {
    let clean_description = normalize(&strip_markup_keep_text(&item.description));
    let domain = extract_domain(&item.link);
    let published_at = parse_pub_date(&item.pub_date);
    NormalizedItem {
        item,
        clean_description,
        domain,
        published_at,
    }
}

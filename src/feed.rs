//! Google News RSS retrieval.
//!
//! [`FeedFetcher`] builds the search feed URL for a [`FeedRequest`], performs a
//! single GET and parses the `<item>` elements of the response with
//! `quick-xml`.
//!
//! # Failure Policy
//!
//! [`FeedFetcher::try_fetch`] reports failures as [`FeedError`]. The public
//! [`FeedFetcher::fetch`] logs them and returns an empty vector, so a dead
//! network or a broken feed never stops the run; callers decide whether to
//! substitute placeholder data.

use crate::error::FeedError;
use crate::models::{FeedRequest, NewsItem};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use quick_xml::Reader;
use quick_xml::events::Event;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Search endpoint of the Google News RSS service.
pub const GOOGLE_NEWS_RSS_URL: &str = "https://news.google.com/rss/search";

/// Request timeout for the feed GET.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = concat!("news_pulse/", env!("CARGO_PKG_VERSION"));

/// Characters left as-is in the `q` parameter. Parentheses, quotes, space and
/// colon carry meaning in the search syntax (grouping, phrases, `site:`).
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'(')
    .remove(b')')
    .remove(b'"')
    .remove(b'\'')
    .remove(b' ')
    .remove(b':');

/// Build the feed URL for `request` against `base_url`.
///
/// ```
/// use news_pulse::feed::feed_url;
/// use news_pulse::models::{FeedRequest, Language, Region};
///
/// let req = FeedRequest::new("ia site:gov.br", 10, Language::PtBr, Region::Brazil);
/// assert_eq!(
///     feed_url("https://news.google.com/rss/search", &req),
///     "https://news.google.com/rss/search?q=ia site:gov.br&hl=pt-BR&ceid=BR:pt-419"
/// );
/// ```
pub fn feed_url(base_url: &str, request: &FeedRequest) -> String {
    format!(
        "{}?q={}&hl={}&ceid={}",
        base_url,
        utf8_percent_encode(&request.query, QUERY_ENCODE_SET),
        request.language.code(),
        request.region.code()
    )
}

/// HTTP client for the RSS search feed.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: Client,
    base_url: String,
}

impl FeedFetcher {
    /// Fetcher for the public Google News endpoint with the default timeout.
    pub fn new() -> Self {
        Self::with_base_url(GOOGLE_NEWS_RSS_URL, DEFAULT_TIMEOUT)
    }

    /// Fetcher for an arbitrary search endpoint.
    ///
    /// If the TLS backend cannot be initialised the default client is used,
    /// which has no timeout or custom user agent; a warning is logged.
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = match Client::builder().timeout(timeout).user_agent(USER_AGENT).build() {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "Failed to build HTTP client; falling back to defaults");
                Client::new()
            }
        };
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn url_for(&self, request: &FeedRequest) -> String {
        feed_url(&self.base_url, request)
    }

    /// Fetch up to `request.max_items` items, degrading every failure to an
    /// empty vector.
    #[instrument(level = "info", skip_all, fields(query = %request.query, max_items = request.max_items))]
    pub async fn fetch(&self, request: &FeedRequest) -> Vec<NewsItem> {
        match self.try_fetch(request).await {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "Feed fetch failed; returning no items");
                Vec::new()
            }
        }
    }

    /// Fetch and parse the feed, reporting failures.
    pub async fn try_fetch(&self, request: &FeedRequest) -> Result<Vec<NewsItem>, FeedError> {
        let url = self.url_for(request);
        info!(%url, "Fetching RSS feed");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Received feed body");

        let items = parse_feed(&body, request.max_items)?;
        info!(count = items.len(), "Parsed feed items");
        Ok(items)
    }
}

impl Default for FeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Description,
    PubDate,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Field::Title),
            b"link" => Some(Field::Link),
            b"description" => Some(Field::Description),
            b"pubDate" => Some(Field::PubDate),
            _ => None,
        }
    }
}

/// Fields of the `<item>` currently being read.
#[derive(Default)]
struct ItemBuilder {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    pub_date: Option<String>,
}

impl ItemBuilder {
    /// Record a field's text; the first occurrence of each child wins.
    fn set(&mut self, field: Field, text: &str) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::Description => &mut self.description,
            Field::PubDate => &mut self.pub_date,
        };
        if slot.is_none() {
            *slot = Some(text.trim().to_string());
        }
    }

    fn build(self) -> NewsItem {
        NewsItem {
            title: self.title.unwrap_or_default(),
            link: self.link.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            pub_date: self.pub_date.unwrap_or_default(),
        }
    }
}

/// Parse an RSS document into at most `max_items` items, in document order.
///
/// Missing child elements yield empty strings. Text and CDATA are both read;
/// nested markup inside a field contributes its text.
///
/// The whole document is checked even past the cap: a body that is cut off or
/// badly nested is rejected rather than yielding the items read so far.
pub fn parse_feed(xml: &str, max_items: usize) -> Result<Vec<NewsItem>, FeedError> {
    let mut reader = Reader::from_str(xml);
    let mut items = Vec::new();

    let mut depth = 0usize;
    let mut item: Option<(usize, ItemBuilder)> = None;
    // (field, depth of the field element, accumulated text)
    let mut field: Option<(Field, usize, String)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                let name = e.name();
                let item_depth = item.as_ref().map(|(d, _)| *d);
                match item_depth {
                    None if name.as_ref() == b"item" => {
                        item = Some((depth, ItemBuilder::default()));
                    }
                    Some(d) if field.is_none() && depth == d + 1 => {
                        if let Some(f) = Field::from_name(name.as_ref()) {
                            field = Some((f, depth, String::new()));
                        }
                    }
                    _ => {}
                }
            }
            Event::End(_) => {
                if let Some((f, field_depth, text)) = field.take() {
                    if field_depth == depth {
                        if let Some((_, builder)) = item.as_mut() {
                            builder.set(f, &text);
                        }
                    } else {
                        field = Some((f, field_depth, text));
                    }
                }
                if matches!(item, Some((item_depth, _)) if item_depth == depth) {
                    if let Some((_, builder)) = item.take() {
                        if items.len() < max_items {
                            items.push(builder.build());
                        }
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(e) => {
                if let Some((_, _, text)) = field.as_mut() {
                    let raw = String::from_utf8_lossy(e.as_ref());
                    text.push_str(&unescape_or_raw(&raw));
                }
            }
            Event::CData(e) => {
                if let Some((_, _, text)) = field.as_mut() {
                    text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::GeneralRef(e) => {
                if let Some((_, _, text)) = field.as_mut() {
                    let reference = format!("&{};", String::from_utf8_lossy(e.as_ref()));
                    text.push_str(&unescape_or_raw(&reference));
                }
            }
            Event::Eof if depth > 0 => return Err(FeedError::Incomplete { open: depth }),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(items)
}

/// Resolve XML escapes, keeping the raw text when it holds an entity XML does
/// not predefine (HTML entities are decoded later by the normalizer).
fn unescape_or_raw(raw: &str) -> String {
    quick_xml::escape::unescape(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Language, Region};
    use crate::test_support::{SAMPLE_FEED, refused_url, serve_once, silent_url};

    #[test]
    fn test_parse_feed_extracts_fields() {
        let items = parse_feed(SAMPLE_FEED, 10).unwrap();
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].title, "Governo lança programa de IA - G1");
        assert_eq!(items[0].link, "https://www.g1.globo.com/pi/noticia/1");
        assert_eq!(items[0].pub_date, "Tue, 06 May 2025 14:30:00 GMT");
        assert!(items[0].description.starts_with("<a href=\"https://g1.globo.com/1\">"));
        assert!(items[0].description.contains("&nbsp;"));

        assert_eq!(items[1].title, "Crise & atraso no projeto");
        assert_eq!(items[1].description, "<p>Projeto sofre <b>atraso</b></p>");
        assert_eq!(items[1].pub_date, "");
    }

    #[test]
    fn test_parse_feed_missing_elements_are_empty() {
        let items = parse_feed(SAMPLE_FEED, 10).unwrap();
        let last = &items[2];
        assert_eq!(last.title, "Sem link");
        assert_eq!(last.link, "");
        assert_eq!(last.description, "");
        assert_eq!(last.pub_date, "");
    }

    #[test]
    fn test_parse_feed_ignores_channel_title() {
        let items = parse_feed(SAMPLE_FEED, 10).unwrap();
        assert!(items.iter().all(|i| !i.title.contains("Google Notícias")));
    }

    #[test]
    fn test_parse_feed_caps_items() {
        let items = parse_feed(SAMPLE_FEED, 2).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].link, "https://cidadeverde.com/2");

        assert!(parse_feed(SAMPLE_FEED, 0).unwrap().is_empty());
    }

    #[test]
    fn test_parse_feed_trims_whitespace() {
        let xml = "<rss><channel><item><title>\n   Spaced   \n</title><link> https://a.com/x </link></item></channel></rss>";
        let items = parse_feed(xml, 5).unwrap();
        assert_eq!(items[0].title, "Spaced");
        assert_eq!(items[0].link, "https://a.com/x");
    }

    #[test]
    fn test_parse_feed_malformed_xml() {
        let broken = "<rss><channel><item><title>oops</channel></rss>";
        assert!(matches!(parse_feed(broken, 10), Err(FeedError::Xml(_))));
    }

    #[test]
    fn test_parse_feed_rejects_truncated_body() {
        let cut = "<rss><channel><item><title>A</title></item><item><title>B";
        assert!(parse_feed(cut, 10).is_err());
        assert!(parse_feed(cut, 1).is_err());

        let unclosed_root = "<rss><channel><item><title>A</title></item>";
        assert!(matches!(
            parse_feed(unclosed_root, 10),
            Err(FeedError::Incomplete { open: 2 })
        ));
    }

    #[test]
    fn test_parse_feed_checks_document_past_cap() {
        let broken_tail = "<rss><channel><item><title>A</title></item><item><title>B</channel></rss>";
        assert!(parse_feed(broken_tail, 1).is_err());
        assert!(parse_feed("<rss><channel><item>", 0).is_err());
    }

    #[test]
    fn test_feed_url_encoding() {
        let req = FeedRequest::new(
            r#"("Inteligência Artificial" Piauí) -esporte site:example.com"#,
            15,
            Language::PtBr,
            Region::Brazil,
        );
        assert_eq!(
            feed_url(GOOGLE_NEWS_RSS_URL, &req),
            "https://news.google.com/rss/search?q=(\"Intelig%C3%AAncia Artificial\" Piau%C3%AD) -esporte site:example.com&hl=pt-BR&ceid=BR:pt-419"
        );
    }

    #[test]
    fn test_feed_url_escapes_separators() {
        let req = FeedRequest::new("a&b=c/d#e", 5, Language::EnUs, Region::UnitedStates);
        assert_eq!(
            feed_url("http://localhost/rss", &req),
            "http://localhost/rss?q=a%26b%3Dc%2Fd%23e&hl=en-US&ceid=US:en"
        );
    }

    fn request(max_items: usize) -> FeedRequest {
        FeedRequest::new("ia piaui", max_items, Language::PtBr, Region::Brazil)
    }

    #[tokio::test]
    async fn test_fetch_parses_served_feed() {
        let url = serve_once("200 OK", SAMPLE_FEED.to_string()).await;
        let fetcher = FeedFetcher::with_base_url(url, Duration::from_secs(5));

        let items = fetcher.fetch(&request(2)).await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Governo lança programa de IA - G1");
    }

    #[tokio::test]
    async fn test_fetch_error_status_degrades_to_empty() {
        let url = serve_once("503 Service Unavailable", "down".to_string()).await;
        let fetcher = FeedFetcher::with_base_url(url, Duration::from_secs(5));
        assert!(fetcher.fetch(&request(10)).await.is_empty());

        let url = serve_once("503 Service Unavailable", "down".to_string()).await;
        let fetcher = FeedFetcher::with_base_url(url, Duration::from_secs(5));
        assert!(matches!(
            fetcher.try_fetch(&request(10)).await,
            Err(FeedError::Status(503))
        ));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_degrades_to_empty() {
        let url = serve_once("200 OK", "<rss><item></rss>".to_string()).await;
        let fetcher = FeedFetcher::with_base_url(url, Duration::from_secs(5));
        assert!(fetcher.fetch(&request(10)).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_truncated_body_degrades_to_empty() {
        let cut = SAMPLE_FEED[..SAMPLE_FEED.find("</channel>").unwrap()].to_string();
        let url = serve_once("200 OK", cut).await;
        let fetcher = FeedFetcher::with_base_url(url, Duration::from_secs(5));
        assert!(fetcher.fetch(&request(10)).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_timeout_degrades_to_empty() {
        let fetcher = FeedFetcher::with_base_url(silent_url().await, Duration::from_millis(200));
        assert!(fetcher.fetch(&request(10)).await.is_empty());

        let fetcher = FeedFetcher::with_base_url(silent_url().await, Duration::from_millis(200));
        match fetcher.try_fetch(&request(10)).await {
            Err(FeedError::Request(e)) => assert!(e.is_timeout()),
            other => panic!("expected a timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_degrades_to_empty() {
        let fetcher = FeedFetcher::with_base_url(refused_url().await, Duration::from_secs(2));
        assert!(fetcher.fetch(&request(10)).await.is_empty());
        assert!(matches!(
            fetcher.try_fetch(&request(10)).await,
            Err(FeedError::Request(_))
        ));
    }
}

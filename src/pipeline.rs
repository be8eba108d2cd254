//! The fetch-and-classify pipeline.
//!
//! ```text
//! FeedRequest ─► FeedFetcher ─► normalize ─► dedupe ─► classify ─► Dataset
//!                     ▲                                              │
//!                     └──────────────── DatasetCache ◄───────────────┘
//! ```
//!
//! [`Pipeline::run`] never fails: a broken feed produces an empty dataset, and
//! an empty dataset is a valid result. Callers that prefer stand-in records
//! use [`Pipeline::run_or_placeholder`].

use crate::cache::DatasetCache;
use crate::dedupe::dedupe;
use crate::feed::FeedFetcher;
use crate::models::{
    ClassifiedItem, Dataset, DatasetOrigin, FeedRequest, NewsItem, NormalizedItem, Sentiment,
};
use crate::normalize::normalize_item;
use crate::sentiment::Lexicon;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// The two stand-in records shown when the feed has nothing to offer.
pub fn placeholder_items() -> Vec<NewsItem> {
    vec![
        NewsItem {
            title: "Universidade lança laboratório de IA no Piauí".to_string(),
            link: "https://exemplo.local/1".to_string(),
            description: "Projeto destaca inovação e benefício para educação e economia regional."
                .to_string(),
            pub_date: String::new(),
        },
        NewsItem {
            title: "Debate sobre impactos da IA no Piauí".to_string(),
            link: "https://exemplo.local/2".to_string(),
            description: "Desafios e oportunidades foram discutidos por especialistas.".to_string(),
            pub_date: String::new(),
        },
    ]
}

/// Normalize, deduplicate, cap and label raw items.
///
/// The cap here applies after deduplication. [`Pipeline::run`] also passes
/// `max_items` to the fetcher, which stops at that many feed items, so
/// duplicates among them still use up slots and a run can return fewer than
/// `max_items` items.
pub fn classify_items(
    items: Vec<NewsItem>,
    lexicon: &Lexicon,
    max_items: usize,
) -> Vec<ClassifiedItem> {
    let normalized: Vec<NormalizedItem> = items.into_iter().map(normalize_item).collect();
    dedupe(normalized)
        .into_iter()
        .take(max_items)
        .map(|normalized| {
            let score = lexicon.score(&normalized.clean_description);
            ClassifiedItem {
                normalized,
                score,
                sentiment: Sentiment::from_score(score),
            }
        })
        .collect()
}

/// Fetcher, lexicon and optional cache wired together.
#[derive(Debug)]
pub struct Pipeline {
    fetcher: FeedFetcher,
    lexicon: Lexicon,
    cache: Option<DatasetCache>,
}

impl Pipeline {
    pub fn new(fetcher: FeedFetcher, lexicon: Lexicon) -> Self {
        Self {
            fetcher,
            lexicon,
            cache: None,
        }
    }

    /// Memoize datasets in `cache`.
    pub fn with_cache(mut self, cache: DatasetCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn cache(&self) -> Option<&DatasetCache> {
        self.cache.as_ref()
    }

    /// Fetch and classify the items for `request`.
    ///
    /// A cached dataset for identical parameters is returned without a network
    /// call while it is fresh. Empty datasets are not cached, so a transient
    /// feed failure is retried on the next request.
    #[instrument(level = "info", skip_all, fields(query = %request.query, max_items = request.max_items))]
    pub async fn run(&mut self, request: &FeedRequest) -> Arc<Dataset> {
        if let Some(hit) = self.cache.as_mut().and_then(|c| c.get(request)) {
            info!(count = hit.len(), "Serving dataset from cache");
            return hit;
        }

        let started = Instant::now();
        let raw = self.fetcher.fetch(request).await;
        let fetched = raw.len();
        let dataset = Arc::new(Dataset::live(classify_items(
            raw,
            &self.lexicon,
            request.max_items,
        )));
        info!(
            fetched,
            kept = dataset.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Classified feed items"
        );

        if !dataset.is_empty() {
            if let Some(cache) = self.cache.as_mut() {
                cache.insert(request.clone(), Arc::clone(&dataset));
            }
        }
        dataset
    }

    /// Like [`Pipeline::run`], but substitutes `placeholder` when the live
    /// dataset is empty. Placeholder items go through the same normalization
    /// and labelling and the dataset is marked [`DatasetOrigin::Placeholder`].
    pub async fn run_or_placeholder(
        &mut self,
        request: &FeedRequest,
        placeholder: Vec<NewsItem>,
    ) -> Arc<Dataset> {
        let dataset = self.run(request).await;
        if !dataset.is_empty() {
            return dataset;
        }

        warn!("No items from the feed; using placeholder records");
        let items = classify_items(placeholder, &self.lexicon, usize::MAX);
        Arc::new(Dataset {
            origin: DatasetOrigin::Placeholder,
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Language, Region};
    use crate::test_support::{SAMPLE_FEED, refused_url, serve_once};
    use std::time::Duration;

    fn request(max_items: usize) -> FeedRequest {
        FeedRequest::new("ia piaui", max_items, Language::PtBr, Region::Brazil)
    }

    fn raw(title: &str, link: &str, description: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            link: link.to_string(),
            description: description.to_string(),
            pub_date: String::new(),
        }
    }

    #[test]
    fn test_classify_items_end_to_end() {
        let items = vec![
            raw(
                "A",
                "https://www.a.com/1",
                "<p>O <b>investimento</b> trouxe crescimento para a região</p>",
            ),
            raw("B", "https://b.com/1", "A crise gerou demissão"),
            raw("A", "https://www.a.com/1", "duplicate"),
            raw("C", "", "Reunião discutiu o tema"),
        ];
        let out = classify_items(items, &Lexicon::default(), 10);

        assert_eq!(out.len(), 3);
        assert_eq!(
            out[0].clean_description(),
            "o investimento trouxe crescimento para a regiao"
        );
        assert_eq!(out[0].score, 2);
        assert_eq!(out[0].sentiment, Sentiment::Positive);
        assert_eq!(out[0].domain(), "a.com");
        assert_eq!(out[1].sentiment, Sentiment::Negative);
        assert_eq!(out[2].sentiment, Sentiment::Neutral);
        assert_eq!(out[2].domain(), "");
    }

    #[test]
    fn test_classify_items_caps_after_dedupe() {
        let items = vec![
            raw("A", "l1", ""),
            raw("A", "l1", ""),
            raw("B", "l2", ""),
            raw("C", "l3", ""),
        ];
        let out = classify_items(items, &Lexicon::default(), 2);
        let titles: Vec<&str> = out.iter().map(|i| i.title()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_placeholder_items_classification() {
        let out = classify_items(placeholder_items(), &Lexicon::default(), usize::MAX);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].sentiment, Sentiment::Positive);
        assert_eq!(out[1].sentiment, Sentiment::Neutral);
        assert_eq!(out[0].domain(), "exemplo.local");
    }

    #[tokio::test]
    async fn test_run_classifies_feed() {
        let url = serve_once("200 OK", SAMPLE_FEED.to_string()).await;
        let mut pipeline = Pipeline::new(
            FeedFetcher::with_base_url(url, Duration::from_secs(5)),
            Lexicon::default(),
        );

        let dataset = pipeline.run(&request(10)).await;
        assert_eq!(dataset.origin, DatasetOrigin::Live);
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.items[0].domain(), "g1.globo.com");
        assert_eq!(
            dataset.items[0].clean_description(),
            "governo lanca programa g1"
        );
        assert!(dataset.items[0].published_at().is_some());
        assert_eq!(dataset.items[1].sentiment, Sentiment::Negative);
    }

    #[tokio::test]
    async fn test_run_duplicates_use_up_fetch_slots() {
        let item = "<item><title>Mesma</title><link>https://a.com/1</link></item>";
        let feed = format!(
            "<rss><channel>{item}{item}<item><title>Outra</title><link>https://a.com/2</link></item></channel></rss>"
        );
        let url = serve_once("200 OK", feed).await;
        let mut pipeline = Pipeline::new(
            FeedFetcher::with_base_url(url, Duration::from_secs(5)),
            Lexicon::default(),
        );

        let dataset = pipeline.run(&request(2)).await;
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.items[0].title(), "Mesma");
    }

    #[tokio::test]
    async fn test_run_uses_cache_for_repeated_request() {
        // The server answers once; a second network call would come back empty.
        let url = serve_once("200 OK", SAMPLE_FEED.to_string()).await;
        let mut pipeline = Pipeline::new(
            FeedFetcher::with_base_url(url, Duration::from_secs(5)),
            Lexicon::default(),
        )
        .with_cache(DatasetCache::default());

        let first = pipeline.run(&request(10)).await;
        let second = pipeline.run(&request(10)).await;
        assert_eq!(first.len(), 3);
        assert!(Arc::ptr_eq(&first, &second));

        let other = pipeline.run(&request(5)).await;
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_run_failure_is_empty_and_not_cached() {
        let mut pipeline = Pipeline::new(
            FeedFetcher::with_base_url(refused_url().await, Duration::from_secs(2)),
            Lexicon::default(),
        )
        .with_cache(DatasetCache::default());

        let dataset = pipeline.run(&request(10)).await;
        assert!(dataset.is_empty());
        assert_eq!(dataset.origin, DatasetOrigin::Live);
        assert!(pipeline.cache().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_or_placeholder_substitutes_on_failure() {
        let mut pipeline = Pipeline::new(
            FeedFetcher::with_base_url(refused_url().await, Duration::from_secs(2)),
            Lexicon::default(),
        );

        let dataset = pipeline
            .run_or_placeholder(&request(10), placeholder_items())
            .await;
        assert_eq!(dataset.origin, DatasetOrigin::Placeholder);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.items[0].title(), "Universidade lança laboratório de IA no Piauí");
    }

    #[tokio::test]
    async fn test_run_or_placeholder_keeps_live_data() {
        let url = serve_once("200 OK", SAMPLE_FEED.to_string()).await;
        let mut pipeline = Pipeline::new(
            FeedFetcher::with_base_url(url, Duration::from_secs(5)),
            Lexicon::default(),
        );

        let dataset = pipeline
            .run_or_placeholder(&request(10), placeholder_items())
            .await;
        assert_eq!(dataset.origin, DatasetOrigin::Live);
        assert_eq!(dataset.len(), 3);
    }
}

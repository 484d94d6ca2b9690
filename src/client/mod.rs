//! Incremental listing client for infinite-scroll feeds.
//!
//! [`ActualityFeed`] owns the accumulated items and the pagination state. The
//! host triggers [`ActualityFeed::begin_fetch`] whenever the scroll sentinel
//! becomes visible, performs the request with any [`PageFetcher`], and hands
//! the outcome back through [`ActualityFeed::complete_fetch`].

mod fetcher;

pub use fetcher::{FeedQuery, GraphqlPageFetcher};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Items rendered inline before the footer switches to a "show all" link.
pub const DEFAULT_INLINE_LIMIT: usize = 10;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GraphQL error: {0}")]
    GraphQL(String),

    #[error("Response had no data")]
    MissingData,
}

/// One listing card as returned by the feed queries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub href: Option<String>,
    pub is_pinned: bool,
    pub active_since: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage {
    pub items: Vec<FeedItem>,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, first: u32, after: Option<String>) -> Result<FeedPage, ClientError>;
}

/// Handed out by `begin_fetch`; identifies the request a result belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub after: Option<String>,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Footer {
    /// Keep the sentinel mounted; reaching it loads the next page.
    Sentinel,
    /// Stop scrolling inline and link to the full listing.
    ShowAll,
    /// Everything is loaded.
    End,
}

#[derive(Debug)]
pub struct ActualityFeed {
    items: Vec<FeedItem>,
    end_cursor: Option<String>,
    has_next_page: bool,
    loading: bool,
    dismissed: bool,
    generation: u64,
    inline_limit: usize,
    page_size: u32,
    last_error: Option<String>,
}

impl ActualityFeed {
    pub fn new(page_size: u32) -> Self {
        Self::with_inline_limit(page_size, DEFAULT_INLINE_LIMIT)
    }

    pub fn with_inline_limit(page_size: u32, inline_limit: usize) -> Self {
        Self {
            items: Vec::new(),
            end_cursor: None,
            has_next_page: true,
            loading: false,
            dismissed: false,
            generation: 0,
            inline_limit,
            page_size: page_size.max(1),
            last_error: None,
        }
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Starts a fetch unless one is already in flight, the feed is
    /// exhausted, or the feed was dismissed.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if self.loading || !self.has_next_page || self.dismissed {
            return None;
        }

        self.loading = true;
        Some(FetchTicket {
            after: self.end_cursor.clone(),
            generation: self.generation,
        })
    }

    /// Applies a fetch outcome. Returns false when the result was discarded.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<FeedPage, ClientError>,
    ) -> bool {
        if self.dismissed || ticket.generation != self.generation {
            tracing::debug!("Discarding stale feed page");
            return false;
        }

        self.loading = false;

        match result {
            Ok(page) => {
                self.items.extend(page.items);
                self.end_cursor = page.end_cursor.or(self.end_cursor.take());
                self.has_next_page = page.has_next_page;
                self.last_error = None;
            }
            Err(e) => {
                // Keep the cursor so the next trigger retries the same page.
                tracing::warn!("Feed page failed to load: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
        true
    }

    /// The host unmounted the feed; late results are dropped.
    pub fn dismiss(&mut self) {
        self.dismissed = true;
        self.loading = false;
        self.generation += 1;
    }

    /// Clears accumulated items and starts over from the first page.
    pub fn reset(&mut self) {
        self.items.clear();
        self.end_cursor = None;
        self.has_next_page = true;
        self.loading = false;
        self.dismissed = false;
        self.last_error = None;
        self.generation += 1;
    }

    pub fn footer(&self) -> Footer {
        if self.items.len() >= self.inline_limit {
            Footer::ShowAll
        } else if self.has_next_page {
            Footer::Sentinel
        } else {
            Footer::End
        }
    }

    /// Convenience for hosts without their own scheduling: one full
    /// begin/fetch/complete cycle. Returns false when nothing was fetched.
    pub async fn load_more<F: PageFetcher + ?Sized>(&mut self, fetcher: &F) -> bool {
        let Some(ticket) = self.begin_fetch() else {
            return false;
        };
        let result = fetcher.fetch_page(self.page_size, ticket.after.clone()).await;
        self.complete_fetch(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex;

    fn item(n: u32) -> FeedItem {
        FeedItem {
            id: format!("id-{n}"),
            title: format!("Item {n}"),
            slug: format!("item-{n}"),
            summary: None,
            href: Some(format!("/actuality/item-{n}")),
            is_pinned: false,
            active_since: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn page(range: std::ops::Range<u32>, has_next_page: bool) -> FeedPage {
        FeedPage {
            end_cursor: Some(format!("c{}", range.end)),
            items: range.map(item).collect(),
            has_next_page,
        }
    }

    /// Serves a fixed number of items in pages and records requested cursors.
    struct StaticFetcher {
        total: u32,
        calls: Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch_page(
            &self,
            first: u32,
            after: Option<String>,
        ) -> Result<FeedPage, ClientError> {
            self.calls.lock().unwrap().push(after.clone());
            let start = after
                .as_deref()
                .and_then(|c| c.trim_start_matches('c').parse::<u32>().ok())
                .unwrap_or(0);
            let end = (start + first).min(self.total);
            Ok(page(start..end, end < self.total))
        }
    }

    #[test]
    fn test_overlapping_fetches_are_suppressed() {
        let mut feed = ActualityFeed::new(2);
        let ticket = feed.begin_fetch().unwrap();
        assert!(feed.is_loading());
        assert!(feed.begin_fetch().is_none());

        assert!(feed.complete_fetch(ticket, Ok(page(0..2, true))));
        assert!(!feed.is_loading());
        assert!(feed.begin_fetch().is_some());
    }

    #[test]
    fn test_no_fetch_after_last_page() {
        let mut feed = ActualityFeed::new(2);
        let ticket = feed.begin_fetch().unwrap();
        feed.complete_fetch(ticket, Ok(page(0..1, false)));

        assert!(!feed.has_next_page());
        assert!(feed.begin_fetch().is_none());
        assert_eq!(feed.footer(), Footer::End);
    }

    #[test]
    fn test_cursor_feeds_next_request() {
        let mut feed = ActualityFeed::new(2);
        let first = feed.begin_fetch().unwrap();
        assert_eq!(first.after, None);
        feed.complete_fetch(first, Ok(page(0..2, true)));

        let second = feed.begin_fetch().unwrap();
        assert_eq!(second.after.as_deref(), Some("c2"));
    }

    #[test]
    fn test_results_after_dismiss_are_discarded() {
        let mut feed = ActualityFeed::new(2);
        let ticket = feed.begin_fetch().unwrap();
        feed.dismiss();

        assert!(!feed.complete_fetch(ticket, Ok(page(0..2, true))));
        assert!(feed.items().is_empty());
        assert!(feed.begin_fetch().is_none());
    }

    #[test]
    fn test_stale_ticket_after_reset_is_discarded() {
        let mut feed = ActualityFeed::new(2);
        let stale = feed.begin_fetch().unwrap();
        feed.reset();

        assert!(!feed.complete_fetch(stale, Ok(page(0..2, true))));
        assert!(feed.items().is_empty());
        assert!(feed.begin_fetch().is_some());
    }

    #[test]
    fn test_failed_fetch_keeps_cursor() {
        let mut feed = ActualityFeed::new(2);
        let ticket = feed.begin_fetch().unwrap();
        feed.complete_fetch(ticket, Ok(page(0..2, true)));

        let ticket = feed.begin_fetch().unwrap();
        feed.complete_fetch(ticket, Err(ClientError::MissingData));
        assert_eq!(feed.last_error(), Some("Response had no data"));

        let retry = feed.begin_fetch().unwrap();
        assert_eq!(retry.after.as_deref(), Some("c2"));
    }

    #[tokio::test]
    async fn test_footer_switches_to_show_all() {
        let fetcher = StaticFetcher {
            total: 25,
            calls: Mutex::new(Vec::new()),
        };
        let mut feed = ActualityFeed::new(4);

        assert_eq!(feed.footer(), Footer::Sentinel);
        while feed.footer() == Footer::Sentinel {
            assert!(feed.load_more(&fetcher).await);
        }

        assert_eq!(feed.footer(), Footer::ShowAll);
        assert_eq!(feed.items().len(), 12);
        assert!(feed.has_next_page());
    }

    #[tokio::test]
    async fn test_load_more_accumulates_until_exhausted() {
        let fetcher = StaticFetcher {
            total: 5,
            calls: Mutex::new(Vec::new()),
        };
        let mut feed = ActualityFeed::with_inline_limit(2, 100);

        while feed.load_more(&fetcher).await {}

        let slugs: Vec<_> = feed.items().iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, ["item-0", "item-1", "item-2", "item-3", "item-4"]);
        assert_eq!(
            *fetcher.calls.lock().unwrap(),
            vec![None, Some("c2".to_string()), Some("c4".to_string())]
        );
    }
}

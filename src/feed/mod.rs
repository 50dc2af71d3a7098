//! News feed retrieval
//!
//! Fetches an RSS or Atom document and hands back its first entry as an
//! [`Article`]. Only the newest entry matters; the rest are ignored.

use async_trait::async_trait;
use feed_rs::model::Entry;
use reqwest::Client;

use crate::config::FeedConfig;
use crate::models::Article;
use crate::utils::normalize_whitespace;
use crate::utils::error::FeedError;

/// Source of the article for this run
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Newest article, `None` when the feed has no entries
    async fn latest_article(&self) -> Result<Option<Article>, FeedError>;
}

/// HTTP feed client
pub struct FeedClient {
    client: Client,
    url: String,
}

impl FeedClient {
    /// Create from the `[feed]` config section
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// Feed URL
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<feed_rs::model::Feed, FeedError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let bytes = response.bytes().await?;
        parse_feed(&bytes)
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn latest_article(&self) -> Result<Option<Article>, FeedError> {
        let feed = self.fetch().await?;
        tracing::debug!(url = %self.url, entries = feed.entries.len(), "Feed fetched");

        feed.entries.into_iter().next().map(entry_to_article).transpose()
    }
}

/// Parse an RSS/Atom document
pub fn parse_feed(bytes: &[u8]) -> Result<feed_rs::model::Feed, FeedError> {
    feed_rs::parser::parse(bytes).map_err(|e| FeedError::Parse(e.to_string()))
}

/// Convert a feed entry, requiring a title
///
/// RSS `<description>` lands in `summary`; Atom feeds sometimes only carry
/// `<content>`, which is used when no summary is present.
pub fn entry_to_article(entry: Entry) -> Result<Article, FeedError> {
    let title = entry
        .title
        .map(|t| normalize_whitespace(&t.content))
        .unwrap_or_default();

    let summary = entry
        .summary
        .map(|t| t.content)
        .or_else(|| entry.content.and_then(|c| c.body));

    let link = entry
        .links
        .into_iter()
        .next()
        .map(|l| l.href)
        .unwrap_or_default();

    let article = Article::new(title, summary, link)?;

    Ok(match entry.published.or(entry.updated) {
        Some(published) => article.with_published_at(published),
        None => article,
    })
}

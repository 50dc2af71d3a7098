// Core data structures for the pawpost pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::error::FeedError;

/// One feed entry, validated at the feed boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    /// Empty when the entry carries no summary
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub source_link: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Build an article, rejecting entries whose title is blank
    pub fn new(
        title: impl Into<String>,
        summary: Option<String>,
        source_link: impl Into<String>,
    ) -> Result<Self, FeedError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(FeedError::MissingTitle);
        }

        Ok(Self {
            title,
            summary: summary.unwrap_or_default(),
            source_link: source_link.into(),
            published_at: None,
        })
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }
}

/// Category label and HTML body extracted from a model response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub category: String,
    pub html_body: String,
    /// True when the body was synthesized because the response was unusable
    #[serde(default)]
    pub is_fallback: bool,
}

/// Outgoing mail for the blog-by-email address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub subject: String,
    pub html: String,
}

impl BlogPost {
    /// Compose the post: `"{title} #{category}"` as subject so the blog picks
    /// the category up as a label, image block ahead of the body.
    pub fn compose(article: &Article, image_block: &str, content: &GeneratedContent) -> Self {
        Self {
            subject: format!("{} #{}", article.title, content.category),
            html: format!("{image_block}{}", content.html_body),
        }
    }
}

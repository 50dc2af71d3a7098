//! Affiliate link resolution
//!
//! Maps article text to one promotional destination using an ordered keyword
//! table. Matching is plain case-insensitive substring search, and the first
//! keyword in table order wins, so `pet` listed before `puppy` also claims
//! every puppy article. Keep specific keywords ahead of broad ones.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the fallback entry; never matched as a keyword
pub const FALLBACK_KEY: &str = "default";

/// One keyword → URL row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordLink {
    pub keyword: String,
    pub url: String,
}

impl KeywordLink {
    pub fn new(keyword: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            url: url.into(),
        }
    }
}

/// Ordered affiliate link table with a designated fallback
///
/// The serialized form is what appears under `[links]` in the config file:
///
/// ```toml
/// [links]
/// default = "https://s.shopee.tw/1qUmD7Hdfp"
///
/// [[links.keywords]]
/// keyword = "cat"
/// url = "https://s.shopee.tw/1LYVcCJXgk"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawAffiliateLinks")]
pub struct AffiliateLinks {
    /// Fallback URL used when no keyword matches
    #[serde(rename = "default")]
    fallback: String,

    /// Keywords scanned in this order
    #[serde(default)]
    keywords: Vec<KeywordLink>,
}

impl AffiliateLinks {
    /// Create a table; keywords are lowercased so matching stays
    /// case-insensitive on both sides.
    pub fn new(fallback: impl Into<String>, keywords: Vec<KeywordLink>) -> Self {
        let keywords = keywords
            .into_iter()
            .map(|link| KeywordLink {
                keyword: link.keyword.trim().to_lowercase(),
                url: link.url,
            })
            .collect();

        Self {
            fallback: fallback.into(),
            keywords,
        }
    }

    /// Fallback URL
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Keyword rows in scan order
    pub fn keywords(&self) -> &[KeywordLink] {
        &self.keywords
    }

    /// Every URL the resolver can return
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.fallback.as_str()).chain(self.keywords.iter().map(|l| l.url.as_str()))
    }

    /// Reject tables that would resolve to nothing or match everything
    pub fn validate(&self) -> Result<()> {
        if self.fallback.trim().is_empty() {
            return Err(Error::config("links.default must not be empty"));
        }

        for (index, link) in self.keywords.iter().enumerate() {
            if link.keyword.trim().is_empty() {
                return Err(Error::config(format!(
                    "links.keywords[{index}] has an empty keyword"
                )));
            }
            if link.url.trim().is_empty() {
                return Err(Error::config(format!(
                    "links.keywords[{index}] ({}) has an empty url",
                    link.keyword
                )));
            }
        }

        Ok(())
    }

    /// Pick the affiliate URL for an article
    ///
    /// Scans `title + " " + content` lowercased; first keyword found as a
    /// substring wins, otherwise the fallback is returned.
    pub fn resolve(&self, title: &str, content: &str) -> &str {
        let text = format!("{title} {content}").to_lowercase();

        self.keywords
            .iter()
            .filter(|link| link.keyword != FALLBACK_KEY && !link.keyword.is_empty())
            .find(|link| text.contains(link.keyword.as_str()))
            .map(|link| link.url.as_str())
            .unwrap_or(self.fallback.as_str())
    }
}

/// Table as written in the config file, before keyword normalization
#[derive(Deserialize)]
struct RawAffiliateLinks {
    default: String,
    #[serde(default)]
    keywords: Vec<KeywordLink>,
}

impl From<RawAffiliateLinks> for AffiliateLinks {
    fn from(raw: RawAffiliateLinks) -> Self {
        Self::new(raw.default, raw.keywords)
    }
}

impl Default for AffiliateLinks {
    fn default() -> Self {
        Self::new(
            "https://s.shopee.tw/1qUmD7Hdfp",
            vec![
                KeywordLink::new("cat", "https://s.shopee.tw/1LYVcCJXgk"),
                KeywordLink::new("dog", "https://s.shopee.tw/1VrvoVIuLn"),
                KeywordLink::new("food", "https://s.shopee.tw/10vfDaKoMi"),
                KeywordLink::new("toy", "https://s.shopee.tw/1BF5PtKB1l"),
            ],
        )
    }
}

//! One pass from feed entry to published post
//!
//! ```text
//! feed ──▶ link resolver ──▶ prompt builder ──▶ model ──▶ response parser ──▶ mail
//!              │                                                         ▲
//!              └──────────────▶ image block ─────────────────────────────┘
//! ```
//!
//! Each collaborator is called once, in order, with no retries. Failures end
//! the run and come back as a [`RunOutcome`]; nothing here is fatal to the
//! process.

use std::fmt;

use crate::config::Config;
use crate::error::Result;
use crate::feed::{FeedClient, FeedSource};
use crate::image::{ImageService, PromptImageService};
use crate::links::AffiliateLinks;
use crate::llm::{parse_response, LlmClient, TextGenerator};
use crate::mail::{DeliveryStatus, Publisher, SmtpPublisher};
use crate::models::{Article, BlogPost};
use crate::prompt::PromptBuilder;

/// How a run ended
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Post delivered
    Published {
        post: BlogPost,
        used_fallback: bool,
        status: DeliveryStatus,
    },
    /// Post composed but not sent (dry run)
    Previewed { post: BlogPost, used_fallback: bool },
    /// Feed answered with no entries
    NoEntries,
    /// Feed could not be fetched or its first entry was unusable
    FeedUnavailable { reason: String },
    /// Model call failed; the article is skipped this run
    Dropped { title: String, reason: String },
    /// Post composed but the mail transport refused it
    DeliveryFailed { post: BlogPost, reason: String },
}

impl RunOutcome {
    /// Post produced by this run, if it got that far
    pub fn post(&self) -> Option<&BlogPost> {
        match self {
            Self::Published { post, .. }
            | Self::Previewed { post, .. }
            | Self::DeliveryFailed { post, .. } => Some(post),
            _ => None,
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Published { post, status, .. } => write!(f, "published \"{}\" {status}", post.subject),
            Self::Previewed { post, .. } => write!(f, "previewed \"{}\"", post.subject),
            Self::NoEntries => write!(f, "feed has no entries"),
            Self::FeedUnavailable { reason } => write!(f, "feed unavailable: {reason}"),
            Self::Dropped { title, reason } => write!(f, "dropped \"{title}\": {reason}"),
            Self::DeliveryFailed { post, reason } => {
                write!(f, "delivery of \"{}\" failed: {reason}", post.subject)
            }
        }
    }
}

/// The pipeline and its collaborators
pub struct Pipeline {
    feed: Box<dyn FeedSource>,
    generator: Box<dyn TextGenerator>,
    images: Box<dyn ImageService>,
    publisher: Option<Box<dyn Publisher>>,
    links: AffiliateLinks,
    prompts: PromptBuilder,
}

impl Pipeline {
    /// Create a pipeline that composes posts without sending them
    pub fn new(
        feed: Box<dyn FeedSource>,
        generator: Box<dyn TextGenerator>,
        images: Box<dyn ImageService>,
        links: AffiliateLinks,
        prompts: PromptBuilder,
    ) -> Self {
        Self {
            feed,
            generator,
            images,
            publisher: None,
            links,
            prompts,
        }
    }

    /// Send composed posts through this publisher
    pub fn with_publisher(mut self, publisher: Box<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Wire up the real collaborators from configuration
    ///
    /// With `dry_run` no mail settings are needed and nothing is sent.
    pub fn from_config(config: &Config, dry_run: bool) -> Result<Self> {
        if dry_run {
            config.validate()?;
        } else {
            config.validate_for_delivery()?;
        }

        let pipeline = Self::new(
            Box::new(FeedClient::new(&config.feed)?),
            Box::new(LlmClient::with_config(config.llm.clone())?),
            Box::new(PromptImageService::new(&config.image)?),
            config.links.clone(),
            PromptBuilder::from_config(&config.prompt)?,
        );

        if dry_run {
            Ok(pipeline)
        } else {
            Ok(pipeline.with_publisher(Box::new(SmtpPublisher::new(&config.mail)?)))
        }
    }

    /// Model used for generation
    pub fn generator(&self) -> &dyn TextGenerator {
        self.generator.as_ref()
    }

    /// Run one pass
    pub async fn run_once(&self) -> RunOutcome {
        let article = match self.feed.latest_article().await {
            Ok(Some(article)) => article,
            Ok(None) => {
                tracing::warn!("📭 Feed returned no entries");
                return RunOutcome::NoEntries;
            }
            Err(e) => {
                tracing::error!(error = %e, "❌ Failed to read feed");
                return RunOutcome::FeedUnavailable {
                    reason: e.to_string(),
                };
            }
        };

        tracing::info!("📄 {}", article.title);
        self.process(&article).await
    }

    /// Turn one article into a post and deliver it
    pub async fn process(&self, article: &Article) -> RunOutcome {
        let link = self.links.resolve(&article.title, &article.summary);
        tracing::debug!(link = link, "Affiliate link resolved");

        let image_block = self
            .images
            .image_block(&self.prompts.build_image_prompt(&article.title));

        let prompt = match self.prompts.build_prompt(&article.title, &article.summary, link) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::error!(error = %e, "❌ Failed to build prompt");
                return RunOutcome::Dropped {
                    title: article.title.clone(),
                    reason: e.to_string(),
                };
            }
        };

        let raw = match self.generator.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(model = self.generator.name(), error = %e, "❌ Generation failed, skipping article");
                return RunOutcome::Dropped {
                    title: article.title.clone(),
                    reason: e.to_string(),
                };
            }
        };

        let content = parse_response(&raw, &article.summary, link);
        tracing::info!(
            category = %content.category,
            fallback = content.is_fallback,
            "✍️ Post generated"
        );

        let post = BlogPost::compose(article, &image_block, &content);
        let used_fallback = content.is_fallback;

        let Some(publisher) = &self.publisher else {
            return RunOutcome::Previewed {
                post,
                used_fallback,
            };
        };

        match publisher.send(&post.subject, &post.html).await {
            Ok(status) => {
                tracing::info!("✅ 發送成功 {status}");
                RunOutcome::Published {
                    post,
                    used_fallback,
                    status,
                }
            }
            Err(e) => {
                tracing::error!(channel = publisher.name(), error = %e, "❌ Delivery failed");
                RunOutcome::DeliveryFailed {
                    post,
                    reason: e.to_string(),
                }
            }
        }
    }
}

//! Illustration references for generated posts
//!
//! The image service renders on request: the prompt goes into the URL path
//! and the image is produced when the mail client loads it. Nothing is
//! fetched here.

use chrono::Utc;
use url::Url;

use crate::config::ImageConfig;
use crate::error::{Error, Result};

/// Turns an image prompt into a URL and an HTML block
pub trait ImageService: Send + Sync {
    /// Image URL for a prompt
    fn image_url(&self, prompt: &str) -> String;

    /// Centered `<img>` block placed above the article body
    fn image_block(&self, prompt: &str) -> String {
        let url = self.image_url(prompt);
        format!(
            r#"<div style="text-align:center; margin-bottom:20px;"><img src="{}" style="width:100%; max-width:800px; border-radius:12px;"></div>"#,
            html_escape::encode_double_quoted_attribute(&url)
        )
    }
}

/// Pollinations-style prompt URL builder
#[derive(Debug, Clone)]
pub struct PromptImageService {
    base_url: Url,
    width: u32,
    height: u32,
    model: String,
    no_logo: bool,
    /// Fixed seed; `None` uses the current unix time so each run differs
    seed: Option<i64>,
}

impl PromptImageService {
    /// Create from the `[image]` config section
    pub fn new(config: &ImageConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::config(format!("Invalid image.base_url {}: {e}", config.base_url)))?;

        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "image.base_url cannot take a path: {}",
                config.base_url
            )));
        }

        Ok(Self {
            base_url,
            width: config.width,
            height: config.height,
            model: config.model.clone(),
            no_logo: config.no_logo,
            seed: config.seed,
        })
    }

    /// Pin the seed, mostly for reproducible output
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl ImageService for PromptImageService {
    fn image_url(&self, prompt: &str) -> String {
        let mut url = self.base_url.clone();

        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(prompt);
        }

        let seed = self.seed.unwrap_or_else(|| Utc::now().timestamp());
        url.query_pairs_mut()
            .append_pair("width", &self.width.to_string())
            .append_pair("height", &self.height.to_string())
            .append_pair("nologo", if self.no_logo { "true" } else { "false" })
            .append_pair("seed", &seed.to_string())
            .append_pair("model", &self.model);

        url.to_string()
    }
}

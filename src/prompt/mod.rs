//! Prompt construction for the language model and the image service
//!
//! The article prompt is a Handlebars template with three variables:
//! `title`, `summary` and `link`. The built-in template asks for a
//! Traditional Chinese pet-owner diary post and a JSON object with exactly
//! the keys `category` and `html_body`. A deployment can swap the wording by
//! pointing `prompt.template_path` at its own template.

use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

use crate::config::PromptConfig;
use crate::utils::error::PromptError;

/// Default article prompt template
const DEFAULT_TEMPLATE: &str = include_str!("../../templates/article_prompt.hbs");

const TEMPLATE_NAME: &str = "article_prompt";

/// Style words appended to the article title for the image prompt
pub const DEFAULT_IMAGE_STYLE: &str = "cute fluffy animals, close up, warm lighting, 8k";

/// Template data for rendering
#[derive(Debug, Serialize)]
struct PromptData<'a> {
    title: &'a str,
    summary: &'a str,
    link: &'a str,
}

/// Builds the text sent to the language model and the image service
pub struct PromptBuilder {
    handlebars: Handlebars<'static>,
    image_style: String,
}

impl PromptBuilder {
    /// Create a builder with the built-in template
    pub fn new() -> Result<Self, PromptError> {
        Self::from_source(DEFAULT_TEMPLATE)
    }

    /// Create a builder from template text
    pub fn from_source(template: &str) -> Result<Self, PromptError> {
        let mut handlebars = Self::engine();
        handlebars.register_template_string(TEMPLATE_NAME, template)?;
        Self::checked(handlebars)
    }

    /// Create a builder from a template file on disk
    pub fn with_template(template_path: &Path) -> Result<Self, PromptError> {
        let mut handlebars = Self::engine();
        handlebars
            .register_template_file(TEMPLATE_NAME, template_path)
            .map_err(|e| {
                PromptError::Template(format!("{}: {e}", template_path.display()))
            })?;
        Self::checked(handlebars)
    }

    /// Create a builder from the `[prompt]` config section
    pub fn from_config(config: &PromptConfig) -> Result<Self, PromptError> {
        let builder = match &config.template_path {
            Some(path) => Self::with_template(path)?,
            None => Self::new()?,
        };
        Ok(builder.with_image_style(config.image_style.clone()))
    }

    /// Override the image style words
    pub fn with_image_style(mut self, style: impl Into<String>) -> Self {
        self.image_style = style.into();
        self
    }

    /// Render the article prompt
    ///
    /// Inputs are interpolated as-is; feed markup is not sanitized since the
    /// result only ever lands in an email body.
    pub fn build_prompt(&self, title: &str, summary: &str, link: &str) -> Result<String, PromptError> {
        let data = PromptData {
            title,
            summary,
            link,
        };
        Ok(self.handlebars.render(TEMPLATE_NAME, &data)?)
    }

    /// Image prompt: the title followed by the style words
    pub fn build_image_prompt(&self, title: &str) -> String {
        if self.image_style.is_empty() {
            title.to_string()
        } else {
            format!("{title}, {}", self.image_style)
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut handlebars = Handlebars::new();
        // Output is a prompt, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);
        handlebars
    }

    /// Strict mode only fires at render time, so render once with sample
    /// values to reject templates that name unknown variables up front.
    fn checked(handlebars: Handlebars<'static>) -> Result<Self, PromptError> {
        let sample = PromptData {
            title: "title",
            summary: "summary",
            link: "https://example.com",
        };
        handlebars
            .render(TEMPLATE_NAME, &sample)
            .map_err(|e| PromptError::Template(e.to_string()))?;

        Ok(Self {
            handlebars,
            image_style: DEFAULT_IMAGE_STYLE.to_string(),
        })
    }
}

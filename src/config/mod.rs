//! Configuration management for pawpost
//!
//! Settings come from an optional TOML file, then environment variables
//! override individual values. Secrets (API key, SMTP password) are normally
//! supplied only through the environment and are redacted from `Debug`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::links::AffiliateLinks;
use crate::prompt::DEFAULT_IMAGE_STYLE;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feed source
    pub feed: FeedConfig,

    /// Language model
    pub llm: LlmConfig,

    /// Image reference builder
    pub image: ImageConfig,

    /// Outgoing mail
    pub mail: MailConfig,

    /// Affiliate link table
    pub links: AffiliateLinks,

    /// Prompt template
    pub prompt: PromptConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Feed source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// RSS or Atom URL
    pub url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// User agent string
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: String::from(
                "https://news.google.com/rss/search?q=pet+care+cute+animals&hl=en-US&gl=US&ceid=US:en",
            ),
            timeout_secs: 30,
            user_agent: format!("pawpost/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FeedConfig {
    /// Request timeout as Duration
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Which text-generation API to call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini `generateContent`
    Gemini,
    /// Local Ollama `/api/generate`
    Ollama,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
        }
    }

    /// Default endpoint for this provider
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com",
            Self::Ollama => "http://localhost:11434",
        }
    }

    /// Default model for this provider
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-1.5-flash",
            Self::Ollama => "qwen2.5:7b",
        }
    }
}

impl std::str::FromStr for LlmProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(Error::config(format!("Unknown LLM provider: {other}"))),
        }
    }
}

/// Configuration for the LLM client
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API flavour
    pub provider: LlmProvider,

    /// Endpoint base URL; provider default when unset
    pub endpoint: Option<String>,

    /// Model name; provider default when unset
    pub model: Option<String>,

    /// API key (Gemini only)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature for generation (0.0 - 2.0)
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Gemini,
            endpoint: None,
            model: None,
            api_key: None,
            timeout_secs: 120,
            max_tokens: 4096,
            temperature: 0.9,
        }
    }
}

impl LlmConfig {
    /// Endpoint in effect
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.provider.default_endpoint())
            .trim_end_matches('/')
    }

    /// Model in effect
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint())
            .field("model", &self.model())
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Image reference configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Base URL; the prompt is appended as the last path segment
    pub base_url: String,

    pub width: u32,

    pub height: u32,

    /// Image model name passed to the service
    pub model: String,

    /// Ask the service to omit its watermark
    pub no_logo: bool,

    /// Fixed seed; unset uses the current unix time
    pub seed: Option<i64>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://image.pollinations.ai/prompt"),
            width: 1024,
            height: 600,
            model: String::from("flux"),
            no_logo: true,
            seed: None,
        }
    }
}

/// Outgoing mail configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// SMTP relay host
    pub smtp_host: String,

    /// SMTP port; 465 uses implicit TLS, anything else STARTTLS
    pub smtp_port: u16,

    /// SMTP login, also the sender when `from` is unset
    pub username: Option<String>,

    /// SMTP password (app password for Gmail)
    #[serde(skip_serializing)]
    pub password: Option<String>,

    /// Sender address override
    pub from: Option<String>,

    /// Blog-by-email address
    pub to: Option<String>,

    /// SMTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::from("smtp.gmail.com"),
            smtp_port: 465,
            username: None,
            password: None,
            from: None,
            to: None,
            timeout_secs: 30,
        }
    }
}

impl MailConfig {
    /// Sender address: explicit `from`, otherwise the SMTP login
    pub fn sender(&self) -> Option<&str> {
        self.from.as_deref().or(self.username.as_deref())
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &self.password.as_deref().map(|_| "<redacted>"))
            .field("from", &self.from)
            .field("to", &self.to)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Prompt template configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Custom Handlebars template for the article prompt
    pub template_path: Option<PathBuf>,

    /// Style words appended to the title for the image prompt
    pub image_style: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template_path: None,
            image_style: DEFAULT_IMAGE_STYLE.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration: file if given, defaults otherwise, then env overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::with_source(format!("Failed to read config file: {}", path.display()), e)
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse TOML config file {}: {e}",
                path.display()
            ))
        })?;

        Ok(config)
    }

    /// Override values from environment variables
    ///
    /// Credentials keep the names the deployment already exports:
    /// `GOOGLE_API_KEY`, `GMAIL_USER`, `GMAIL_APP_PASSWORD`, `BLOGGER_EMAIL`.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(url) = env_var("PAWPOST_FEED_URL") {
            self.feed.url = url;
        }

        if let Some(provider) = env_var("PAWPOST_LLM_PROVIDER") {
            self.llm.provider = provider.parse()?;
        }
        if let Some(endpoint) = env_var("PAWPOST_LLM_ENDPOINT") {
            self.llm.endpoint = Some(endpoint);
        }
        if let Some(model) = env_var("PAWPOST_LLM_MODEL") {
            self.llm.model = Some(model);
        }
        if let Some(key) = env_var("GOOGLE_API_KEY") {
            self.llm.api_key = Some(key);
        }

        if let Some(user) = env_var("GMAIL_USER") {
            self.mail.username = Some(user);
        }
        if let Some(password) = env_var("GMAIL_APP_PASSWORD") {
            self.mail.password = Some(password);
        }
        if let Some(to) = env_var("BLOGGER_EMAIL") {
            self.mail.to = Some(to);
        }

        if let Some(level) = env_var("PAWPOST_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = env_var("PAWPOST_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Validate everything a run needs before any mail is involved
    pub fn validate(&self) -> Result<()> {
        if self.feed.url.trim().is_empty() {
            return Err(Error::config("feed.url must not be empty"));
        }

        if self.feed.timeout_secs == 0 || self.llm.timeout_secs == 0 {
            return Err(Error::config("timeouts must be greater than 0"));
        }

        if self.llm.model().trim().is_empty() {
            return Err(Error::config("llm.model must not be empty"));
        }

        if self.llm.provider == LlmProvider::Gemini
            && self.llm.api_key.as_deref().map_or(true, |k| k.trim().is_empty())
        {
            return Err(Error::config("GOOGLE_API_KEY is not set"));
        }

        if self.image.width == 0 || self.image.height == 0 {
            return Err(Error::config("image width and height must be greater than 0"));
        }

        self.links.validate()?;

        Ok(())
    }

    /// Validate the mail settings on top of [`Config::validate`]
    pub fn validate_for_delivery(&self) -> Result<()> {
        self.validate()?;

        if is_blank(&self.mail.username) {
            return Err(Error::config("GMAIL_USER is not set"));
        }
        if is_blank(&self.mail.password) {
            return Err(Error::config("GMAIL_APP_PASSWORD is not set"));
        }
        if is_blank(&self.mail.to) {
            return Err(Error::config("BLOGGER_EMAIL is not set"));
        }
        if self.mail.timeout_secs == 0 {
            return Err(Error::config("mail.timeout_secs must be greater than 0"));
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

//! Unified error handling for the pawpost crate
//!
//! Domain-specific errors live in [`crate::utils::error`]; this module wraps
//! them into a single `Error` enum so callers can decide per category whether
//! to abort the run or report and move on.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pawpost::error::{Error, ErrorCategory};
//!
//! fn handle_error(err: Error) {
//!     if err.is_fatal() {
//!         eprintln!("Fatal error: {err}");
//!     } else {
//!         tracing::warn!(category = %err.category(), "{err}");
//!     }
//! }
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

pub use crate::utils::error::{FeedError, LlmError, MailError, PromptError};

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Feed retrieval and parsing
    Feed,
    /// Language model calls
    Llm,
    /// Mail delivery
    Mail,
    /// Prompt templates
    Prompt,
    /// Configuration and validation errors
    Config,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Llm => "llm",
            Self::Mail => "mail",
            Self::Prompt => "prompt",
            Self::Config => "config",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the pawpost crate
#[derive(Error, Debug)]
pub enum Error {
    /// Feed errors
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    /// Language model errors
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Mail delivery errors
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Feed(_) => ErrorCategory::Feed,
            Self::Llm(LlmError::MissingApiKey(_)) => ErrorCategory::Config,
            Self::Llm(_) => ErrorCategory::Llm,
            Self::Mail(MailError::Address { .. }) => ErrorCategory::Config,
            Self::Mail(_) => ErrorCategory::Mail,
            Self::Prompt(PromptError::Template(_)) => ErrorCategory::Config,
            Self::Prompt(_) => ErrorCategory::Prompt,
            Self::Toml(_) | Self::Config(_) => ErrorCategory::Config,
            Self::Io(_) | Self::Json(_) | Self::Other { .. } => ErrorCategory::Other,
        }
    }

    /// Whether the run must stop with a nonzero exit code.
    ///
    /// Only configuration problems are fatal; everything else ends the
    /// current run gracefully.
    pub fn is_fatal(&self) -> bool {
        self.category() == ErrorCategory::Config
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

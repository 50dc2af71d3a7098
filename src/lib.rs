//! pawpost - pet news to promotional blog post, one entry per run
//!
//! Takes the newest entry of a pet news feed, picks an affiliate link by
//! keyword, asks a language model to rewrite the story as a pet-owner blog
//! post, tops it with a generated illustration and mails the result to a
//! blog-by-email address.
//!
//! # Architecture
//!
//! - [`config`] - Configuration management and settings
//! - [`links`] - Keyword-based affiliate link resolution
//! - [`prompt`] - Prompt templates for the model and the image service
//! - [`llm`] - Model client and response parsing
//! - [`feed`] - RSS/Atom retrieval
//! - [`image`] - Image reference URLs
//! - [`mail`] - SMTP delivery
//! - [`pipeline`] - The single-pass driver
//! - [`models`] - Core data structures and types
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use pawpost::config::Config;
//! use pawpost::pipeline::Pipeline;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let pipeline = Pipeline::from_config(&config, false)?;
//!     let outcome = pipeline.run_once().await;
//!     println!("{outcome}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod image;
pub mod links;
pub mod llm;
pub mod mail;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::links::AffiliateLinks;
    pub use crate::llm::{parse_response, TextGenerator};
    pub use crate::models::{Article, BlogPost, GeneratedContent};
    pub use crate::pipeline::{Pipeline, RunOutcome};
    pub use crate::prompt::PromptBuilder;
}

// Direct re-exports for convenience
pub use models::{Article, BlogPost, GeneratedContent};

//! Error types for the pawpost pipeline
//!
//! This module defines the per-collaborator error types. The unified
//! [`crate::error::Error`] wraps all of them.

use thiserror::Error;

/// Errors that can occur while fetching or reading the news feed
#[derive(Error, Debug)]
pub enum FeedError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed server answered with a non-success status
    #[error("Feed server returned status {0}")]
    Status(u16),

    /// Body could not be parsed as RSS or Atom
    #[error("Failed to parse feed: {0}")]
    Parse(String),

    /// Entry without a usable title
    #[error("Feed entry has no title")]
    MissingTitle,
}

/// Errors that can occur while talking to the language model
#[derive(Error, Debug)]
pub enum LlmError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Model endpoint answered with a non-success status
    #[error("Model request failed: {status} - {body}")]
    Status { status: u16, body: String },

    /// Response decoded but carried no text
    #[error("Model returned an empty response")]
    EmptyResponse,

    /// Provider requires an API key that was not configured
    #[error("API key is required for {0}")]
    MissingApiKey(String),
}

/// Errors that can occur while delivering mail
#[derive(Error, Debug)]
pub enum MailError {
    /// Sender or recipient could not be parsed as a mailbox
    #[error("Invalid address {address}: {reason}")]
    Address { address: String, reason: String },

    /// Message could not be assembled
    #[error("Failed to build message: {0}")]
    Build(String),

    /// SMTP transport failure
    #[error("SMTP transport failed: {0}")]
    Transport(String),
}

/// Errors that can occur while building prompts
#[derive(Error, Debug)]
pub enum PromptError {
    /// Template failed to compile
    #[error("Invalid prompt template: {0}")]
    Template(String),

    /// Template failed to render
    #[error("Failed to render prompt: {0}")]
    Render(String),
}

impl From<handlebars::TemplateError> for PromptError {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::Template(err.to_string())
    }
}

impl From<handlebars::RenderError> for PromptError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Render(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        Self::Build(err.to_string())
    }
}

use anyhow::{Context, Result};
use std::path::Path;
use tokio::io::AsyncReadExt;

use pawpost::config::Config;
use pawpost::llm::parse_response;
use pawpost::prompt::PromptBuilder;

/// Print the affiliate URL an article would get
pub fn resolve(config: &Config, title: &str, content: &str) -> Result<()> {
    config.links.validate()?;

    println!("{}", config.links.resolve(title, content));
    Ok(())
}

/// Print the model prompt for an article
pub fn prompt(config: &Config, title: &str, summary: &str) -> Result<()> {
    config.links.validate()?;

    let builder = PromptBuilder::from_config(&config.prompt).context("Failed to load prompt template")?;
    let link = config.links.resolve(title, summary);

    println!("{}", builder.build_prompt(title, summary, link)?);
    println!();
    println!("Image prompt: {}", builder.build_image_prompt(title));
    Ok(())
}

/// Parse a saved model response and print the result as JSON
pub async fn parse(
    config: &Config,
    input: Option<&Path>,
    summary: &str,
    link: Option<&str>,
) -> Result<()> {
    let raw = match input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("Failed to read stdin")?;
            raw
        }
    };

    let link = link.unwrap_or_else(|| config.links.fallback());
    let content = parse_response(&raw, summary, link);

    println!("{}", serde_json::to_string_pretty(&content)?);
    Ok(())
}

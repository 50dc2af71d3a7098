//! Model response parsing
//!
//! The model is asked for a JSON object but free-form text comes back: code
//! fences, a sentence of preamble, sometimes no JSON at all. The response is
//! treated as a hint. Parsing always yields usable content, falling back to a
//! body built from the feed summary.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

use crate::models::GeneratedContent;

/// Category used when the model omits one
pub const DEFAULT_CATEGORY: &str = "寵物日記";

/// Category used when the response could not be used at all
pub const FALLBACK_CATEGORY: &str = "寵物快訊";

// ```json, ```JSON, ``` and friends
static FENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)```[ \t]*(?:json)?").unwrap());

/// Shape requested from the model
#[derive(Debug, Deserialize)]
struct ModelPost {
    /// Models sometimes answer with a number or a list here
    #[serde(default)]
    category: Value,
    html_body: String,
}

impl ModelPost {
    /// Scalar category as text; anything else counts as missing
    fn category_label(&self) -> Option<String> {
        let label = match &self.category {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null | Value::Array(_) | Value::Object(_) => return None,
        };
        (!label.is_empty()).then_some(label)
    }
}

/// Parse a raw model response into content, never failing
///
/// `fallback_summary` is placed verbatim in the synthesized body and
/// `fallback_link` becomes a plain link under it.
pub fn parse_response(raw: &str, fallback_summary: &str, fallback_link: &str) -> GeneratedContent {
    match extract_post(raw) {
        Some(post) => {
            let category = post
                .category_label()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

            GeneratedContent {
                category,
                html_body: post.html_body,
                is_fallback: false,
            }
        }
        None => {
            tracing::warn!(
                "Model response unusable, using fallback body. Response truncated: {}",
                crate::utils::truncate_text(raw, 200)
            );
            fallback_content(fallback_summary, fallback_link)
        }
    }
}

/// Synthesized content used when the model response cannot be parsed
pub fn fallback_content(summary: &str, link: &str) -> GeneratedContent {
    let href = html_escape::encode_double_quoted_attribute(link);
    GeneratedContent {
        category: FALLBACK_CATEGORY.to_string(),
        html_body: format!(
            r#"<p>{summary}</p><p><a href="{href}">🐾 毛孩最愛好物 (點此查看)</a></p>"#
        ),
        is_fallback: true,
    }
}

/// Remove code-fence markers anywhere in the text
pub fn strip_code_fences(text: &str) -> String {
    FENCE_REGEX.replace_all(text, "").trim().to_string()
}

/// Substring from the first `{` to the last `}` inclusive
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn extract_post(raw: &str) -> Option<ModelPost> {
    let stripped = strip_code_fences(raw);
    let json = extract_json_object(&stripped)?;

    tracing::debug!("Extracted JSON: {}", crate::utils::truncate_text(json, 500));

    match serde_json::from_str::<ModelPost>(json) {
        Ok(post) if !post.html_body.trim().is_empty() => Some(post),
        Ok(_) => {
            tracing::debug!("Model returned an empty html_body");
            None
        }
        Err(e) => {
            tracing::debug!("Failed to decode model JSON: {e}");
            None
        }
    }
}

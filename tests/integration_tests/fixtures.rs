//! Test fixtures for integration tests
//!
//! Sample feeds and model responses

/// Feed with two entries; only the first one is used
pub const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>寵物新聞 - Google 新聞</title>
    <link>https://news.google.com</link>
    <description>Pet news</description>
    <item>
      <title>Shelter cat finds a home after 300 days</title>
      <link>https://news.example.com/shelter-cat</link>
      <description>A tabby who waited nearly a year was adopted this weekend.</description>
      <pubDate>Sat, 04 Jan 2025 09:30:00 GMT</pubDate>
    </item>
    <item>
      <title>New dog park opens downtown</title>
      <link>https://news.example.com/dog-park</link>
      <description>The park has separate areas for small dogs.</description>
    </item>
  </channel>
</rss>"#;

/// Feed whose channel carries no items
pub const EMPTY_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>寵物新聞</title>
    <link>https://news.google.com</link>
    <description>Nothing today</description>
  </channel>
</rss>"#;

/// Feed whose newest entry has no title
pub const UNTITLED_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>寵物新聞</title>
    <item>
      <description>Entry without a headline</description>
    </item>
  </channel>
</rss>"#;

/// Well-formed model answer wrapped in a code fence
pub const FENCED_RESPONSE: &str = "```json\n{\"category\": \"領養資訊\", \"html_body\": \"<h2>等了三百天的虎斑貓</h2><p>終於回家了</p>\"}\n```";

/// Answer with chatter around the JSON object
pub const CHATTY_RESPONSE: &str = "好的，以下是文章：\n{\"category\": \"狗狗日常\", \"html_body\": \"<p>新公園開幕</p>\"}\n希望你喜歡！";

/// Answer with no JSON at all
pub const PROSE_RESPONSE: &str = "抱歉，我無法完成這個請求。";

/// Ollama `/api/generate` body carrying the given text
pub fn ollama_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "model": "qwen2.5:7b",
        "created_at": "2025-01-04T09:31:00Z",
        "response": text,
        "done": true
    })
}

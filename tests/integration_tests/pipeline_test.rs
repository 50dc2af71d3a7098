//! Pipeline integration tests
//!
//! Covers the full pass from feed entry to mailed post, with substitute
//! collaborators and with the real HTTP clients against mock servers.

use pawpost::config::{FeedConfig, LlmConfig, LlmProvider};
use pawpost::feed::FeedClient;
use pawpost::llm::{LlmClient, DEFAULT_CATEGORY, FALLBACK_CATEGORY};
use pawpost::pipeline::{Pipeline, RunOutcome};
use pawpost::prompt::PromptBuilder;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::fixtures::{ollama_body, CHATTY_RESPONSE, FENCED_RESPONSE, PROSE_RESPONSE, SAMPLE_RSS};
use crate::common::{
    create_test_article, test_links, FixedImages, RecordingPublisher, ScriptedGenerator, StaticFeed,
};

fn pipeline_with(
    feed: StaticFeed,
    generator: ScriptedGenerator,
    publisher: Option<RecordingPublisher>,
) -> Pipeline {
    let pipeline = Pipeline::new(
        Box::new(feed),
        Box::new(generator),
        Box::new(FixedImages),
        test_links(),
        PromptBuilder::new().unwrap(),
    );

    match publisher {
        Some(publisher) => pipeline.with_publisher(Box::new(publisher)),
        None => pipeline,
    }
}

// ============================================================================
// Substitute Collaborators
// ============================================================================

#[tokio::test]
async fn test_well_formed_response_is_published() {
    let generator = ScriptedGenerator::replying(
        r#"{"category": "狗狗日常", "html_body": "<p>公園好熱鬧</p>"}"#,
    );
    let publisher = RecordingPublisher::default();
    let pipeline = pipeline_with(
        StaticFeed::Entry(create_test_article()),
        generator.clone(),
        Some(publisher.clone()),
    );

    let outcome = pipeline.run_once().await;

    match &outcome {
        RunOutcome::Published { used_fallback, status, .. } => {
            assert!(!*used_fallback);
            assert!(status.success);
        }
        other => panic!("expected Published, got {other}"),
    }

    let sent = publisher.sent();
    assert_eq!(sent.len(), 1);
    let (subject, html) = &sent[0];
    assert_eq!(subject, "Happy Dog Park Day #狗狗日常");
    assert_eq!(html, "<img alt=\"Happy Dog Park Day, cute fluffy animals, close up, warm lighting, 8k\"><p>公園好熱鬧</p>");
}

#[tokio::test]
async fn test_prompt_carries_resolved_link() {
    let generator = ScriptedGenerator::replying(r#"{"category": "x", "html_body": "<p>x</p>"}"#);
    let pipeline = pipeline_with(
        StaticFeed::Entry(create_test_article()),
        generator.clone(),
        None,
    );

    pipeline.run_once().await;

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Happy Dog Park Day"));
    assert!(prompts[0].contains("Dogs from all over town met at the park."));
    assert!(prompts[0].contains("https://shop.example.com/dog"));
    assert!(!prompts[0].contains("https://shop.example.com/default"));
}

#[tokio::test]
async fn test_unparseable_response_uses_fallback_body() {
    let publisher = RecordingPublisher::default();
    let pipeline = pipeline_with(
        StaticFeed::Entry(create_test_article()),
        ScriptedGenerator::replying(PROSE_RESPONSE),
        Some(publisher.clone()),
    );

    let outcome = pipeline.run_once().await;

    match &outcome {
        RunOutcome::Published { used_fallback, post, .. } => {
            assert!(*used_fallback);
            assert_eq!(post.subject, format!("Happy Dog Park Day #{FALLBACK_CATEGORY}"));
            assert!(post.html.contains("<p>Dogs from all over town met at the park.</p>"));
            assert!(post.html.contains(r#"href="https://shop.example.com/dog""#));
        }
        other => panic!("expected Published, got {other}"),
    }
    assert_eq!(publisher.sent().len(), 1);
}

#[tokio::test]
async fn test_missing_category_gets_default() {
    let pipeline = pipeline_with(
        StaticFeed::Entry(create_test_article()),
        ScriptedGenerator::replying(r#"{"html_body": "<p>only a body</p>"}"#),
        None,
    );

    let outcome = pipeline.run_once().await;
    let post = outcome.post().expect("post composed");
    assert_eq!(post.subject, format!("Happy Dog Park Day #{DEFAULT_CATEGORY}"));
}

#[tokio::test]
async fn test_dry_run_previews_without_sending() {
    let pipeline = pipeline_with(
        StaticFeed::Entry(create_test_article()),
        ScriptedGenerator::replying(CHATTY_RESPONSE),
        None,
    );

    let outcome = pipeline.run_once().await;

    assert!(matches!(outcome, RunOutcome::Previewed { used_fallback: false, .. }));
    assert!(!outcome.is_published());
    assert_eq!(outcome.post().unwrap().subject, "Happy Dog Park Day #狗狗日常");
}

#[tokio::test]
async fn test_empty_feed_ends_run_quietly() {
    let generator = ScriptedGenerator::replying(FENCED_RESPONSE);
    let publisher = RecordingPublisher::default();
    let pipeline = pipeline_with(StaticFeed::Empty, generator.clone(), Some(publisher.clone()));

    let outcome = pipeline.run_once().await;

    assert!(matches!(outcome, RunOutcome::NoEntries));
    assert!(generator.prompts().is_empty());
    assert!(publisher.sent().is_empty());
}

// ============================================================================
// Real Clients Against Mock Servers
// ============================================================================

#[tokio::test]
async fn test_feed_to_mail_with_http_clients() {
    let feed_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(SAMPLE_RSS)
                .insert_header("content-type", "application/rss+xml"),
        )
        .expect(1)
        .mount(&feed_server)
        .await;

    let llm_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("Shelter cat finds a home after 300 days"))
        .and(body_string_contains("https://shop.example.com/cat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ollama_body(FENCED_RESPONSE)))
        .expect(1)
        .mount(&llm_server)
        .await;

    let feed = FeedClient::new(&FeedConfig {
        url: format!("{}/rss/search", feed_server.uri()),
        ..FeedConfig::default()
    })
    .unwrap();

    let generator = LlmClient::with_config(LlmConfig {
        provider: LlmProvider::Ollama,
        endpoint: Some(llm_server.uri()),
        ..LlmConfig::default()
    })
    .unwrap();

    let publisher = RecordingPublisher::default();
    let pipeline = Pipeline::new(
        Box::new(feed),
        Box::new(generator),
        Box::new(FixedImages),
        test_links(),
        PromptBuilder::new().unwrap(),
    )
    .with_publisher(Box::new(publisher.clone()));

    let outcome = pipeline.run_once().await;
    assert!(outcome.is_published(), "unexpected outcome: {outcome}");

    let sent = publisher.sent();
    assert_eq!(sent[0].0, "Shelter cat finds a home after 300 days #領養資訊");
    assert!(sent[0].1.ends_with("<h2>等了三百天的虎斑貓</h2><p>終於回家了</p>"));
}

//! Error scenario integration tests
//!
//! Tests the ways a run ends early:
//! 1. Feed unreachable or answering with an error status
//! 2. Feed entry without a title
//! 3. Model errors and timeouts
//! 4. Mail transport refusal

use std::time::Duration;

use pawpost::config::{FeedConfig, LlmConfig, LlmProvider};
use pawpost::feed::{FeedClient, FeedSource};
use pawpost::llm::{LlmClient, TextGenerator};
use pawpost::pipeline::{Pipeline, RunOutcome};
use pawpost::prompt::PromptBuilder;
use pawpost::utils::error::{FeedError, LlmError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::fixtures::{ollama_body, FENCED_RESPONSE, UNTITLED_RSS};
use crate::common::{
    create_test_article, test_links, FixedImages, RecordingPublisher, ScriptedGenerator, StaticFeed,
};

// ============================================================================
// Feed Errors
// ============================================================================

#[tokio::test]
async fn test_feed_error_status_ends_run() {
    let generator = ScriptedGenerator::replying(FENCED_RESPONSE);
    let pipeline = Pipeline::new(
        Box::new(StaticFeed::Broken(503)),
        Box::new(generator.clone()),
        Box::new(FixedImages),
        test_links(),
        PromptBuilder::new().unwrap(),
    );

    let outcome = pipeline.run_once().await;

    match outcome {
        RunOutcome::FeedUnavailable { reason } => assert!(reason.contains("503")),
        other => panic!("expected FeedUnavailable, got {other}"),
    }
    assert!(generator.prompts().is_empty());
}

#[tokio::test]
async fn test_untitled_entry_is_rejected_at_feed_boundary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(UNTITLED_RSS))
        .mount(&server)
        .await;

    let feed = FeedClient::new(&FeedConfig {
        url: server.uri(),
        ..FeedConfig::default()
    })
    .unwrap();

    assert!(matches!(feed.latest_article().await, Err(FeedError::MissingTitle)));
}

#[tokio::test]
async fn test_feed_timeout_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let feed = FeedClient::new(&FeedConfig {
        url: server.uri(),
        timeout_secs: 1,
        ..FeedConfig::default()
    })
    .unwrap();

    assert!(matches!(feed.latest_article().await, Err(FeedError::Http(_))));
}

// ============================================================================
// Model Errors
// ============================================================================

#[tokio::test]
async fn test_model_failure_drops_article() {
    let publisher = RecordingPublisher::default();
    let pipeline = Pipeline::new(
        Box::new(StaticFeed::Entry(create_test_article())),
        Box::new(ScriptedGenerator::failing()),
        Box::new(FixedImages),
        test_links(),
        PromptBuilder::new().unwrap(),
    )
    .with_publisher(Box::new(publisher.clone()));

    let outcome = pipeline.run_once().await;

    match outcome {
        RunOutcome::Dropped { title, reason } => {
            assert_eq!(title, "Happy Dog Park Day");
            assert!(reason.contains("500"));
        }
        other => panic!("expected Dropped, got {other}"),
    }
    assert!(publisher.sent().is_empty());
}

#[tokio::test]
async fn test_model_server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .expect(1)
        .mount(&server)
        .await;

    let client = LlmClient::with_config(LlmConfig {
        provider: LlmProvider::Ollama,
        endpoint: Some(server.uri()),
        ..LlmConfig::default()
    })
    .unwrap();

    let result = client.generate("hello").await;
    match result {
        Err(LlmError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "model crashed");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_model_timeout_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ollama_body(FENCED_RESPONSE))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = LlmClient::with_config(LlmConfig {
        provider: LlmProvider::Ollama,
        endpoint: Some(server.uri()),
        timeout_secs: 1,
        ..LlmConfig::default()
    })
    .unwrap();

    assert!(matches!(client.generate("hello").await, Err(LlmError::Http(_))));
}

// ============================================================================
// Delivery Errors
// ============================================================================

#[tokio::test]
async fn test_refused_delivery_keeps_composed_post() {
    let pipeline = Pipeline::new(
        Box::new(StaticFeed::Entry(create_test_article())),
        Box::new(ScriptedGenerator::replying(FENCED_RESPONSE)),
        Box::new(FixedImages),
        test_links(),
        PromptBuilder::new().unwrap(),
    )
    .with_publisher(Box::new(RecordingPublisher::failing()));

    let outcome = pipeline.run_once().await;

    match &outcome {
        RunOutcome::DeliveryFailed { post, reason } => {
            assert_eq!(post.subject, "Happy Dog Park Day #領養資訊");
            assert!(reason.contains("535"));
        }
        other => panic!("expected DeliveryFailed, got {other}"),
    }
    assert!(!outcome.is_published());
}
